use std::path::PathBuf;

/// Central error type for albumup.
#[derive(Debug, thiserror::Error)]
pub enum AlbumupError {
    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("remote library unavailable: {message}")]
    RemoteUnavailable { message: String },

    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("invalid content for {file_name}: {message}")]
    InvalidContent { file_name: String, message: String },

    #[error("authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("credential error: {message}")]
    CredentialError { message: String },

    #[error("{0}")]
    Other(String),
}

impl AlbumupError {
    /// Collapse any failure of a listing call into `RemoteUnavailable`,
    /// keeping the original message.
    pub fn into_remote_unavailable(self) -> Self {
        match self {
            AlbumupError::RemoteUnavailable { .. } => self,
            other => AlbumupError::RemoteUnavailable {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_remote_unavailable_keeps_message() {
        let err = AlbumupError::AuthFailed {
            message: "token expired".to_string(),
        }
        .into_remote_unavailable();
        match err {
            AlbumupError::RemoteUnavailable { message } => {
                assert_eq!(message, "authentication failed: token expired")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
