use serde::{Deserialize, Serialize};

/// Whether items may be added to an album that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadDirective {
    Yes,
    No,
    /// Ask the operator.
    #[default]
    Unset,
}

impl From<Option<bool>> for UploadDirective {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => UploadDirective::Yes,
            Some(false) => UploadDirective::No,
            None => UploadDirective::Unset,
        }
    }
}

impl std::fmt::Display for UploadDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDirective::Yes => write!(f, "yes"),
            UploadDirective::No => write!(f, "no"),
            UploadDirective::Unset => write!(f, "unset"),
        }
    }
}

impl std::str::FromStr for UploadDirective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(UploadDirective::Yes),
            "no" | "n" | "false" => Ok(UploadDirective::No),
            "unset" | "ask" => Ok(UploadDirective::Unset),
            _ => Err(format!("unknown directive: {s} (expected yes or no)")),
        }
    }
}
