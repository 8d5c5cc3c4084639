use albumup_core::models::album::RemoteAlbum;
use albumup_core::models::directive::UploadDirective;
use albumup_core::models::outcome::AbortReason;

/// Asks the operator a yes/no question. Blocking is allowed.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> std::io::Result<bool>;
}

/// Whether to add missing items to an existing writable album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort(AbortReason),
}

/// Applies the upload directive to albums that already exist.
/// New albums never go through here.
pub struct ConfirmationPolicy<'a> {
    confirm: &'a dyn Confirm,
}

impl<'a> ConfirmationPolicy<'a> {
    pub fn new(confirm: &'a dyn Confirm) -> Self {
        Self { confirm }
    }

    pub fn decide(&self, album: &RemoteAlbum, directive: UploadDirective) -> Decision {
        match directive {
            UploadDirective::Yes => Decision::Proceed,
            UploadDirective::No => {
                tracing::info!("album {} already exists and is not updated", album.title);
                Decision::Abort(AbortReason::AlbumExists)
            }
            UploadDirective::Unset => {
                let question = format!(
                    "The album '{}' already exists, do you want to add any missing images to it?",
                    album.title
                );
                match self.confirm.confirm(&question) {
                    Ok(true) => Decision::Proceed,
                    Ok(false) => {
                        tracing::info!("upload to album {} declined", album.title);
                        Decision::Abort(AbortReason::OperatorDeclined)
                    }
                    Err(e) => {
                        tracing::error!("could not read the answer for album {}: {e}", album.title);
                        Decision::Abort(AbortReason::OperatorDeclined)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Answer {
        Yes,
        No,
        Broken,
    }

    struct Scripted {
        answer: Answer,
        asked: AtomicUsize,
    }

    impl Scripted {
        fn new(answer: Answer) -> Self {
            Self {
                answer,
                asked: AtomicUsize::new(0),
            }
        }
    }

    impl Confirm for Scripted {
        fn confirm(&self, _question: &str) -> std::io::Result<bool> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                Answer::Broken => Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "stdin closed",
                )),
            }
        }
    }

    fn album() -> RemoteAlbum {
        RemoteAlbum {
            id: "a1".into(),
            title: "Trip".into(),
            is_writeable: true,
            media_items_count: None,
        }
    }

    #[test]
    fn test_directive_skips_prompt() {
        let confirm = Scripted::new(Answer::No);
        let policy = ConfirmationPolicy::new(&confirm);
        assert_eq!(policy.decide(&album(), UploadDirective::Yes), Decision::Proceed);
        assert_eq!(
            policy.decide(&album(), UploadDirective::No),
            Decision::Abort(AbortReason::AlbumExists)
        );
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unset_asks_once() {
        let confirm = Scripted::new(Answer::Yes);
        let policy = ConfirmationPolicy::new(&confirm);
        assert_eq!(policy.decide(&album(), UploadDirective::Unset), Decision::Proceed);
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_declined_or_unreadable_aborts() {
        for answer in [Answer::No, Answer::Broken] {
            let confirm = Scripted::new(answer);
            let policy = ConfirmationPolicy::new(&confirm);
            assert_eq!(
                policy.decide(&album(), UploadDirective::Unset),
                Decision::Abort(AbortReason::OperatorDeclined)
            );
        }
    }
}
