pub mod batch;
pub mod policy;
pub mod resolver;
pub mod uploader;

pub use batch::BatchOrchestrator;
pub use policy::{Confirm, ConfirmationPolicy, Decision};
pub use resolver::AlbumResolver;
pub use uploader::{AlbumUploader, UploadOptions};
