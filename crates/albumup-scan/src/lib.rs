pub mod input;
pub mod scanner;

pub use input::clean_path_input;
pub use scanner::{list_album_dirs, scan_media, ScanOptions};
