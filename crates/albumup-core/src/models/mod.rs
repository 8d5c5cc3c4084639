pub mod album;
pub mod directive;
pub mod media;
pub mod outcome;
