//! File system utilities.

pub mod naming;
pub mod paths;

pub use naming::{event_filename, sanitize_filename, sanitize_path_component};
pub use paths::{author_dir, ensure_dir};
