//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Output directory for one author: `<download_dir>/<handle>`.
pub fn author_dir(config: &Config, handle: &str) -> Result<PathBuf> {
    let component = sanitize_path_component(handle)?;
    Ok(config.download_directory().join(component))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
