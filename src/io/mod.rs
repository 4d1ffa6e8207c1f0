pub mod snapshot;
pub mod traits;

// Re-export collaborator traits for convenient access
pub use snapshot::Snapshot;
pub use traits::{Collaborators, ConfigSource, EntityResolver, FactSource, SystemConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}
