use std::fs;
use std::path::{Path, PathBuf};

use super::validation::validate_config_result;
use super::{ConfigError, HealthmapConfig, CONFIG_FILE_NAME};

/// Pure function to parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<HealthmapConfig, ConfigError> {
    let config = toml::from_str::<HealthmapConfig>(contents)?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Load an explicitly requested configuration file; errors are surfaced.
pub fn load_config_from(path: &Path) -> Result<HealthmapConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_and_validate_config(&contents)
}

/// Try loading config from a discovered path; problems fall back to defaults.
fn try_load_config_from_path(config_path: &Path) -> Option<HealthmapConfig> {
    match load_config_from(config_path) {
        Ok(config) => {
            tracing::debug!(path = %config_path.display(), "Loaded configuration");
            Some(config)
        }
        // Only log actual errors, not "file not found"
        Err(ConfigError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            None
        }
        Err(e) => {
            tracing::warn!(path = %config_path.display(), "{}. Using defaults.", e);
            None
        }
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the working directory and its ancestors for `.healthmap.toml`.
pub fn load_config() -> HealthmapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return HealthmapConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            HealthmapConfig::default()
        })
}
