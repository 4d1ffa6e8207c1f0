//! `.healthmap.toml` configuration.
//!
//! The file overrides the built-in threshold defaults used whenever a system
//! carries no (or malformed) threshold annotations, and bounds the offender
//! ranking. Every section is optional.
//!
//! ```toml
//! [defaults.ratio]
//! ratio_threshold = 0.33
//!
//! [defaults.severity]
//! medium_red_rate = 0.5
//!
//! [ranking]
//! limit = 5
//! ```

mod loader;
mod thresholds;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use loader::{directory_ancestors, load_config, load_config_from, parse_and_validate_config};
pub use thresholds::{
    RatioDefaults, RatioThresholds, SeverityDefaults, SeverityThresholds, ThresholdConfig,
    ThresholdDefaults, TwoLevelDefaults, TwoLevelThresholds,
};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".healthmap.toml";

/// Upper bound on the ranked offender list
pub const MAX_RANKED_OFFENDERS: usize = 5;

/// Root configuration structure for healthmap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthmapConfig {
    #[serde(default)]
    pub defaults: ThresholdDefaults,

    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of worst offenders reported (1-5)
    #[serde(default = "default_ranking_limit")]
    pub limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            limit: default_ranking_limit(),
        }
    }
}

fn default_ranking_limit() -> usize {
    MAX_RANKED_OFFENDERS
}

impl HealthmapConfig {
    /// Ranking limit clamped to the supported range.
    pub fn ranking_limit(&self) -> usize {
        self.ranking.limit.clamp(1, MAX_RANKED_OFFENDERS)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse .healthmap.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Commented template written by `healthmap init`
pub const CONFIG_TEMPLATE: &str = r#"# Healthmap Configuration
#
# Defaults apply whenever a system has no threshold annotation for a source,
# or the annotation is not a valid number.

[defaults.ratio]
# Share of entities (0.0-1.0) allowed to fail before the light turns red
ratio_threshold = 0.33

[defaults.severity]
critical_red = 0
high_red = 0
secrets_red = 0
# Rates: multiplied by the number of evaluated entities
medium_red_rate = 0.5
medium_yellow = 0
low_yellow_rate = 0.5

[defaults.two_level]
critical_red = 0
high_yellow = 0

[ranking]
# Worst offenders listed per evaluation (1-5)
limit = 5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_and_validate_config(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, HealthmapConfig::default());
    }

    #[test]
    fn test_ranking_limit_is_clamped() {
        let mut config = HealthmapConfig::default();
        config.ranking.limit = 50;
        assert_eq!(config.ranking_limit(), MAX_RANKED_OFFENDERS);
        config.ranking.limit = 0;
        assert_eq!(config.ranking_limit(), 1);
    }
}
