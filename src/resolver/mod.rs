//! Threshold resolution from system-level configuration.
//!
//! Thresholds live as annotations on the system that owns the evaluated
//! entities (`<source>/<field>`, e.g. `blackduck/medium-red`), alongside an
//! optional comma-separated repository allow-list (`<source>/repositories`).
//!
//! Resolution never fails. A missing, empty, non-numeric or out-of-range
//! annotation resolves to the default, and a configuration lookup that fails
//! for any reason is treated as "no configuration present".
//!
//! Rate thresholds (`medium-red`, `low-yellow`) are multiplied by the entity
//! count. Callers that narrow the entity set with the allow-list must pass the
//! filtered count.

use crate::config::{
    RatioThresholds, SeverityThresholds, ThresholdConfig, ThresholdDefaults, TwoLevelThresholds,
};
use crate::core::{EntityRef, SystemRef};
use crate::evaluation::RuleKind;
use crate::io::{ConfigSource, EntityResolver, SystemConfig};
use crate::sources::MetricSource;

pub const RATIO_THRESHOLD_KEY: &str = "ratio-threshold";
pub const CRITICAL_RED_KEY: &str = "critical-red";
pub const HIGH_RED_KEY: &str = "high-red";
pub const SECRETS_RED_KEY: &str = "secrets-red";
pub const MEDIUM_RED_KEY: &str = "medium-red";
pub const MEDIUM_YELLOW_KEY: &str = "medium-yellow";
pub const LOW_YELLOW_KEY: &str = "low-yellow";
pub const HIGH_YELLOW_KEY: &str = "high-yellow";

/// Outcome of looking up the system that governs a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemLookup {
    Found(SystemRef),
    /// The governing entity declares no parent system
    NotFound,
    /// The catalog could not be queried; thresholds fall back to defaults
    Unavailable,
}

/// Resolve the system governing a selection.
///
/// Only the first entity's parent system is consulted, even when the
/// selection spans several systems.
pub fn system_for_selection(resolver: &dyn EntityResolver, entities: &[EntityRef]) -> SystemLookup {
    let Some(first) = entities.first() else {
        return SystemLookup::NotFound;
    };
    match resolver.resolve_parent_system(first) {
        Ok(Some(system)) => SystemLookup::Found(system),
        Ok(None) => SystemLookup::NotFound,
        Err(e) if e.is_not_found() => SystemLookup::NotFound,
        Err(e) => {
            tracing::warn!(entity = %first, error = %e, "Parent system lookup failed");
            SystemLookup::Unavailable
        }
    }
}

/// Fetch a system's configuration, degrading any failure to an empty record.
pub fn fetch_system_config(source: &dyn ConfigSource, system: &SystemRef) -> SystemConfig {
    match source.get_system_config(system) {
        Ok(config) => config,
        Err(e) if e.is_not_found() => {
            tracing::debug!(system = %system, "No configuration record, using defaults");
            SystemConfig::default()
        }
        Err(e) => {
            tracing::warn!(system = %system, error = %e, "Configuration lookup failed, using defaults");
            SystemConfig::default()
        }
    }
}

/// Repository allow-list configured for a source, if any.
///
/// Entries are trimmed and empty entries dropped; a list with no entries
/// means "no filter".
pub fn allow_list(config: &SystemConfig, source: MetricSource) -> Option<Vec<String>> {
    let raw = config.annotation(&source.allow_list_key())?;
    let entries: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();
    (!entries.is_empty()).then_some(entries)
}

/// Narrow a selection to the allow-list, preserving selection order.
pub fn apply_allow_list(entities: &[EntityRef], allowed: Option<&[String]>) -> Vec<EntityRef> {
    match allowed {
        None => entities.to_vec(),
        Some(allowed) => entities
            .iter()
            .filter(|entity| allowed.iter().any(|name| name == entity.display_name()))
            .cloned()
            .collect(),
    }
}

/// Pure threshold resolution from an already fetched configuration record.
pub fn thresholds_from_config(
    config: &SystemConfig,
    source: MetricSource,
    defaults: &ThresholdDefaults,
    entity_count: usize,
) -> ThresholdConfig {
    let count = entity_count as f64;
    let read = |key: &str, default: f64| read_count(config, source, key, default);

    match source.rule_kind() {
        RuleKind::Ratio => ThresholdConfig::Ratio(RatioThresholds {
            ratio_threshold: read_ratio(config, source, defaults.ratio.ratio_threshold),
        }),
        RuleKind::Severity => {
            let d = &defaults.severity;
            ThresholdConfig::Severity(SeverityThresholds {
                critical_red: Some(read(CRITICAL_RED_KEY, d.critical_red)),
                high_red: Some(read(HIGH_RED_KEY, d.high_red)),
                secrets_red: Some(read(SECRETS_RED_KEY, d.secrets_red)),
                medium_red: Some(read(MEDIUM_RED_KEY, d.medium_red_rate) * count),
                medium_yellow: Some(read(MEDIUM_YELLOW_KEY, d.medium_yellow)),
                low_yellow: Some(read(LOW_YELLOW_KEY, d.low_yellow_rate) * count),
            })
        }
        RuleKind::TwoLevel => {
            let d = &defaults.two_level;
            ThresholdConfig::TwoLevel(TwoLevelThresholds {
                critical_red: Some(read(CRITICAL_RED_KEY, d.critical_red)),
                high_yellow: Some(read(HIGH_YELLOW_KEY, d.high_yellow)),
            })
        }
    }
}

/// Resolve thresholds for a system, never failing.
///
/// `entity_count` must be the count after any allow-list filtering.
pub fn resolve(
    config_source: &dyn ConfigSource,
    system: Option<&SystemRef>,
    source: MetricSource,
    defaults: &ThresholdDefaults,
    entity_count: usize,
) -> ThresholdConfig {
    let config = system
        .map(|system| fetch_system_config(config_source, system))
        .unwrap_or_default();
    thresholds_from_config(&config, source, defaults, entity_count)
}

/// Every annotation key consulted for a source, allow-list last.
pub fn annotation_keys(source: MetricSource) -> Vec<String> {
    let fields: &[&str] = match source.rule_kind() {
        RuleKind::Ratio => &[RATIO_THRESHOLD_KEY],
        RuleKind::Severity => &[
            CRITICAL_RED_KEY,
            HIGH_RED_KEY,
            SECRETS_RED_KEY,
            MEDIUM_RED_KEY,
            MEDIUM_YELLOW_KEY,
            LOW_YELLOW_KEY,
        ],
        RuleKind::TwoLevel => &[CRITICAL_RED_KEY, HIGH_YELLOW_KEY],
    };
    fields
        .iter()
        .map(|field| source.annotation_key(field))
        .chain(std::iter::once(source.allow_list_key()))
        .collect()
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn read_ratio(config: &SystemConfig, source: MetricSource, default: f64) -> f64 {
    let key = source.annotation_key(RATIO_THRESHOLD_KEY);
    parse_number(config.annotation(&key))
        .filter(|value| (0.0..=1.0).contains(value))
        .unwrap_or(default)
}

fn read_count(config: &SystemConfig, source: MetricSource, field: &str, default: f64) -> f64 {
    let key = source.annotation_key(field);
    parse_number(config.annotation(&key))
        .filter(|value| *value >= 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EvalError;
    use std::collections::BTreeMap;

    fn config_with(pairs: &[(&str, &str)]) -> SystemConfig {
        SystemConfig {
            annotations: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn severity(config: ThresholdConfig) -> SeverityThresholds {
        match config {
            ThresholdConfig::Severity(t) => t,
            other => panic!("expected severity thresholds, got {:?}", other),
        }
    }

    fn ratio(config: ThresholdConfig) -> f64 {
        match config {
            ThresholdConfig::Ratio(t) => t.ratio_threshold,
            other => panic!("expected ratio thresholds, got {:?}", other),
        }
    }

    #[test]
    fn test_medium_red_scales_with_entity_count() {
        let defaults = ThresholdDefaults::default();
        let empty = SystemConfig::default();

        let ten = severity(thresholds_from_config(&empty, MetricSource::BlackDuck, &defaults, 10));
        assert_eq!(ten.medium_red, Some(5.0));
        assert_eq!(ten.low_yellow, Some(5.0));

        let four = severity(thresholds_from_config(&empty, MetricSource::BlackDuck, &defaults, 4));
        assert_eq!(four.medium_red, Some(2.0));
        assert_eq!(four.critical_red, Some(0.0));
    }

    #[test]
    fn test_annotations_override_defaults() {
        let config = config_with(&[
            ("blackduck/critical-red", "1"),
            ("blackduck/medium-red", "0.2"),
            ("blackduck/medium-yellow", " 3 "),
        ]);
        let t = severity(thresholds_from_config(
            &config,
            MetricSource::BlackDuck,
            &ThresholdDefaults::default(),
            10,
        ));
        assert_eq!(t.critical_red, Some(1.0));
        assert_eq!(t.medium_red, Some(2.0));
        assert_eq!(t.medium_yellow, Some(3.0));
    }

    #[test]
    fn test_malformed_annotations_fall_back_to_defaults() {
        let config = config_with(&[
            ("sonarqube/ratio-threshold", "lots"),
            ("blackduck/high-red", ""),
            ("blackduck/critical-red", "-2"),
        ]);
        let defaults = ThresholdDefaults::default();
        assert_eq!(
            ratio(thresholds_from_config(&config, MetricSource::SonarQube, &defaults, 3)),
            0.33
        );
        let t = severity(thresholds_from_config(&config, MetricSource::BlackDuck, &defaults, 3));
        assert_eq!(t.high_red, Some(0.0));
        assert_eq!(t.critical_red, Some(0.0));
    }

    #[test]
    fn test_out_of_range_ratio_is_malformed() {
        let config = config_with(&[("azure-devops/ratio-threshold", "1.5")]);
        assert_eq!(
            ratio(thresholds_from_config(
                &config,
                MetricSource::AzureDevOps,
                &ThresholdDefaults::default(),
                3
            )),
            0.33
        );
    }

    #[test]
    fn test_keys_are_scoped_per_source() {
        let config = config_with(&[("blackduck/ratio-threshold", "0.9")]);
        assert_eq!(
            ratio(thresholds_from_config(
                &config,
                MetricSource::SonarQube,
                &ThresholdDefaults::default(),
                3
            )),
            0.33
        );
    }

    #[test]
    fn test_allow_list_parsing_and_filtering() {
        let config = config_with(&[("sonarqube/repositories", " web, api ,,")]);
        let allowed = allow_list(&config, MetricSource::SonarQube).unwrap();
        assert_eq!(allowed, vec!["web".to_string(), "api".to_string()]);
        assert_eq!(allow_list(&config, MetricSource::BlackDuck), None);

        let entities = vec![
            EntityRef::component("api"),
            EntityRef::component("batch"),
            EntityRef::component("web"),
        ];
        let filtered = apply_allow_list(&entities, Some(&allowed));
        assert_eq!(
            filtered,
            vec![EntityRef::component("api"), EntityRef::component("web")]
        );
        assert_eq!(apply_allow_list(&entities, None), entities);
    }

    #[test]
    fn test_blank_allow_list_means_no_filter() {
        let config = config_with(&[("sonarqube/repositories", " , ")]);
        assert_eq!(allow_list(&config, MetricSource::SonarQube), None);
    }

    struct FailingConfig;

    impl ConfigSource for FailingConfig {
        fn get_system_config(&self, _system: &SystemRef) -> Result<SystemConfig, EvalError> {
            Err(EvalError::transport("catalog timed out"))
        }
    }

    #[test]
    fn test_lookup_failure_degrades_to_defaults() {
        let system = SystemRef::new("default", "shop");
        let resolved = resolve(
            &FailingConfig,
            Some(&system),
            MetricSource::GithubAdvancedSecurity,
            &ThresholdDefaults::default(),
            8,
        );
        let t = severity(resolved);
        assert_eq!(t.medium_red, Some(4.0));
        assert_eq!(t.secrets_red, Some(0.0));
    }

    #[test]
    fn test_two_level_thresholds() {
        let config = config_with(&[("dependabot/high-yellow", "2")]);
        let resolved = thresholds_from_config(
            &config,
            MetricSource::Dependabot,
            &ThresholdDefaults::default(),
            5,
        );
        assert_eq!(
            resolved,
            ThresholdConfig::TwoLevel(TwoLevelThresholds {
                critical_red: Some(0.0),
                high_yellow: Some(2.0),
            })
        );
    }

    struct Catalog(Result<Option<SystemRef>, EvalError>);

    impl EntityResolver for Catalog {
        fn resolve_parent_system(
            &self,
            _entity: &EntityRef,
        ) -> Result<Option<SystemRef>, EvalError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_system_for_selection() {
        let entities = [EntityRef::component("web")];
        let shop = SystemRef::new("default", "shop");

        assert_eq!(
            system_for_selection(&Catalog(Ok(Some(shop.clone()))), &entities),
            SystemLookup::Found(shop)
        );
        assert_eq!(
            system_for_selection(&Catalog(Ok(None)), &entities),
            SystemLookup::NotFound
        );
        assert_eq!(
            system_for_selection(&Catalog(Err(EvalError::not_found("web"))), &entities),
            SystemLookup::NotFound
        );
        assert_eq!(
            system_for_selection(&Catalog(Err(EvalError::transport("down"))), &entities),
            SystemLookup::Unavailable
        );
        assert_eq!(
            system_for_selection(&Catalog(Ok(None)), &[]),
            SystemLookup::NotFound
        );
    }

    #[test]
    fn test_annotation_keys_per_family() {
        assert_eq!(
            annotation_keys(MetricSource::Dependabot),
            vec![
                "dependabot/critical-red",
                "dependabot/high-yellow",
                "dependabot/repositories"
            ]
        );
        let blackduck = annotation_keys(MetricSource::BlackDuck);
        assert_eq!(blackduck.len(), 7);
        assert_eq!(blackduck[3], "blackduck/medium-red");
        assert_eq!(
            annotation_keys(MetricSource::SonarQube),
            vec!["sonarqube/ratio-threshold", "sonarqube/repositories"]
        );
    }
}
