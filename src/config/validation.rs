//! Configuration validation with error accumulation.
//!
//! Every problem is collected before reporting so a single run shows all of
//! them.

use stillwater::{NonEmptyVec, Validation};

use super::{ConfigError, HealthmapConfig, MAX_RANKED_OFFENDERS};

/// Validation result carrying one message per offending field.
pub type ConfigValidation<T> = Validation<T, NonEmptyVec<String>>;

/// Validate the entire config, accumulating all errors.
pub fn validate_config(config: &HealthmapConfig) -> ConfigValidation<()> {
    let validations = vec![
        validate_ratio_threshold(config.defaults.ratio.ratio_threshold),
        validate_non_negative_thresholds(config),
        validate_ranking_limit(config.ranking.limit),
    ];

    combine_validations(validations).map(|_| ())
}

/// Fail-fast wrapper used by the loader.
pub fn validate_config_result(config: &HealthmapConfig) -> Result<(), ConfigError> {
    match validate_config(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(ConfigError::Invalid(errors.into_iter().collect())),
    }
}

fn validate_ratio_threshold(ratio: f64) -> ConfigValidation<()> {
    if (0.0..=1.0).contains(&ratio) {
        validation_success(())
    } else {
        validation_failure(format!(
            "defaults.ratio.ratio_threshold: expected 0.0-1.0, got {}",
            ratio
        ))
    }
}

fn validate_non_negative_thresholds(config: &HealthmapConfig) -> ConfigValidation<()> {
    let defaults = &config.defaults;
    let fields = [
        ("defaults.severity.critical_red", defaults.severity.critical_red),
        ("defaults.severity.high_red", defaults.severity.high_red),
        ("defaults.severity.secrets_red", defaults.severity.secrets_red),
        ("defaults.severity.medium_red_rate", defaults.severity.medium_red_rate),
        ("defaults.severity.medium_yellow", defaults.severity.medium_yellow),
        ("defaults.severity.low_yellow_rate", defaults.severity.low_yellow_rate),
        ("defaults.two_level.critical_red", defaults.two_level.critical_red),
        ("defaults.two_level.high_yellow", defaults.two_level.high_yellow),
    ];

    let errors: Vec<String> = fields
        .iter()
        .filter(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(field, value)| format!("{}: expected a non-negative number, got {}", field, value))
        .collect();

    match NonEmptyVec::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => validation_success(()),
    }
}

fn validate_ranking_limit(limit: usize) -> ConfigValidation<()> {
    if (1..=MAX_RANKED_OFFENDERS).contains(&limit) {
        validation_success(())
    } else {
        validation_failure(format!(
            "ranking.limit: expected 1-{}, got {}",
            MAX_RANKED_OFFENDERS, limit
        ))
    }
}

/// Combine validations, keeping every failure in order.
pub fn combine_validations<T>(validations: Vec<ConfigValidation<T>>) -> ConfigValidation<Vec<T>> {
    let mut successes = Vec::new();
    let mut failures = Vec::new();

    for v in validations {
        match v {
            Validation::Success(value) => successes.push(value),
            Validation::Failure(errors) => failures.extend(errors),
        }
    }

    match NonEmptyVec::from_vec(failures) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(successes),
    }
}

fn validation_success<T>(value: T) -> ConfigValidation<T> {
    Validation::Success(value)
}

fn validation_failure<T>(error: String) -> ConfigValidation<T> {
    Validation::Failure(NonEmptyVec::new(error, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HealthmapConfig::default()).is_success());
        assert!(validate_config_result(&HealthmapConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_accumulated() {
        let mut config = HealthmapConfig::default();
        config.defaults.ratio.ratio_threshold = -0.1;
        config.defaults.severity.high_red = -1.0;
        config.ranking.limit = 9;

        match validate_config(&config) {
            Validation::Failure(errors) => {
                let errors: Vec<String> = errors.into_iter().collect();
                assert_eq!(errors.len(), 3);
                assert!(errors[0].starts_with("defaults.ratio.ratio_threshold"));
                assert!(errors[1].starts_with("defaults.severity.high_red"));
                assert_eq!(errors[2], "ranking.limit: expected 1-5, got 9");
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn test_non_finite_thresholds_are_rejected() {
        let mut config = HealthmapConfig::default();
        config.defaults.two_level.critical_red = f64::NAN;
        config.defaults.two_level.high_yellow = f64::INFINITY;

        match validate_config_result(&config) {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].starts_with("defaults.two_level.critical_red"));
                assert!(errors[1].starts_with("defaults.two_level.high_yellow"));
            }
            other => panic!("Expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_combine_validations_keeps_successes_in_order() {
        let combined = combine_validations(vec![validation_success(1), validation_success(2)]);
        match combined {
            Validation::Success(values) => assert_eq!(values, vec![1, 2]),
            Validation::Failure(_) => panic!("Expected success"),
        }
    }
}
