//! Structured logging for evaluations.
//!
//! Every evaluation runs inside an `evaluation` span carrying the metric
//! source and entity count, with one child span per [`EvaluationPhase`]. The
//! binary installs the subscriber once at startup:
//!
//! ```ignore
//! use healthmap::observability::init_tracing;
//!
//! fn main() {
//!     init_tracing(cli.verbosity);
//!     // ... rest of application
//! }
//! ```
//!
//! `HEALTHMAP_LOG` (or `RUST_LOG`) overrides the level derived from `-v` flags.

use std::fmt;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for an explicit filter directive
pub const LOG_ENV: &str = "HEALTHMAP_LOG";

/// Stages of a single evaluation, used as span names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationPhase {
    /// Finding the system that governs the selection
    SystemResolution,
    /// Reading threshold annotations and the allow-list
    ThresholdResolution,
    /// Parallel per-entity fact and check retrieval
    FactFetch,
    /// Reducing facts into totals
    Aggregation,
    /// Applying the rule family
    StatusEvaluation,
    /// Ordering worst offenders
    Ranking,
}

impl fmt::Display for EvaluationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemResolution => write!(f, "system_resolution"),
            Self::ThresholdResolution => write!(f, "threshold_resolution"),
            Self::FactFetch => write!(f, "fact_fetch"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::StatusEvaluation => write!(f, "status_evaluation"),
            Self::Ranking => write!(f, "ranking"),
        }
    }
}

/// Enter the span for an evaluation phase.
#[must_use]
pub fn phase_span(phase: EvaluationPhase) -> tracing::span::EnteredSpan {
    tracing::info_span!("phase", name = %phase).entered()
}

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
