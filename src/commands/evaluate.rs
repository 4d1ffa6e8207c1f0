use crate::cli::{configure_thread_pool, EvaluateArgs};
use crate::config::{self, HealthmapConfig};
use crate::engine::{Engine, EvaluationReport};
use crate::formatting::FormattingConfig;
use crate::io::{Collaborators, Snapshot};
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};

/// Run one evaluation from a snapshot file and render it.
///
/// A gray result is still a successful run; only unreadable inputs fail.
pub fn handle_evaluate(args: EvaluateArgs) -> Result<()> {
    configure_thread_pool(args.jobs);

    let config = load_config(&args)?;
    let snapshot = Snapshot::from_path(&args.snapshot)?;
    let report = evaluate_snapshot(&snapshot, &config, &args);

    let content = match args.format {
        OutputFormat::Json => output::render_json(&report)?,
        OutputFormat::Terminal => {
            let formatting = FormattingConfig::from_env(args.color);
            output::render_terminal(&report, formatting.formatter().as_ref())
        }
    };
    output::emit(&content, args.output.as_deref())
}

fn load_config(args: &EvaluateArgs) -> Result<HealthmapConfig> {
    match &args.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Unable to use configuration {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Evaluate the requested entities, or every snapshot entity when none are given.
pub fn evaluate_snapshot(
    snapshot: &Snapshot,
    config: &HealthmapConfig,
    args: &EvaluateArgs,
) -> EvaluationReport {
    let entities = if args.entities.is_empty() {
        snapshot.entities().to_vec()
    } else {
        args.entities.clone()
    };
    let collaborators = Collaborators::new(snapshot, snapshot, snapshot);
    Engine::new(collaborators, config).evaluate_report(args.source, &entities)
}
