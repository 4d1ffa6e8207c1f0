use crate::engine::EvaluationReport;
use crate::evaluation::RuleKind;
use crate::resolver;
use crate::sources::MetricSource;
use anyhow::Result;
use serde::Serialize;

pub fn render_json(report: &EvaluationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[derive(Debug, Serialize)]
struct SourceEntry {
    slug: &'static str,
    name: &'static str,
    rule: RuleKind,
    annotation_keys: Vec<String>,
}

/// Machine-readable listing of every metric source.
pub fn render_sources_json() -> Result<String> {
    let entries: Vec<SourceEntry> = MetricSource::ALL
        .iter()
        .map(|source| SourceEntry {
            slug: source.slug(),
            name: source.display_name(),
            rule: source.rule_kind(),
            annotation_keys: resolver::annotation_keys(*source),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
