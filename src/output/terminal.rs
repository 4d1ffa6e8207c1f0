use crate::engine::EvaluationReport;
use crate::formatting::OutputFormatter;
use crate::resolver;
use crate::sources::MetricSource;
use std::fmt::Write;

const REASON_INDENT: &str = "            ";

/// Human-readable summary of one evaluation.
pub fn render_terminal(report: &EvaluationReport, formatter: &dyn OutputFormatter) -> String {
    let result = &report.result;
    let mut out = String::new();

    let system = report
        .system
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unresolved system".to_string());
    let _ = writeln!(
        out,
        "{}",
        formatter.header(&format!(
            "{} ({} rule) for {}",
            report.source.display_name(),
            report.rule,
            system
        ))
    );

    let label = result.color.as_str().to_uppercase();
    let _ = writeln!(out, "  Status:   {}", formatter.status(result.color, &label));
    let reason = result.reason.lines().collect::<Vec<_>>().join(&format!("\n{}", REASON_INDENT));
    let _ = writeln!(out, "  Reason:   {}", reason);
    let _ = writeln!(
        out,
        "  Entities: {} evaluated of {} selected",
        report.evaluated_entities, report.selected_entities
    );

    if !result.aggregated_metrics.is_empty() {
        let _ = writeln!(out, "  {}", formatter.bold("Metrics:"));
        let width = result
            .aggregated_metrics
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0);
        for (name, value) in &result.aggregated_metrics {
            let _ = writeln!(out, "    {:<width$}  {}", name, format_value(*value), width = width);
        }
    }

    if !result.ranked_offenders.is_empty() {
        let _ = writeln!(out, "  {}", formatter.bold("Worst offenders:"));
        for (rank, offender) in result.ranked_offenders.iter().enumerate() {
            let metrics = offender
                .metrics
                .iter()
                .map(|m| format!("{}={}", m.name, format_value(m.value)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                "    {}. {}  {}",
                rank + 1,
                offender.entity,
                formatter.dim(&metrics)
            );
        }
    }

    out
}

/// Table of metric sources, their rule and the annotation keys they read.
pub fn render_sources(formatter: &dyn OutputFormatter) -> String {
    let mut out = String::new();
    for source in MetricSource::ALL {
        let _ = writeln!(
            out,
            "{}  {}",
            formatter.header(source.slug()),
            formatter.dim(&format!("{} / {}", source.display_name(), source.rule_kind()))
        );
        let _ = writeln!(out, "    {}", source.rule_kind().description());
        for key in resolver::annotation_keys(source) {
            let _ = writeln!(out, "    - {}", key);
        }
    }
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
