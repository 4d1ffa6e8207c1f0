use crate::formatting::FormattingConfig;
use crate::output::{self, OutputFormat};
use anyhow::Result;

pub fn list_sources(format: OutputFormat, formatting: FormattingConfig) -> Result<()> {
    let content = match format {
        OutputFormat::Json => output::render_sources_json()?,
        OutputFormat::Terminal => output::render_sources(formatting.formatter().as_ref()),
    };
    output::emit(&content, None)
}
