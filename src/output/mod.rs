//! Renderings of an evaluation for the CLI.
//!
//! Both renderers are pure: they build a `String` from an
//! [`EvaluationReport`]. [`emit`] writes it to a file or stdout.

pub mod json;
pub mod terminal;

pub use json::{render_json, render_sources_json};
pub use terminal::{render_sources, render_terminal};

use crate::io;
use anyhow::Result;
use clap::ValueEnum;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// Write rendered output to `output_file`, creating parent directories, or to stdout.
pub fn emit(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                io::ensure_dir(parent)?;
            }
            io::write_file(path, content)
        }
        None => {
            println!("{}", content.trim_end());
            Ok(())
        }
    }
}
