use crate::core::EntityRef;
use crate::formatting::ColorMode;
use crate::output::OutputFormat;
use crate::sources::MetricSource;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "healthmap")]
#[command(about = "Traffic-light health evaluation across quality, security and pipeline tools", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a selection of entities for one metric source
    Evaluate(EvaluateArgs),

    /// List metric sources, their rule and the annotation keys they read
    Sources {
        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Initialize a new .healthmap.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Metric source to evaluate
    #[arg(short, long, value_enum)]
    pub source: MetricSource,

    /// JSON snapshot providing entities, system annotations, facts and checks
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Entities to evaluate, as kind:namespace/name (defaults to every snapshot entity)
    #[arg(short, long = "entity", value_name = "ENTITY")]
    pub entities: Vec<EntityRef>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .healthmap.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", env = "HEALTHMAP_COLOR")]
    pub color: ColorMode,

    /// Number of parallel fetch threads (0 = use all cores)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    pub jobs: usize,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}
