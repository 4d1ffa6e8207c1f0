use anyhow::Result;
use healthmap::cli::{self, Commands};
use healthmap::formatting::{ColorMode, FormattingConfig};
use healthmap::observability::init_tracing;

fn main() -> Result<()> {
    let cli = cli::parse_args();

    match cli.command {
        Commands::Evaluate(args) => {
            init_tracing(args.verbosity);
            healthmap::commands::handle_evaluate(args)
        }
        Commands::Sources { format } => {
            init_tracing(0);
            healthmap::commands::list_sources(format, FormattingConfig::from_env(ColorMode::Auto))
        }
        Commands::Init { force } => {
            init_tracing(0);
            healthmap::commands::init_config(force)
        }
    }
}
