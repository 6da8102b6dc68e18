//! Embedify CLI
//!
//! Inlines stylesheets, scripts and images into self-contained HTML builds.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Embedify.
#[derive(Parser)]
#[command(
    name = "embedify",
    version,
    about = "Inline stylesheets, scripts and images into self-contained HTML"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "embedify.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build every configured document
    Build {
        /// Override the base directory referenced files are resolved against
        #[arg(long)]
        relative_to: Option<std::path::PathBuf>,
    },
    /// Rebuild whenever a source or referenced file changes
    Watch {
        /// Override the base directory referenced files are resolved against
        #[arg(long)]
        relative_to: Option<std::path::PathBuf>,
    },
    /// Validate configuration and references without writing anything
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    embedify::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { relative_to } => {
            embedify::cmd::build::run(&cli.config, relative_to.as_deref())?;
        }
        Commands::Watch { relative_to } => {
            embedify::cmd::watch::run(&cli.config, relative_to.as_deref()).await?;
        }
        Commands::Check { strict } => {
            embedify::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
