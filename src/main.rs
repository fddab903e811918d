use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use medprune::commands::prune::{self, PruneOptions};
use medprune::commands::stats;
use medprune::completions::{generate_completions, Shell};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medprune")]
#[command(
    about = "Remove symptoms, examinations and treatments no diagnosis can reach",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report unreachable definitions and optionally delete them
    ///
    /// Without --apply this is a dry run: nothing on disk changes.
    Prune {
        /// Content root to scan recursively
        #[arg(short, long)]
        root: PathBuf,

        /// Delete unreachable definitions and rewrite the affected files
        #[arg(long)]
        apply: bool,

        /// Copy each modified file to <file>.bak before rewriting it
        #[arg(long)]
        backup: bool,

        /// Config file (default: <root>/medprune.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show indexed entity counts, duplicates and dangling references
    Stats {
        /// Content root to scan recursively
        #[arg(short, long)]
        root: PathBuf,

        /// Config file (default: <root>/medprune.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Prune {
            root,
            apply,
            backup,
            config,
            json,
        } => prune::execute(&PruneOptions {
            root,
            apply,
            backup,
            config,
            json,
        }),
        Commands::Stats { root, config } => stats::execute(&root, config.as_deref()),
        Commands::Completions { shell } => {
            let shell = Shell::from_str(&shell)?;
            let mut cmd = Cli::command();
            generate_completions(&mut cmd, shell, &mut io::stdout());
            Ok(())
        }
    }
}
