use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timeshare_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "timeshare", version, about = "Urgency-weighted time-share calculator")]
struct Cli {
    /// Use this config file instead of ~/.config/timeshare/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine internals (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the time share for one parameter record
    Compute(commands::compute::ComputeArgs),
    /// Show the urgency breakdown across a window
    Sample(commands::sample::SampleArgs),
    /// Compute shares for every assignment in a file
    Batch(commands::batch::BatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.config);
    let loaded = ctx.config();
    let fallback = Config::default();
    logging::init(cli.verbose, loaded.as_ref().unwrap_or(&fallback));
    if let Err(err) = &loaded {
        tracing::warn!(%err, "config not loaded, logging with defaults");
    }

    let result = match cli.command {
        Commands::Compute(args) => commands::compute::run(args, &ctx),
        Commands::Sample(args) => commands::sample::run(args, &ctx),
        Commands::Batch(args) => commands::batch::run(args, &ctx),
        Commands::Config { action } => commands::config::run(action, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
