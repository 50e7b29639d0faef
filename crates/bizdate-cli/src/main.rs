//! bizdate CLI
//!
//! Command-line interface for reading and maintaining business dates and
//! string resources

use std::path::PathBuf;

use bizdate_core::logging_facility::{self, Profile};
use bizdate_engine::{Runtime, SettingsLoader};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bizdate")]
#[command(about = "bizdate - Business dates per segment", long_about = None)]
struct Cli {
    /// Settings file (TOML); BIZDATE_* environment variables apply on top
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Add a new segment
    Register(commands::dates::RegisterArgs),
    /// Print the date of a segment (default segment if omitted)
    Get(commands::dates::GetArgs),
    /// Print the dates of every segment as JSON
    All,
    /// Replace the date of an existing segment
    Set(commands::dates::SetArgs),
    /// Add one language value of a string resource
    AddResource(commands::resources::AddResourceArgs),
    /// Print a string resource (every resource if no id) as JSON
    Resource(commands::resources::ResourceArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::load(SettingsLoader::new(cli.config))?;

    match cli.command {
        Commands::Migrate => commands::migrate::execute(&runtime),
        Commands::Register(args) => commands::dates::execute_register(&runtime, args),
        Commands::Get(args) => commands::dates::execute_get(&runtime, args),
        Commands::All => commands::dates::execute_all(&runtime),
        Commands::Set(args) => commands::dates::execute_set(&runtime, args),
        Commands::AddResource(args) => commands::resources::execute_add(&runtime, args),
        Commands::Resource(args) => commands::resources::execute_show(&runtime, args),
    }
}
