//! condq: Condition Query - CLI for compiling condition expressions.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "condq")]
#[command(about = "Condition Query - compile and check condition expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query and print its conditions
    #[command(visible_alias = "p")]
    Parse {
        /// Query (e.g., "job == 'build' and deployment == 'prod'")
        query: String,

        /// Output format: text, json (default from config)
        #[arg(short = 'f', long = "format")]
        format: Option<String>,

        /// Fail when one field is given two different values
        #[arg(short = 's', long = "strict")]
        strict: bool,
    },

    /// Check that a query compiles, without printing conditions
    #[command(visible_alias = "c")]
    Check {
        /// Query to validate
        query: String,

        /// Fail when one field is given two different values
        #[arg(short = 's', long = "strict")]
        strict: bool,

        /// Suppress output; only the exit status reports the result
        #[arg(short = 'q', long = "quiet")]
        quiet: bool,
    },

    /// Print the generic expression tree of a query
    #[command(visible_alias = "t")]
    Tree {
        /// Expression to parse
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Quick reference for query syntax
    #[command(name = "quick-help", visible_alias = "?")]
    QuickHelp,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long = "force")]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { query, format, strict } => commands::parse(&query, format.as_deref(), strict),
        Commands::Check { query, strict, quiet } => commands::check(&query, strict, quiet),
        Commands::Tree { query } => commands::tree(&query),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(),
            ConfigAction::Init { force } => commands::config_init(force),
        },
        Commands::QuickHelp => commands::quick_help(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
