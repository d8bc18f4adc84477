//! Rebind command-line tool
//!
//! Inspects the demo entity, installs it into the reference host and calls
//! its functions with literal arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod config;
mod demo;
mod output;

use config::Config;
use output::{resolve_color_choice, StyledOutput};

#[derive(Parser)]
#[command(name = "rebind")]
#[command(about = "Expose native functions to a dynamic runtime", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reject out-of-range integer arguments instead of wrapping them
    #[arg(long, global = true)]
    checked: bool,

    /// When to use colors (always, never, auto)
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List members of the demo entity
    List,

    /// Show signature and doc of a function
    Describe {
        /// Function name
        function: String,
    },

    /// Call a function with literal arguments
    Call {
        /// Function name
        function: String,
        /// Arguments: true, false, none, @<handle>, numbers, or strings
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show configuration and entity info
    Info,
}

fn install_tracing() {
    let filter = EnvFilter::try_from_env("REBIND_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.checked {
        config.bindings = rebind_sdk::BindingOptions::checked();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    let mut out = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));

    let result = match &cli.command {
        Commands::List => commands::list::execute(&demo::DEMO, &mut out),
        Commands::Describe { function } => commands::describe::execute(&demo::DEMO, function, &mut out),
        Commands::Call { function, args } => {
            commands::call::execute(&demo::DEMO, &config, function, args, &mut out)
        }
        Commands::Info => commands::info::execute(&demo::DEMO, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
