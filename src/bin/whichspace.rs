use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use whichspace::app;
use whichspace::common::config::{Config, config_file};
use whichspace::common::log;

embed_plist::embed_info_plist!("../../Info.plist");

#[derive(Parser)]
#[command(version, about = "Shows the active Mission Control Space in the menu bar")]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level. Overridden by RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the menu bar indicator (default).
    Run,
    /// Print the current label and exit.
    Query {
        #[arg(long)]
        json: bool,
    },
    /// Validate the config file and print the effective settings.
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    sigpipe::reset();
    let opt = Cli::parse();

    log::init_logging(opt.verbose);

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    let config = Config::load(opt.config.as_deref())
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    match opt.command.unwrap_or(Command::Run) {
        Command::Run => app::run(config)?,
        Command::Query { json } => {
            let data = app::query(&config).context("reading spaces from the window server")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{}", data.summary());
            }
        }
        Command::CheckConfig => {
            print!("{}", config.to_toml()?);
            eprintln!("{}: ok", config_path.display());
        }
    }

    Ok(())
}
