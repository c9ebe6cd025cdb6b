//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pokereview_core` linkage without any transport layer.
//! - Open a configured store and print one `entity=<name> count=<n>` line
//!   per record table.

use clap::{Parser, Subcommand};
use log::info;
use pokereview_core::db::open_db_with;
use pokereview_core::{init_logging_from, CoreConfig, Repositories, Repository};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "pokereview", version, about = "Pokemon review record store probe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints `pong`.
    Ping,
    /// Prints the core crate version.
    Version,
    /// Opens the store and prints row counts per record table.
    Summary {
        /// JSON config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// SQLite file; overrides `db_path` from the config.
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Ping => {
            println!("pokereview_core ping={}", pokereview_core::ping());
            Ok(())
        }
        Command::Version => {
            println!("pokereview_core version={}", pokereview_core::core_version());
            Ok(())
        }
        Command::Summary { config, db } => summary(config, db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summary(config_path: Option<PathBuf>, db: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let mut config = match config_path {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if db.is_some() {
        config.db_path = db;
    }
    init_logging_from(&config)?;

    let conn = open_db_with(&config)?;
    let repos = Repositories::try_new(&conn)?;
    let counts = [
        ("category", repos.categories().count()?),
        ("country", repos.countries().count()?),
        ("owner", repos.owners().count()?),
        ("pokemon", repos.pokemon().count()?),
        ("review", repos.reviews().count()?),
        ("reviewer", repos.reviewers().count()?),
    ];
    for (entity, count) in counts {
        println!("entity={entity} count={count}");
    }
    info!("event=cli_summary module=cli status=ok");
    Ok(())
}
