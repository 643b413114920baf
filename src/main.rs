use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use studoro::cli::args::{Cli, Commands};
use studoro::cli::commands;
use studoro::config::{Config, Paths};
use studoro::error::StudoroError;
use studoro::storage::Database;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StudoroError> {
    let cli = Cli::parse();

    // Completions need no state at all.
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "studoro", &mut std::io::stdout());
        return Ok(());
    }

    let paths = Paths::new()?;
    paths.ensure_dirs()?;
    let config = Config::load_from_path(&paths.config_file)?;
    let db = Database::open_at(&paths.database)?;

    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Timer(args) => commands::timer(&db, &config, args.command, format)?,
        Commands::Tui => {
            studoro::tui::run(&db, &config)?;
            return Ok(());
        }
        Commands::Subject(args) => commands::subject(&db, args.command, format)?,
        Commands::Task(args) => commands::task(&db, args.command, format)?,
        Commands::Stats(args) => commands::stats(&db, &config, args.command, format)?,
        // Handled above before any state is opened.
        Commands::Completions { .. } => return Ok(()),
    };

    println!("{output}");
    Ok(())
}
