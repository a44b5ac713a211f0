// qualis/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Setup Logging (Tracing)
    // RUST_LOG=debug qualis check ... for the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            data,
            project_dir,
            strict,
            json,
        } => commands::check::execute(&data, &project_dir, strict, json),

        Commands::Score { data, project_dir } => commands::score::execute(&data, &project_dir),

        Commands::Revalidate { data, project_dir } => {
            commands::revalidate::execute(&data, &project_dir)
        }

        Commands::Issues { project_dir, state } => {
            commands::issues::execute(&project_dir, &state)
        }
    };

    if let Err(e) = result {
        eprintln!("💥 {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
