// qualis/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qualis")]
#[command(about = "Statistical data quality-control engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔍 Runs the full QA analysis over a CSV dataset
    Check {
        /// Dataset file (CSV with indicator, filter, year, value columns)
        #[arg(long)]
        data: PathBuf,

        /// Project directory (config + persisted results)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with an error code if any critical issue is found
        #[arg(long)]
        strict: bool,

        /// Print the issue list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// 📊 Shows the quality score (active issues only, if statuses exist)
    Score {
        /// Dataset file
        #[arg(long)]
        data: PathBuf,

        /// Project directory (config + persisted statuses)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ♻️  Re-validates after a data edit and auto-resolves fixed issues
    Revalidate {
        /// Edited dataset file
        #[arg(long)]
        data: PathBuf,

        /// Project directory holding the previous results + statuses
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📋 Lists persisted issues, filtered by lifecycle state
    Issues {
        /// Project directory holding persisted results + statuses
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Lifecycle filter: active | resolved | dismissed | all
        #[arg(long, default_value = "active")]
        state: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use clap::Parser;

    #[test]
    fn test_cli_parse_check_defaults() -> Result<()> {
        let args = Cli::parse_from(["qualis", "check", "--data", "data.csv"]);
        match args.command {
            Commands::Check {
                data,
                project_dir,
                strict,
                json,
            } => {
                assert_eq!(data.to_string_lossy(), "data.csv");
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert!(!strict);
                assert!(!json);
                Ok(())
            }
            _ => bail!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_check_strict() -> Result<()> {
        let args = Cli::parse_from([
            "qualis",
            "check",
            "--data",
            "/tmp/d.csv",
            "--strict",
            "--project-dir",
            "/tmp",
        ]);
        match args.command {
            Commands::Check { strict, project_dir, .. } => {
                assert!(strict);
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                Ok(())
            }
            _ => bail!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_issues_state() -> Result<()> {
        let args = Cli::parse_from(["qualis", "issues", "--state", "dismissed"]);
        match args.command {
            Commands::Issues { state, .. } => {
                assert_eq!(state, "dismissed");
                Ok(())
            }
            _ => bail!("Expected Issues command"),
        }
    }
}
