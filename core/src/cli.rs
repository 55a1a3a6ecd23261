use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use steps_api::CleanTarget;

/// Command line interface for the stepclean housekeeping tool.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command; they override the config file and
/// environment.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalOpts {
    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Name of the steps pack to work on.
    #[arg(long, global = true)]
    pub pack: Option<String>,
    /// Directory holding the steps packs.
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
    /// JSON file listing the valid steps.
    #[arg(long, global = true)]
    pub steps: Option<PathBuf>,
    /// Enable or disable logging (true/false).
    #[arg(long, global = true)]
    pub logging: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove generated files that no longer belong to a step.
    Clean {
        /// Only report what would be removed.
        #[arg(long)]
        dry_run: bool,
        /// Compare step ids without regard to ASCII case.
        #[arg(long)]
        ignore_case: bool,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// Cleaning behaviours to run; replaces the configured list.
        #[arg(long = "target")]
        targets: Vec<CleanTarget>,
    },
    /// List orphaned generated files without touching them.
    Orphans {
        /// Compare step ids without regard to ASCII case.
        #[arg(long)]
        ignore_case: bool,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stepclean",
            "clean",
            "--pack",
            "checkout",
            "--dry-run",
            "--target",
            "orphans",
        ])
        .unwrap();
        assert_eq!(cli.global.pack.as_deref(), Some("checkout"));
        match cli.command {
            Command::Clean {
                dry_run, targets, ..
            } => {
                assert!(dry_run);
                assert_eq!(targets, vec![CleanTarget::Orphans]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["stepclean"]).is_err());
    }
}
