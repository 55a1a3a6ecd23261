use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stepclean::{
    cleaner_from_config,
    cli::{Cli, Command},
    config::Config,
    CleanReport, CleanTarget,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.global)?;
    let level = if cfg.logging_enabled { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let json = match cli.command {
        Command::Clean {
            dry_run,
            ignore_case,
            json,
            targets,
        } => {
            cfg.dry_run |= dry_run;
            cfg.ignore_case |= ignore_case;
            if !targets.is_empty() {
                cfg.targets = targets;
            }
            json
        }
        Command::Orphans { ignore_case, json } => {
            cfg.dry_run = true;
            cfg.ignore_case |= ignore_case;
            cfg.targets = vec![CleanTarget::Orphans];
            json
        }
    };

    let cleaner = cleaner_from_config(&cfg)?;
    info!(
        "cleaning steps pack {} in {}",
        cfg.pack,
        cleaner.generated_dir().display()
    );
    let report = cleaner.clean().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if !report.is_clean() {
        warn!("cleaning finished with problems; see log above");
    }
    Ok(())
}

fn print_report(report: &CleanReport) {
    if report.skipped {
        println!("nothing to clean");
        return;
    }
    for path in &report.planned {
        println!("{:<10} {}", "orphan", path.display());
    }
    for path in &report.deleted {
        println!("{:<10} {}", "deleted", path.display());
    }
    for path in &report.missing {
        println!("{:<10} {}", "missing", path.display());
    }
    for failed in &report.failed {
        println!("{:<10} {} ({})", "failed", failed.path.display(), failed.error);
    }
    if let Some(err) = &report.listing_error {
        println!("{:<10} {}", "unreadable", err);
    }
    if report.total() == 0 && report.listing_error.is_none() {
        println!("no orphaned step files");
    }
}
