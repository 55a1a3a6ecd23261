pub mod cleaner;
pub mod cli;
pub mod config;
pub mod naming;
pub mod pack;
pub mod reconcile;
pub mod steps;

pub use cleaner::{Cleaner, CleanerConfig};
pub use reconcile::{reconcile, IdMatch, ReconcileOptions};
pub use steps_api::{CleanReport, CleanTarget, FailedDeletion, Step};

use anyhow::{Context, Result};

use crate::config::Config;

/// Build a cleaner for the resolved configuration, loading the step list
/// when orphan cleaning is enabled.
pub fn cleaner_from_config(cfg: &Config) -> Result<Cleaner> {
    // an empty step list would mark every generated file as orphaned, so a
    // missing steps file is an error rather than "no steps"
    let steps = if cfg.targets.contains(&CleanTarget::Orphans) {
        steps::load_steps(&cfg.steps_file).context("cannot determine valid steps")?
    } else {
        Vec::new()
    };
    Ok(Cleaner::new(CleanerConfig {
        base_dir: cfg.base_dir.clone(),
        steps_pack: cfg.pack.clone(),
        to_clean: cfg.targets.clone(),
        steps,
        id_match: if cfg.ignore_case {
            IdMatch::IgnoreAsciiCase
        } else {
            IdMatch::Exact
        },
        dry_run: cfg.dry_run,
    }))
}
