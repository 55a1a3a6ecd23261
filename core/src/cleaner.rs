use std::path::{Path, PathBuf};

use steps_api::{CleanReport, CleanTarget, Step};
use tracing::debug;

use crate::{
    pack::{generated_dir, PackName},
    reconcile::{reconcile, IdMatch, ReconcileOptions},
};

/// Everything a cleaning pass needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Root holding one directory per steps pack.
    pub base_dir: PathBuf,
    pub steps_pack: PackName,
    /// Enabled cleaning behaviours. Only [`CleanTarget::Orphans`] does anything.
    pub to_clean: Vec<CleanTarget>,
    /// The authoritative steps; their ids decide which generated files stay.
    pub steps: Vec<Step>,
    pub id_match: IdMatch,
    pub dry_run: bool,
}

/// Housekeeping for the generated directory of one steps pack.
pub struct Cleaner {
    config: CleanerConfig,
    dir: PathBuf,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        let dir = generated_dir(&config.base_dir, &config.steps_pack);
        Self { config, dir }
    }

    pub fn generated_dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Run the enabled cleaning behaviours. Never fails; problems end up in
    /// the log and in the returned report.
    pub async fn clean(&self) -> CleanReport {
        if !self.config.to_clean.contains(&CleanTarget::Orphans) {
            debug!(
                "orphan cleaning not enabled for pack {}",
                self.config.steps_pack
            );
            return CleanReport::skipped();
        }
        if !tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            debug!("no generated directory at {}", self.dir.display());
            return CleanReport::skipped();
        }

        let valid_ids: Vec<String> = self.config.steps.iter().map(|s| s.id.clone()).collect();
        let opts = ReconcileOptions {
            id_match: self.config.id_match,
            dry_run: self.config.dry_run,
        };
        reconcile(&self.dir, &valid_ids, opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &Path, to_clean: Vec<CleanTarget>, steps: &[&str]) -> CleanerConfig {
        CleanerConfig {
            base_dir: base.to_path_buf(),
            steps_pack: PackName::new("demo").unwrap(),
            to_clean,
            steps: steps.iter().map(|id| Step::new(*id)).collect(),
            id_match: IdMatch::Exact,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn gated_on_orphans_target() {
        let tmp = tempfile::tempdir().unwrap();
        let cleaner = Cleaner::new(config(
            tmp.path(),
            vec![CleanTarget::Other("assets".into())],
            &[],
        ));
        std::fs::create_dir_all(cleaner.generated_dir()).unwrap();
        std::fs::write(cleaner.generated_dir().join("step-x.js"), b"").unwrap();
        let report = cleaner.clean().await;
        assert!(report.skipped);
        assert!(cleaner.generated_dir().join("step-x.js").exists());
    }

    #[tokio::test]
    async fn skips_missing_generated_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cleaner = Cleaner::new(config(tmp.path(), vec![CleanTarget::Orphans], &[]));
        let report = cleaner.clean().await;
        assert!(report.skipped);
        assert!(report.listing_error.is_none());
    }

    #[tokio::test]
    async fn removes_steps_no_longer_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let cleaner = Cleaner::new(config(tmp.path(), vec![CleanTarget::Orphans], &["keep"]));
        let dir = cleaner.generated_dir().to_path_buf();
        assert_eq!(dir, tmp.path().join("demo").join("generated"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("step-keep.js"), b"").unwrap();
        std::fs::write(dir.join("step-drop.js"), b"").unwrap();
        let report = cleaner.clean().await;
        assert!(!report.skipped);
        assert_eq!(report.deleted, vec![dir.join("step-drop.js")]);
        assert!(dir.join("step-keep.js").exists());
    }
}
