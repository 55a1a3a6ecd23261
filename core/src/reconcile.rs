use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
};

use futures::future::join_all;
use steps_api::{CleanReport, FailedDeletion};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::naming::parse_step_file;

/// How a step id taken from a file name is compared with the valid ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdMatch {
    /// Literal comparison. `step-ABC.js` is an orphan when only `abc` is valid.
    #[default]
    Exact,
    /// ASCII case-insensitive comparison.
    IgnoreAsciiCase,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    pub id_match: IdMatch,
    /// Report orphans without deleting them.
    pub dry_run: bool,
}

/// A generated step file whose id has no valid step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub id: String,
    pub file_name: String,
}

enum Removal {
    Deleted(PathBuf),
    Missing(PathBuf),
    Failed(FailedDeletion),
}

/// Pick the orphans out of a directory listing. Names that are not
/// `step-<id>.js` are ignored. Listing order is preserved.
pub fn find_orphans<S: AsRef<str>>(
    names: &[S],
    valid_ids: &[String],
    id_match: IdMatch,
) -> Vec<Orphan> {
    let valid: HashSet<String> = valid_ids
        .iter()
        .map(|id| normalize(id, id_match))
        .collect();
    let mut seen = HashSet::new();
    let mut orphans = Vec::new();
    for name in names {
        let name = name.as_ref();
        let Some(id) = parse_step_file(name) else {
            continue;
        };
        if valid.contains(&normalize(id, id_match)) || !seen.insert(name.to_string()) {
            continue;
        }
        orphans.push(Orphan {
            id: id.to_string(),
            file_name: name.to_string(),
        });
    }
    orphans
}

fn normalize(id: &str, id_match: IdMatch) -> String {
    match id_match {
        IdMatch::Exact => id.to_string(),
        IdMatch::IgnoreAsciiCase => id.to_ascii_lowercase(),
    }
}

/// List the entry names of a directory. Names that are not valid UTF-8
/// cannot be step files and are dropped.
pub async fn list_entries<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Delete every orphan in `dir`. Deletions run concurrently and each one
/// is recorded on its own; a failure never stops the others.
pub async fn remove_orphans<P: AsRef<Path>>(dir: P, orphans: &[Orphan]) -> CleanReport {
    let dir = dir.as_ref();
    let removals = join_all(
        orphans
            .iter()
            .map(|orphan| remove_one(dir.join(&orphan.file_name))),
    )
    .await;

    let mut report = CleanReport::default();
    for removal in removals {
        match removal {
            Removal::Deleted(path) => report.deleted.push(path),
            Removal::Missing(path) => report.missing.push(path),
            Removal::Failed(failed) => report.failed.push(failed),
        }
    }
    report
}

async fn remove_one(path: PathBuf) -> Removal {
    match fs::remove_file(&path).await {
        Ok(()) => {
            info!("deleted orphan step file: {}", path.display());
            Removal::Deleted(path)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("orphan step file already missing: {}", path.display());
            Removal::Missing(path)
        }
        Err(err) => {
            error!("failed to delete {}: {}", path.display(), err);
            Removal::Failed(FailedDeletion {
                path,
                error: err.to_string(),
            })
        }
    }
}

/// Remove the generated step files in `dir` whose ids are not in
/// `valid_ids`.
///
/// Best effort: an unreadable directory counts as having no orphans and is
/// reported through `listing_error`, failed deletions are collected in the
/// report. Files created after the directory was listed are not considered.
pub async fn reconcile<P: AsRef<Path>>(
    dir: P,
    valid_ids: &[String],
    opts: ReconcileOptions,
) -> CleanReport {
    let dir = dir.as_ref();
    let names = match list_entries(dir).await {
        Ok(names) => names,
        Err(err) => {
            error!("failed to read directory {}: {}", dir.display(), err);
            return CleanReport {
                listing_error: Some(err.to_string()),
                ..Default::default()
            };
        }
    };

    let orphans = find_orphans(&names, valid_ids, opts.id_match);
    let report = if opts.dry_run {
        CleanReport {
            planned: orphans.iter().map(|o| dir.join(&o.file_name)).collect(),
            ..Default::default()
        }
    } else {
        remove_orphans(dir, &orphans).await
    };
    debug!(
        "orphan pass over {}: {} deleted, {} missing, {} failed, {} planned",
        dir.display(),
        report.deleted.len(),
        report.missing.len(),
        report.failed.len(),
        report.planned.len()
    );
    report
}
