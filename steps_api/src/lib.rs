use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, path::PathBuf, str::FromStr};

/// A step record supplied by the owner of a steps pack. Only the id matters
/// here; any other fields in the source record are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: String,
}

impl Step {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Cleaning behaviours that can be switched on for a pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CleanTarget {
    /// Remove generated step files whose id is no longer listed.
    Orphans,
    /// Reserved value; accepted and ignored.
    Other(String),
}

impl CleanTarget {
    pub fn as_str(&self) -> &str {
        match self {
            CleanTarget::Orphans => "orphans",
            CleanTarget::Other(s) => s,
        }
    }
}

impl FromStr for CleanTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "orphans" => CleanTarget::Orphans,
            other => CleanTarget::Other(other.to_string()),
        })
    }
}

impl fmt::Display for CleanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CleanTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CleanTarget {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "orphans" => CleanTarget::Orphans,
            _ => CleanTarget::Other(s),
        })
    }
}

/// A deletion that failed for a reason other than the file being gone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one cleaning pass.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Orphan files removed.
    #[serde(default)]
    pub deleted: Vec<PathBuf>,
    /// Orphan files that had already vanished when deletion was attempted.
    #[serde(default)]
    pub missing: Vec<PathBuf>,
    #[serde(default)]
    pub failed: Vec<FailedDeletion>,
    /// Orphans found during a dry run; nothing was removed.
    #[serde(default)]
    pub planned: Vec<PathBuf>,
    /// The pass did not run (target disabled or directory absent).
    #[serde(default)]
    pub skipped: bool,
    /// Set when the generated directory could not be listed.
    #[serde(default)]
    pub listing_error: Option<String>,
}

impl CleanReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }

    /// True when nothing went wrong: no failed deletions and the directory
    /// could be listed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.listing_error.is_none()
    }

    /// Number of orphans this pass dealt with in any way.
    pub fn total(&self) -> usize {
        self.deleted.len() + self.missing.len() + self.failed.len() + self.planned.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_ignores_extra_fields() {
        let step: Step =
            serde_json::from_str(r#"{"id":"a1","title":"Open page","code":"x()"}"#).unwrap();
        assert_eq!(step, Step::new("a1"));
    }

    #[test]
    fn clean_target_parses_reserved_values() {
        let targets: Vec<CleanTarget> =
            serde_json::from_str(r#"["orphans","unused-assets"]"#).unwrap();
        assert_eq!(
            targets,
            vec![
                CleanTarget::Orphans,
                CleanTarget::Other("unused-assets".into())
            ]
        );
        assert_eq!(serde_json::to_string(&targets[0]).unwrap(), r#""orphans""#);
    }

    #[test]
    fn report_counts() {
        let report = CleanReport {
            deleted: vec!["a".into()],
            missing: vec!["b".into()],
            failed: vec![FailedDeletion {
                path: "c".into(),
                error: "denied".into(),
            }],
            ..Default::default()
        };
        assert_eq!(report.total(), 3);
        assert!(!report.is_clean());
        assert!(CleanReport::skipped().is_clean());
    }
}
