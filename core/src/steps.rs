use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use steps_api::Step;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepsError {
    #[error("failed to read steps file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid steps file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Accepted layouts of a steps file: a bare array of step records, or a
/// pack manifest object carrying them under `steps`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StepsFile {
    List(Vec<Step>),
    Manifest { steps: Vec<Step> },
}

/// Load the authoritative step list from a JSON file.
pub fn load_steps<P: AsRef<Path>>(path: P) -> Result<Vec<Step>, StepsError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| StepsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: StepsFile = serde_json::from_slice(&bytes).map_err(|source| StepsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match file {
        StepsFile::List(steps) | StepsFile::Manifest { steps } => steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_array_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        fs::write(&list, r#"[{"id":"a1"},{"id":"b2","name":"Click"}]"#).unwrap();
        let manifest = dir.path().join("pack.json");
        fs::write(&manifest, r#"{"name":"demo","steps":[{"id":"c3"}]}"#).unwrap();

        let ids: Vec<String> = load_steps(&list).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["a1", "b2"]);
        assert_eq!(load_steps(&manifest).unwrap(), vec![Step::new("c3")]);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_steps(dir.path().join("nope.json")),
            Err(StepsError::Read { .. })
        ));
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"steps":"a1"}"#).unwrap();
        assert!(matches!(load_steps(&bad), Err(StepsError::Parse { .. })));
    }
}
