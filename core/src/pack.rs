use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Default root holding one directory per steps pack.
pub const DEFAULT_BASE_DIR: &str = "./stepspacks";

/// Name of the per-pack subdirectory holding generated step files.
pub const GENERATED_DIR: &str = "generated";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackNameError {
    #[error("steps pack name is empty")]
    Empty,
    #[error("steps pack name {0:?} is a relative path component")]
    Relative(String),
    #[error("steps pack name {0:?} contains a path separator")]
    Separator(String),
    #[error("steps pack name {0:?} contains a NUL byte")]
    Nul(String),
    #[error("steps pack name {0:?} must not start with '.'")]
    Hidden(String),
}

/// A steps pack name that is safe to splice into a filesystem path as a
/// single component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackName(String);

impl PackName {
    pub fn new(name: &str) -> Result<Self, PackNameError> {
        if name.is_empty() {
            return Err(PackNameError::Empty);
        }
        if name == "." || name == ".." {
            return Err(PackNameError::Relative(name.to_string()));
        }
        if name.contains(['/', '\\']) {
            return Err(PackNameError::Separator(name.to_string()));
        }
        if name.contains('\0') {
            return Err(PackNameError::Nul(name.to_string()));
        }
        if name.starts_with('.') {
            return Err(PackNameError::Hidden(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PackName {
    type Err = PackNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Directory holding the generated step files of a pack:
/// `<base>/<pack>/generated`.
pub fn generated_dir<P: AsRef<Path>>(base: P, pack: &PackName) -> PathBuf {
    base.as_ref().join(pack.as_str()).join(GENERATED_DIR)
}
