use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use steps_api::CleanTarget;

use crate::{
    cli::GlobalOpts,
    pack::{PackName, DEFAULT_BASE_DIR},
};

/// Runtime configuration resolved from file, env and CLI.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the steps packs.
    pub base_dir: PathBuf,
    pub pack: PackName,
    /// JSON file with the authoritative steps.
    pub steps_file: PathBuf,
    pub targets: Vec<CleanTarget>,
    pub ignore_case: bool,
    pub dry_run: bool,
    pub logging_enabled: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    pack: FilePack,
    #[serde(default)]
    clean: FileClean,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Deserialize, Default)]
struct FilePack {
    name: Option<String>,
    base_dir: Option<PathBuf>,
    steps_file: Option<PathBuf>,
}

#[derive(Deserialize)]
struct FileClean {
    #[serde(default = "default_targets")]
    targets: Vec<CleanTarget>,
    #[serde(default)]
    ignore_case: bool,
    #[serde(default)]
    dry_run: bool,
}

#[derive(Deserialize)]
struct FileLogging {
    #[serde(default = "default_logging")]
    enabled: bool,
}

fn default_targets() -> Vec<CleanTarget> {
    vec![CleanTarget::Orphans]
}

fn default_logging() -> bool {
    true
}

impl Default for FileClean {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            ignore_case: false,
            dry_run: false,
        }
    }
}

impl Default for FileLogging {
    fn default() -> Self {
        Self {
            enabled: default_logging(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI, environment variables, config file and defaults.
    pub fn load(cli: &GlobalOpts) -> Result<Self> {
        // config file path precedence: CLI -> ENV -> default
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("STEPCLEAN_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config/stepclean.toml"));

        let file_cfg = match fs::read(&config_path) {
            Ok(bytes) => {
                let contents = String::from_utf8_lossy(&bytes);
                toml::from_str::<FileConfig>(&contents)
                    .with_context(|| format!("invalid config file {}", config_path.display()))?
            }
            Err(_) => FileConfig::default(),
        };

        let mut pack = file_cfg.pack.name;
        let mut base_dir = file_cfg
            .pack
            .base_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));
        let mut logging = file_cfg.logging.enabled;

        // environment overrides
        if let Ok(p) = std::env::var("STEPCLEAN_PACK") {
            pack = Some(p);
        }
        if let Ok(d) = std::env::var("STEPCLEAN_BASE_DIR") {
            base_dir = PathBuf::from(d);
        }
        if let Ok(l) = std::env::var("STEPCLEAN_LOGGING") {
            if let Ok(l) = l.parse::<bool>() {
                logging = l;
            }
        }

        // CLI overrides
        if let Some(p) = &cli.pack {
            pack = Some(p.clone());
        }
        if let Some(d) = &cli.base_dir {
            base_dir = d.clone();
        }
        if let Some(l) = cli.logging {
            logging = l;
        }

        let pack = pack.context("no steps pack configured")?;
        let pack = PackName::new(&pack).context("invalid steps pack name")?;

        // steps file defaults to the pack's own manifest
        let steps_file = cli
            .steps
            .clone()
            .or(file_cfg.pack.steps_file)
            .unwrap_or_else(|| base_dir.join(pack.as_str()).join("steps.json"));

        Ok(Self {
            base_dir,
            pack,
            steps_file,
            targets: file_cfg.clean.targets,
            ignore_case: file_cfg.clean.ignore_case,
            dry_run: file_cfg.clean.dry_run,
            logging_enabled: logging,
        })
    }
}
