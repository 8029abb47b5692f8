//! Configuration loading and parsing.
//!
//! `termpane.toml` is looked up in the working directory, then in the
//! platform config directory (`<config_dir>/termpane/termpane.toml`); the
//! binary's `--config` flag overrides discovery. A missing file yields the
//! defaults. A file that cannot be read or parsed is an error, as is a
//! region that fails validation: nothing required is silently defaulted.

pub mod schema;

pub use schema::{
    BackendName, BorderConfig, ColourConfig, ConfigFile, EventsConfig, LogConfig, ModeName,
    RegionConfig, RemoteConfig, RenderConfig, TerminalConfig,
};

use core_geometry::Canvas;
use core_model::{BuildError, RegionSpec};
use std::io::ErrorKind;
use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::info;

pub const FILE_NAME: &str = "termpane.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the configuration came from; `None` when defaults were used.
    pub path: Option<PathBuf>,
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("termpane").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    parse(&content, path)
}

fn parse(content: &str, path: PathBuf) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    info!(
        target: "config",
        path = %path.display(),
        regions = file.regions.len(),
        mode = ?file.terminal.mode,
        "config_loaded"
    );
    Ok(Config {
        path: Some(path),
        raw: Some(content.to_string()),
        file,
    })
}

impl Config {
    /// Region specs in file order.
    pub fn region_specs(&self) -> Vec<RegionSpec> {
        self.file.regions.iter().map(RegionConfig::to_spec).collect()
    }

    /// Build every region against `canvas`, failing on the first invalid one.
    pub fn validate(&self, canvas: Canvas) -> Result<(), ConfigError> {
        for spec in self.region_specs() {
            spec.build(canvas)?;
        }
        Ok(())
    }

    /// The configured fixed canvas, when both dimensions are set.
    pub fn fixed_canvas(&self) -> Option<Canvas> {
        let terminal = &self.file.terminal;
        Some(Canvas::new(terminal.height?, terminal.width?))
    }
}
