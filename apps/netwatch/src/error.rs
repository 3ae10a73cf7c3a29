use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0:#}")]
    Read(#[source] IoError),
    #[error("failed to write config file: {0:#}")]
    Write(#[source] IoError),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config path available -- set XDG_CONFIG_HOME or HOME")]
    PathUnavailable,
}

#[derive(Debug, Error)]
pub enum HostsError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("no valid targets found in {}", path.display())]
    NoTargets { path: PathBuf },
}
