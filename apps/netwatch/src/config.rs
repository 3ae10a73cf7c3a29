use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: Probe,
    pub hosts: Hosts,
    pub ui: Ui,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub permission_cooldown_secs: u64,
    pub history_size: usize,
    pub max_workers: usize,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            timeout_secs: 2,
            permission_cooldown_secs: 5,
            history_size: 10,
            max_workers: 50,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Hosts {
    pub file: path::PathBuf,
}

impl Default for Hosts {
    fn default() -> Self {
        Self { file: "hosts.txt".into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Ui {
    pub tick_ms: u64,
}

impl Default for Ui {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/netwatch/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::PathUnavailable);
    };

    Ok(path.join("netwatch/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Probe")?;
        write_1(f, "Interval (s)", &self.probe.interval_secs)?;
        write_1(f, "Timeout (s)", &self.probe.timeout_secs)?;
        write_1(f, "Permission Cooldown (s)", &self.probe.permission_cooldown_secs)?;
        write_1(f, "History Size", &self.probe.history_size)?;
        write_1(f, "Max Workers", &self.probe.max_workers)?;
        write_title_1(f, "Hosts")?;
        write_1(f, "File", &self.hosts.file.display())?;
        write_title_1(f, "UI")?;
        write_1(f, "Tick (ms)", &self.ui.tick_ms)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/netwatch/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }

        fs::write(path, config_str).map_err(ConfigError::Write)
    }
}
