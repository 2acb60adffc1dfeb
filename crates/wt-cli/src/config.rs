//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wt_core::{CategoryTitles, WorkCalendar, WorkSettings};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one `<calendar_id>.json` event export per calendar.
    pub events_dir: PathBuf,

    /// Calendar to report on when none is given on the command line.
    pub calendar_id: String,

    /// Work days and daily work windows.
    #[serde(default)]
    pub calendar: WorkCalendar,

    /// Reserved event titles for leave, support and improvement.
    #[serde(default)]
    pub titles: CategoryTitles,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            events_dir: data_dir.join("events"),
            calendar_id: "primary".to_string(),
            calendar: WorkCalendar::default(),
            titles: CategoryTitles::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WT_*, nested keys split on "__")
        figment = figment.merge(Env::prefixed("WT_").split("__"));

        figment.extract()
    }

    /// The settings snapshot handed to the calculator.
    pub fn settings(&self) -> WorkSettings {
        WorkSettings {
            calendar: self.calendar.clone(),
            titles: self.titles.clone(),
        }
    }
}

/// Returns the platform-specific config directory for wt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wt"))
}

/// Returns the platform-specific data directory for wt.
///
/// On Linux: `~/.local/share/wt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wt"))
}
