//! Persistent user settings.
//!
//! Stored as JSON at `<config dir>/dataplotter/settings.json`. Missing
//! files and missing fields fall back to defaults, so older settings files
//! keep loading after new fields are added.

use crate::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_HOST, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    MAX_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Launch the default browser once the server is listening
    pub open_browser: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    pub table_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            table_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `<config dir>/dataplotter/settings.json`, if the platform has a config dir
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dataplotter").join("settings.json"))
}

impl Settings {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        default_settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from `path`; unreadable or malformed files yield defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str::<Settings>(&content) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = default_settings_path()
            && let Err(e) = self.save_to(&path)
        {
            tracing::error!("Failed to save settings: {}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// `host:port` for binding the server
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Clamp values that would make the UI unusable
    fn sanitized(mut self) -> Self {
        self.table_page_size = self.table_page_size.clamp(1, MAX_PAGE_SIZE);
        if self.chart_width == 0 {
            self.chart_width = DEFAULT_CHART_WIDTH;
        }
        if self.chart_height == 0 {
            self.chart_height = DEFAULT_CHART_HEIGHT;
        }
        self
    }
}
