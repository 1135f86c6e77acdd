// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings live in `settings.yaml` under the platform config directory.
//! A missing file means defaults; `KOZY_DATA_DIR` overrides where projects
//! and cached videos are kept.

use crate::playback::overlay::DEFAULT_WINDOW;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "kozy";
const SETTINGS_FILE: &str = "settings.yaml";
const DATA_DIR_ENV: &str = "KOZY_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `projects.json` and the `videos/` blob directory live.
    pub data_dir: PathBuf,
    /// Seconds a comment stays on screen after its timestamp.
    pub overlay_window_secs: f64,
    /// Undo steps kept per editing session.
    pub history_limit: usize,
    /// Timeline length used when a project does not know its video duration.
    pub default_duration_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            overlay_window_secs: DEFAULT_WINDOW,
            history_limit: 50,
            default_duration_secs: 300.0,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default location of the settings file.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

impl Settings {
    /// Load settings from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            settings.data_dir = PathBuf::from(dir);
        }
        Ok(settings.sanitized())
    }

    /// Load settings from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.data_dir.join("videos")
    }

    fn sanitized(mut self) -> Self {
        if !(self.overlay_window_secs.is_finite() && self.overlay_window_secs >= 0.0) {
            log::warn!(
                "Ignoring overlay window {}, using {}",
                self.overlay_window_secs,
                DEFAULT_WINDOW
            );
            self.overlay_window_secs = DEFAULT_WINDOW;
        }
        if !(self.default_duration_secs.is_finite() && self.default_duration_secs > 0.0) {
            self.default_duration_secs = Self::default().default_duration_secs;
        }
        self
    }
}
