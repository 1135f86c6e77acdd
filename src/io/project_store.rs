// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Durable storage for the project library.
//!
//! The whole library is loaded once at startup and written back after every
//! change. Callers mutate in memory first and then call [`ProjectRepository::save_all`];
//! a failed save leaves the in-memory state untouched.

use crate::models::project::Project;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const PROJECTS_FILE: &str = "projects.json";

/// Persistent mapping of every project.
pub trait ProjectRepository {
    /// Load every stored project in saved order.
    fn load_all(&self) -> Result<Vec<Project>>;

    /// Replace the stored projects with `projects`.
    fn save_all(&self, projects: &[Project]) -> Result<()>;
}

/// Projects stored as a single pretty-printed JSON array.
pub struct JsonProjectStore {
    path: PathBuf,
}

impl JsonProjectStore {
    /// Store `projects.json` inside `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(Self {
            path: data_dir.join(PROJECTS_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectRepository for JsonProjectStore {
    fn load_all(&self) -> Result<Vec<Project>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        // An unreadable document must not keep the application from starting
        match serde_json::from_str::<Vec<Project>>(&json) {
            Ok(projects) => {
                log::info!("Loaded {} projects from {}", projects.len(), self.path.display());
                Ok(projects)
            }
            Err(e) => {
                log::error!("Failed to parse projects in {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save_all(&self, projects: &[Project]) -> Result<()> {
        let json = serde_json::to_string_pretty(projects)?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        log::debug!("Saved {} projects", projects.len());
        Ok(())
    }
}

/// Repository kept entirely in memory.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: Mutex<Vec<Project>>,
}

impl ProjectRepository for MemoryProjectStore {
    fn load_all(&self) -> Result<Vec<Project>> {
        let projects = self
            .projects
            .lock()
            .map_err(|_| anyhow::anyhow!("project store lock poisoned"))?;
        Ok(projects.clone())
    }

    fn save_all(&self, projects: &[Project]) -> Result<()> {
        let mut stored = self
            .projects
            .lock()
            .map_err(|_| anyhow::anyhow!("project store lock poisoned"))?;
        *stored = projects.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::{Category, Priority};
    use crate::models::session::Session;

    fn projects() -> Vec<Project> {
        let session = Session::new("qa").unwrap();
        let mut a = Project::new("A".into(), "file:///a.mp4".into(), String::new());
        a.comments
            .add(2.0, "flash frame", &session, Category::Bug, Priority::High)
            .unwrap();
        let b = Project::new("B".into(), "file:///b.mp4".into(), String::new());
        vec![a, b]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProjectStore::open(dir.path()).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProjectStore::open(&dir.path().join("nested")).unwrap();
        let saved = projects();

        store.save_all(&saved).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, saved);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProjectStore::open(dir.path()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryProjectStore::default();
        store.save_all(&projects()).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 2);
    }
}
