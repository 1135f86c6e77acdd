// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-project export and import.
//!
//! A project (with all its comments) can be written out as YAML or JSON and
//! read back, which is how reviews are shared between machines.

use crate::models::project::Project;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Export a project to YAML format.
pub fn export_yaml(project: &Project, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(project)?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export a project to JSON format.
pub fn export_json(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import a project from YAML format.
pub fn import_yaml(path: &Path) -> Result<Project> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let project = serde_yaml::from_str(&yaml)?;
    Ok(project)
}

/// Import a project from JSON format.
pub fn import_json(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let project = serde_json::from_str(&json)?;
    Ok(project)
}

/// Export choosing the format from the file extension.
pub fn export_project(project: &Project, path: &Path) -> Result<()> {
    match extension(path).as_deref() {
        Some("yaml") | Some("yml") => export_yaml(project, path),
        Some("json") => export_json(project, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import choosing the format from the file extension.
pub fn import_project(path: &Path) -> Result<Project> {
    match extension(path).as_deref() {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}
