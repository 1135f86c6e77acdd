// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Kozy - video review tool
//!
//! A cross-platform desktop application for reviewing videos with
//! timestamped, categorized comments and tracking their resolution.

mod app;
mod ui;

use anyhow::Result;
use app::KozyApp;
use kozy::config::Settings;
use kozy::io::{blob_store::FsBlobStore, project_store::JsonProjectStore};
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load()?;
    log::info!("Using data directory {}", settings.data_dir.display());

    let repository = JsonProjectStore::open(&settings.data_dir)?;
    let blobs = FsBlobStore::open(&settings.videos_dir())?;
    let app = KozyApp::new(settings, Box::new(repository), Arc::new(blobs));

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Kozy - Video Review"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native("Kozy", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
