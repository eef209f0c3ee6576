// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MEDS - Meme Editing and Design Studio
//!
//! A cross-platform desktop application for composing memes on an infinite
//! pannable canvas: place images, draw on them, add styled text, group,
//! and export selected regions.

mod app;
mod engine;
mod error;
mod io;
mod models;
mod text;
mod ui;
mod util;

use anyhow::Result;
use app::MedsApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("MEDS - Meme Editing and Design Studio"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "MEDS",
        options,
        Box::new(|_cc| Ok(Box::new(MedsApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
