// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area Editor
//!
//! A desktop tool for marking prioritized rectangular areas of interest on
//! an image and saving them alongside it.

mod app;
mod canvas;
mod cli;
mod config;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::AreaEditorApp;
use clap::Parser;
use cli::Args;
use config::EditorConfig;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = EditorConfig::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);
    log::info!(
        "Canvas limited to {}x{}, edge fuzz {}",
        config.max_width,
        config.max_height,
        config.active_fuzz
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Area Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Area Editor",
        options,
        Box::new(move |cc| Ok(Box::new(AreaEditorApp::new(config, args, &cc.egui_ctx)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
