//! Point-capture line-strip demo.
//!
//! Clicks are captured into a fixed ring of points, mirrored to GPU vertex
//! memory and drawn every frame as one connected strip. The core modules
//! (`points`, `controller`, `sync`, `pipeline`, `renderer`) only see the
//! [`gfx::GraphicsDevice`] seam; `wgpu_device` implements it on top of the
//! engine's GPU context.

pub mod app;
pub mod config;
pub mod controller;
pub mod gfx;
pub mod pipeline;
pub mod point;
pub mod points;
pub mod renderer;
pub mod shaders;
pub mod sync;
pub mod wgpu_device;

#[cfg(test)]
mod testing;

use anyhow::Result;
use curves_engine::window::Runtime;

use crate::app::CurvesApp;
use crate::config::CurvesConfig;

/// Opens the window and runs until exit or a fatal error.
pub fn run(config: CurvesConfig) -> Result<()> {
    log::info!(
        "starting {} ({}x{})",
        config.window.title,
        config.window.initial_size.width,
        config.window.initial_size.height,
    );

    let window = config.window.clone();
    let gpu = config.gpu.clone();
    Runtime::run(window, gpu, CurvesApp::new(config))
}

/// The one line printed to stderr for a fatal error: the whole context chain.
///
/// Logging happens where the error stops the runtime, not here.
pub fn fatal_message(err: &anyhow::Error) -> String {
    format!("curves: {err:#}")
}
