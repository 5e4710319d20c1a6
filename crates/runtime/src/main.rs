#![deny(clippy::all, clippy::pedantic)]
//! `boxsim`: headless driver for the box simulation.

mod app;
mod watcher;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Scene file (JSON). Runs the built-in falling stack when omitted.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    pub frames: usize,

    /// Ticks per frame, overriding the scene
    #[arg(long)]
    pub substeps: Option<u32>,

    /// Cull pairs with the sphere octree when the scene configures none
    #[arg(long)]
    pub broad_phase: bool,

    /// Log progress every N frames (0 disables)
    #[arg(long, default_value_t = 50)]
    pub log_every: usize,

    /// Reload the scene file whenever it changes
    #[arg(long)]
    pub watch: bool,

    /// Milliseconds to sleep after each frame
    #[arg(long, default_value_t = 0)]
    pub frame_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let summary = app::run(&args)?;
    summary.log();
    Ok(())
}
