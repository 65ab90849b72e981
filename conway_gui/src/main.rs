// main.rs - Conway's Game of Life on a board of clickable cells

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;

mod app;
mod args;
mod clock;
mod config;
mod headless;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    SimpleLogger::new()
        .with_level(args.log_level)
        .env()
        .init()
        .context("failed to set up logging")?;
    info!("Starting {} v{} ...", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let grid = args.build_grid().context("failed to build the board")?;
    info!(
        "{}x{} board, {} cells alive, speed {}",
        grid.length(),
        grid.width(),
        grid.population(),
        grid.speed()
    );

    if args.headless {
        headless::run(grid, &args)
    } else {
        app::run(grid, &args)
    }
}
