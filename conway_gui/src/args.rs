// args.rs - Parsing command-line arguments

use std::num::NonZeroU32;
use std::time::Duration;

use clap::Parser;
use conway::{Coord, Grid, SPEED_MAX, SPEED_MIN};
use log::LevelFilter;

/// Conway's Game of Life on a board whose edges wrap around.
///
/// Click cells to bring them alive, then Step through generations or Continue
/// to let the board run on its own.
#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Args {
    /// Grid length (number of columns)
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub length: u32,

    /// Grid width (number of rows)
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial speed factor
    #[arg(
        short,
        long,
        default_value_t = SPEED_MIN,
        value_parser = clap::value_parser!(u32).range(i64::from(SPEED_MIN)..=i64::from(SPEED_MAX)),
    )]
    pub speed: u32,

    /// Seconds between generations at speed 1
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_interval)]
    pub interval: f64,

    /// A cell to bring alive at start-up, as X,Y (may be repeated)
    #[arg(short, long = "alive", value_name = "X,Y", value_parser = parse_coord)]
    pub alive: Vec<Coord>,

    /// Print generations to the terminal instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many generations
    #[arg(short, long, requires = "headless")]
    pub generations: Option<u32>,

    /// Most verbose log level to show (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    /// The starting board described by the arguments.
    pub fn build_grid(&self) -> Result<Grid, conway::Error> {
        let mut grid = Grid::with_alive(self.length as usize, self.width as usize, &self.alive)?;
        grid.set_speed(NonZeroU32::new(self.speed).unwrap_or(NonZeroU32::MIN));
        Ok(grid)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }
}

fn parse_interval(s: &str) -> Result<f64, String> {
    let seconds: f64 = s.parse().map_err(|err| format!("{err}"))?;
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(String::from("interval must be a non-negative number of seconds"))
    }
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| String::from("expected X,Y"))?;
    let parse = |n: &str| n.trim().parse::<usize>().map_err(|err| format!("{n:?}: {err}"));
    Ok((parse(x)?, parse(y)?))
}
