mod error;
mod game;
mod grid;
mod input;
mod snake;
mod term;

use std::{fs::File, path::Path, process::exit, time::Duration};

use clap::Parser;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::game::{GameOver, Settings, SnakeGame, ROWS};
use crate::term::{TermManager, TerminalGuard};

pub type TermInt = u16;
/// (row, col) on the playfield
pub type Coords = (TermInt, TermInt);

#[derive(Parser, Debug)]
#[command(version, about = "Nibbles in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Time between two moves of the snake, like `30ms` or `1s`; bare numbers are milliseconds
    #[arg(short = 's', long = "speed", default_value = "30ms", value_parser = parse_tick)]
    speed: Duration,

    /// Name of the player
    #[arg(short = 'p', long = "player", default_value = "Nibbles")]
    player: String,

    /// Number of random wall/food pairs placed on the board
    #[arg(short = 'r', long = "random", default_value_t = 0)]
    random: u32,

    /// Starting length of the snake, not counting its head
    #[arg(short = 'l', long = "length", default_value_t = 0)]
    length: usize,

    /// Write the log to this file (the terminal is busy with the game)
    #[arg(long)]
    log_file: Option<std::path::PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logger(path, args.verbose.log_level_filter());
    }

    let settings = Settings {
        tick: args.speed,
        player: args.player,
        scatter: args.random,
        extra_length: args.length,
        ..Settings::default()
    };

    match run(settings) {
        Ok((over, length, score)) => {
            println!("Game over, {}. Length: {}, score: {}", over.describe(), length, score);
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("nibbles: {}", e);
            exit(1);
        }
    }
}

fn run(settings: Settings) -> error::Result<(GameOver, usize, u32)> {
    // Nothing is drawn before raw mode is in place; failing here is fatal
    let _guard = TerminalGuard::acquire()?;

    let keys = input::spawn(input::terminal_keys());
    let mut game = SnakeGame::new(settings, TermManager::stdout(ROWS), keys, rand::thread_rng());
    game.setup()?;

    let over = game.play()?;
    Ok((over, game.length(), game.score()))
}

fn parse_tick(arg: &str) -> Result<Duration, humantime::DurationError> {
    match arg.trim().parse::<u64>() {
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(_) => humantime::parse_duration(arg),
    }
}

fn init_logger(path: &Path, level: LevelFilter) {
    let res = File::create(path).map(|file| WriteLogger::init(level, Config::default(), file));

    match res {
        Ok(Ok(())) => log::info!("Starting nibbles"),
        Ok(Err(e)) => eprintln!("nibbles: could not set up logging: {}", e),
        Err(e) => eprintln!("nibbles: could not create {}: {}", path.display(), e),
    }
}
