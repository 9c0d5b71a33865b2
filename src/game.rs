use std::io::Write;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::{thread::sleep, time::Duration};

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::input::QUIT_KEY;
use crate::snake::{Direction, Snake};
use crate::term::TermManager;
use crate::{Coords, TermInt};

use rand::Rng;

pub const ROWS: TermInt = 25;
pub const COLS: TermInt = 80;
pub const START_HEAD: Coords = (12, 40);

const MAX_SNAKE_LENGTH: usize = 256;
const FOOD_SCORE: u32 = 10;
const PLACEMENT_ATTEMPTS: usize = 32;

pub struct Settings {
    pub tick: Duration,
    pub player: String,
    /// Wall/food pairs scattered over the board before the first tick
    pub scatter: u32,
    /// Segments behind the head when the snake starts moving
    pub extra_length: usize,
    pub start: Coords,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tick: Duration::from_millis(30),
            player: "Nibbles".to_string(),
            scatter: 0,
            extra_length: 0,
            start: START_HEAD,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOver {
    Quit,
    HitWall,
    HitSelf,
}

impl GameOver {
    pub fn describe(self) -> &'static str {
        match self {
            GameOver::Quit => "quit",
            GameOver::HitWall => "crashed into a wall",
            GameOver::HitSelf => "bit its own tail",
        }
    }
}

pub struct SnakeGame<W: Write, R: Rng> {
    settings: Settings,
    grid: Grid,
    snake: Snake,
    next_head: Coords,
    score: u32,
    keys: Receiver<char>,
    term: TermManager<W>,
    rng: R,
}

impl<W: Write, R: Rng> SnakeGame<W, R> {
    pub fn new(settings: Settings, term: TermManager<W>, keys: Receiver<char>, rng: R) -> Self {
        let grid = Grid::new(ROWS, COLS);
        let length = settings.extra_length.saturating_add(1);
        let snake = Snake::new(settings.start, length, MAX_SNAKE_LENGTH);
        let next_head = settings.start;

        SnakeGame { settings, grid, snake, next_head, score: 0, keys, term, rng }
    }

    /// Draws the board, seeds the snake at its start cell and lays out the food
    /// and any scattered obstacles.
    pub fn setup(&mut self) -> Result<()> {
        self.term.clear()?;
        self.grid.draw(&mut self.term)?;
        self.grid.place(self.settings.start, Cell::Snake, &mut self.term)?;

        for _ in 0..self.settings.scatter {
            self.place_random(Cell::Wall)?;
            self.place_random(Cell::Food)?;
        }
        self.place_random(Cell::Food)?;

        self.term.print_score(self.tail_length(), self.score)?;
        self.term.print_player(&self.settings.player)?;
        self.term.flush()?;

        log::info!(
            "game started for {}: tick {:?}, {} scattered pairs, length {}",
            self.settings.player,
            self.settings.tick,
            self.settings.scatter,
            self.snake.len()
        );
        Ok(())
    }

    pub fn play(&mut self) -> Result<GameOver> {
        loop {
            sleep(self.settings.tick);

            if let Some(over) = self.tick()? {
                log::info!(
                    "game over ({}): length {}, score {}",
                    over.describe(),
                    self.snake.len(),
                    self.score
                );
                return Ok(over);
            }
        }
    }

    /// One step of the simulation, without the wait in front of it.
    pub fn tick(&mut self) -> Result<Option<GameOver>> {
        let result = self.step();
        self.term.flush()?;
        result
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn length(&self) -> usize {
        self.snake.len()
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Segments behind the head, the number the status line shows as `L`.
    fn tail_length(&self) -> usize {
        self.snake.len() - 1
    }

    fn step(&mut self) -> Result<Option<GameOver>> {
        // Until a direction is committed the snake sits on its pre-seeded start
        // cell, and whatever is under it must not count as a collision.
        let moving = self.snake.is_moving();

        let vacated = if moving { self.snake.advance(self.next_head) } else { None };
        let head = self.snake.head();
        self.term.print_coords(head)?;

        let under_head = if moving { Some(self.grid.at(head)) } else { None };
        self.grid.place(head, Cell::Snake, &mut self.term)?;

        if let Some(tail) = vacated {
            if self.grid.at(tail) == Cell::Snake {
                self.grid.place(tail, Cell::Empty, &mut self.term)?;
            }
        }

        match self.keys.try_recv() {
            Ok(QUIT_KEY) => return Ok(Some(GameOver::Quit)),
            Ok(key) => self.handle_key(key),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        }

        match under_head {
            Some(Cell::Wall) => return Ok(Some(GameOver::HitWall)),
            Some(Cell::Snake) => return Ok(Some(GameOver::HitSelf)),
            Some(Cell::Food) => self.eat()?,
            Some(Cell::Empty) | None => {}
        }

        if let Some(dir) = self.snake.direction() {
            self.next_head = dir.step(head);
        }

        Ok(None)
    }

    fn handle_key(&mut self, key: char) {
        match Direction::from_key(key) {
            Some(dir) => {
                if !self.snake.set_direction(dir) {
                    log::trace!("ignored reversal to {:?}", dir);
                }
            }
            None => log::trace!("ignored key {:?}", key),
        }
    }

    fn eat(&mut self) -> Result<()> {
        if !self.snake.grow() {
            log::debug!("snake is at its maximum length of {}", self.snake.capacity());
        }

        self.score += FOOD_SCORE;
        self.term.print_score(self.tail_length(), self.score)?;
        self.place_random(Cell::Food)?;
        Ok(())
    }

    /// Puts `cell` on a random empty interior cell. A few uniform draws are tried
    /// first; on a crowded board the free cells are enumerated instead.
    fn place_random(&mut self, cell: Cell) -> Result<()> {
        let mut target = None;

        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = self.grid.random_interior(&mut self.rng);
            if self.grid.at(pos) == Cell::Empty {
                target = Some(pos);
                break;
            }
        }

        let target = match target.or_else(|| self.grid.random_empty(&mut self.rng)) {
            Some(pos) => pos,
            None => {
                log::warn!("no free cell left for {:?}", cell);
                return Ok(());
            }
        };

        self.grid.place(target, cell, &mut self.term)?;
        Ok(())
    }
}
