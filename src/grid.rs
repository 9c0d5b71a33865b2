use crate::error::Result;
use crate::term::TermManager;
use crate::{Coords, TermInt};
use std::io::Write;

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Snake,
    Food,
}

/// The playfield. The outermost rows and columns are walls and stay that way.
pub struct Grid {
    rows: TermInt,
    cols: TermInt,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: TermInt, cols: TermInt) -> Self {
        assert!(rows > 2 && cols > 2, "grid has no interior");

        let cells = vec![Cell::Empty; rows as usize * cols as usize];
        let mut grid = Grid { rows, cols, cells };
        grid.initialize();
        grid
    }

    pub fn initialize(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = self.index((row, col));
                self.cells[idx] = if self.is_border((row, col)) { Cell::Wall } else { Cell::Empty };
            }
        }
    }

    pub fn at(&self, pos: Coords) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn is_border(&self, (row, col): Coords) -> bool {
        row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1
    }

    /// Sets a cell and draws it. Snake segments can only be cleared, never covered,
    /// and the border is left alone. Returns whether anything changed.
    pub fn place<W: Write>(
        &mut self,
        pos: Coords,
        cell: Cell,
        term: &mut TermManager<W>,
    ) -> Result<bool> {
        let current = self.at(pos);

        if (current == Cell::Snake && cell != Cell::Empty) || self.is_border(pos) {
            return Ok(false);
        }

        let idx = self.index(pos);
        self.cells[idx] = cell;
        term.print_cell(pos, cell)?;
        Ok(true)
    }

    /// Draws every non-empty cell, used once when the screen is set up.
    pub fn draw<W: Write>(&self, term: &mut TermManager<W>) -> Result<()> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.at((row, col));
                if cell != Cell::Empty {
                    term.print_cell((row, col), cell)?;
                }
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    pub fn random_interior<R: Rng>(&self, rng: &mut R) -> Coords {
        (rng.gen_range(1..self.rows - 1), rng.gen_range(1..self.cols - 1))
    }

    pub fn random_empty<R: Rng>(&self, rng: &mut R) -> Option<Coords> {
        let choices: Vec<Coords> = (1..self.rows - 1)
            .flat_map(|row| (1..self.cols - 1).map(move |col| (row, col)))
            .filter(|pos| self.at(*pos) == Cell::Empty)
            .collect();

        choices.choose(rng).copied()
    }

    #[cfg(test)]
    pub fn force(&mut self, pos: Coords, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, (row, col): Coords) -> usize {
        assert!(row < self.rows && col < self.cols, "({}, {}) is off the grid", row, col);
        self.cols as usize * row as usize + col as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn term() -> TermManager<Vec<u8>> {
        TermManager::new(Vec::new(), 25)
    }

    #[test]
    fn initialize_walls_the_border_only() {
        let grid = Grid::new(5, 6);

        assert_eq!(grid.count(Cell::Wall), 2 * 6 + 2 * 3);
        assert_eq!(grid.count(Cell::Empty), 3 * 4);
        assert_eq!(grid.at((0, 3)), Cell::Wall);
        assert_eq!(grid.at((4, 5)), Cell::Wall);
        assert_eq!(grid.at((2, 0)), Cell::Wall);
        assert_eq!(grid.at((2, 2)), Cell::Empty);
    }

    #[test]
    fn place_sets_cell_and_draws_it() {
        let mut grid = Grid::new(25, 80);
        let mut term = term();

        assert!(grid.place((5, 10), Cell::Food, &mut term).unwrap());

        assert_eq!(grid.at((5, 10)), Cell::Food);
        assert!(String::from_utf8_lossy(term.output()).contains('*'));
    }

    #[test]
    fn place_never_covers_snake() {
        let mut grid = Grid::new(25, 80);
        let mut term = term();
        grid.place((5, 10), Cell::Snake, &mut term).unwrap();
        let drawn = term.output().len();

        assert!(!grid.place((5, 10), Cell::Food, &mut term).unwrap());
        assert!(!grid.place((5, 10), Cell::Wall, &mut term).unwrap());
        assert!(!grid.place((5, 10), Cell::Snake, &mut term).unwrap());

        assert_eq!(grid.at((5, 10)), Cell::Snake);
        assert_eq!(term.output().len(), drawn);
    }

    #[test]
    fn place_empty_clears_snake() {
        let mut grid = Grid::new(25, 80);
        let mut term = term();
        grid.place((5, 10), Cell::Snake, &mut term).unwrap();

        assert!(grid.place((5, 10), Cell::Empty, &mut term).unwrap());
        assert_eq!(grid.at((5, 10)), Cell::Empty);
    }

    #[test]
    fn border_is_never_overwritten() {
        let mut grid = Grid::new(25, 80);
        let mut term = term();

        assert!(!grid.place((0, 40), Cell::Snake, &mut term).unwrap());
        assert!(!grid.place((12, 79), Cell::Empty, &mut term).unwrap());

        assert_eq!(grid.at((0, 40)), Cell::Wall);
        assert_eq!(grid.at((12, 79)), Cell::Wall);
        assert!(term.output().is_empty());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_access_panics() {
        let grid = Grid::new(25, 80);
        grid.at((25, 0));
    }

    #[test]
    fn random_interior_stays_off_the_border() {
        let grid = Grid::new(25, 80);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5000 {
            let pos = grid.random_interior(&mut rng);
            assert!(!grid.is_border(pos), "{:?}", pos);
            assert!(pos.0 < 25 && pos.1 < 80);
        }
    }

    #[test]
    fn random_interior_reaches_cells_next_to_the_border() {
        let grid = Grid::new(4, 4);
        let mut rng = StdRng::seed_from_u64(1);

        let mut seen = Vec::new();
        for _ in 0..200 {
            let pos = grid.random_interior(&mut rng);
            if !seen.contains(&pos) {
                seen.push(pos);
            }
        }

        seen.sort();
        assert_eq!(seen, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn random_empty_picks_the_last_free_cell() {
        let mut grid = Grid::new(4, 4);
        grid.force((1, 1), Cell::Snake);
        grid.force((1, 2), Cell::Wall);
        grid.force((2, 1), Cell::Food);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(grid.random_empty(&mut rng), Some((2, 2)));

        grid.force((2, 2), Cell::Snake);
        assert_eq!(grid.random_empty(&mut rng), None);
    }
}
