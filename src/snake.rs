use crate::Coords;
use std::collections::VecDeque;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Up),
            'a' => Some(Left),
            's' => Some(Down),
            'd' => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// The neighbouring cell in this direction. Nothing is clamped here: the walls
    /// around the grid end the game before the head could leave it.
    pub fn step(self, (row, col): Coords) -> Coords {
        match self {
            Up => (row - 1, col),
            Down => (row + 1, col),
            Left => (row, col - 1),
            Right => (row, col + 1),
        }
    }
}

/// Body segments, head first. `length` is how many segments are alive; it only
/// grows, and never past `capacity`.
pub struct Snake {
    body: VecDeque<Coords>,
    length: usize,
    capacity: usize,
    direction: Option<Direction>,
}

impl Snake {
    pub fn new(head: Coords, length: usize, capacity: usize) -> Self {
        let mut body = VecDeque::with_capacity(capacity + 1);
        body.push_front(head);
        let length = length.clamp(1, capacity.max(1));

        Snake { body, length, capacity, direction: None }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    #[cfg(test)]
    pub fn body(&self) -> impl Iterator<Item = &Coords> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Whether a direction has been committed. Until then the snake sits still.
    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    /// Commits a new direction unless it would turn the snake back into its neck.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        match self.direction {
            Some(current) if current == new_direction.opposite() => false,
            _ => {
                self.direction = Some(new_direction);
                true
            }
        }
    }

    /// Moves the head to `new_head`. Returns the tail segment that fell off the end,
    /// if the snake is already as long as it is allowed to be.
    pub fn advance(&mut self, new_head: Coords) -> Option<Coords> {
        self.body.push_front(new_head);

        if self.body.len() > self.length {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn grow(&mut self) -> bool {
        if self.length < self.capacity {
            self.length += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_directions() {
        assert_eq!(Direction::from_key('w'), Some(Up));
        assert_eq!(Direction::from_key('a'), Some(Left));
        assert_eq!(Direction::from_key('s'), Some(Down));
        assert_eq!(Direction::from_key('d'), Some(Right));
        assert_eq!(Direction::from_key('x'), None);
        assert_eq!(Direction::from_key('q'), None);
    }

    #[test]
    fn step_applies_unit_offsets() {
        assert_eq!(Up.step((12, 40)), (11, 40));
        assert_eq!(Down.step((12, 40)), (13, 40));
        assert_eq!(Left.step((12, 40)), (12, 39));
        assert_eq!(Right.step((12, 40)), (12, 41));
    }

    #[test]
    fn first_direction_is_always_accepted() {
        for dir in [Up, Down, Left, Right].iter() {
            let mut snake = Snake::new((5, 5), 1, 8);
            assert!(snake.set_direction(*dir));
            assert_eq!(snake.direction(), Some(*dir));
        }
    }

    #[test]
    fn reversal_is_rejected() {
        let mut snake = Snake::new((5, 5), 1, 8);
        snake.set_direction(Right);

        assert!(!snake.set_direction(Left));
        assert_eq!(snake.direction(), Some(Right));

        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.direction(), Some(Up));
    }

    #[test]
    fn advance_drops_the_tail_once_full() {
        let mut snake = Snake::new((5, 5), 3, 8);

        assert_eq!(snake.advance((5, 6)), None);
        assert_eq!(snake.advance((5, 7)), None);
        assert_eq!(snake.advance((5, 8)), Some((5, 5)));

        let body: Vec<Coords> = snake.body().copied().collect();
        assert_eq!(body, vec![(5, 8), (5, 7), (5, 6)]);
        assert_eq!(snake.head(), (5, 8));
    }

    #[test]
    fn segments_stay_adjacent() {
        let mut snake = Snake::new((5, 5), 4, 8);
        snake.set_direction(Right);
        for _ in 0..10 {
            let next = Right.step(snake.head());
            snake.advance(next);
        }

        let body: Vec<Coords> = snake.body().copied().collect();
        for pair in body.windows(2) {
            let rows = (pair[0].0 as i32 - pair[1].0 as i32).abs();
            let cols = (pair[0].1 as i32 - pair[1].1 as i32).abs();
            let dist = rows + cols;
            assert_eq!(dist, 1);
        }
    }

    #[test]
    fn growing_keeps_the_tail_for_one_move() {
        let mut snake = Snake::new((5, 5), 1, 8);
        assert!(snake.grow());

        assert_eq!(snake.advance((5, 6)), None);
        assert_eq!(snake.advance((5, 7)), Some((5, 5)));
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut snake = Snake::new((5, 5), 1, 16);

        for i in 0..100 {
            snake.grow();
            snake.advance((5, 6 + i));
            assert!(snake.len() <= snake.capacity());
            assert!(snake.body().count() <= snake.capacity());
        }

        assert_eq!(snake.len(), 16);
        assert!(!snake.grow());
    }

    #[test]
    fn starting_length_is_clamped() {
        assert_eq!(Snake::new((5, 5), 0, 8).len(), 1);
        assert_eq!(Snake::new((5, 5), 500, 8).len(), 8);
    }
}
