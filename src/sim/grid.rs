//! Grid world: snake body, food and obstacle occupancy

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleSet;
use super::rng::RandomSource;
use crate::cell_center;
use crate::consts::*;

/// A grid cell. Coordinates are signed so a step past the border is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Pixel center of this cell
    pub fn center(self) -> Vec2 {
        cell_center(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step; y grows downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Single-slot turn buffer.
///
/// A turn is accepted only while the slot is empty, and only if it is neither
/// the reference direction (queued, else facing) nor its reversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionQueue {
    slot: Option<Direction>,
}

impl DirectionQueue {
    /// Returns true if the turn was buffered
    pub fn push(&mut self, dir: Direction, facing: Direction) -> bool {
        let reference = self.slot.unwrap_or(facing);
        if dir == reference || dir == reference.opposite() {
            return false;
        }
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(dir);
        true
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.slot.take()
    }

    pub fn peek(&self) -> Option<Direction> {
        self.slot
    }

    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    /// Head first
    body: Vec<Cell>,
    /// Body as it was before the last successful move (for interpolation)
    previous: Vec<Cell>,
    pub facing: Direction,
    pub queue: DirectionQueue,
    pub grow_pending: bool,
}

impl Snake {
    /// Round-start snake: length 3, centered, facing right
    pub fn spawn() -> Self {
        let mid = GRID_SIZE / 2;
        let body: Vec<Cell> = (0..START_LENGTH as i32)
            .map(|i| Cell::new(mid - i, mid))
            .collect();
        Self::from_cells(body, Direction::Right)
    }

    /// Build a snake from explicit cells (head first)
    pub fn from_cells(body: Vec<Cell>, facing: Direction) -> Self {
        Self {
            previous: body.clone(),
            body,
            facing,
            queue: DirectionQueue::default(),
            grow_pending: false,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn previous_body(&self) -> &[Cell] {
        &self.previous
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Buffer a turn. Reversals and duplicates are silently dropped.
    pub fn change_direction(&mut self, dir: Direction) -> bool {
        self.queue.push(dir, self.facing)
    }

    /// Adopt any buffered turn and return the cell the head would enter.
    /// Does not move the body.
    pub fn next_head(&mut self) -> Cell {
        if let Some(dir) = self.queue.pop() {
            self.facing = dir;
        }
        self.head().step(self.facing)
    }

    /// Whether the tail cell will be vacated by the next move
    pub fn tail_vacates(&self) -> bool {
        !self.grow_pending
    }

    /// Prepend the new head; drop the tail unless growth is pending
    pub fn advance(&mut self, new_head: Cell) {
        self.previous.clone_from(&self.body);
        self.body.insert(0, new_head);
        if self.grow_pending {
            self.grow_pending = false;
        } else {
            self.body.pop();
        }
    }

    /// Stay in place for a tick; the body no longer interpolates from its last step
    pub fn hold(&mut self) {
        self.previous.clone_from(&self.body);
    }

    pub fn grow(&mut self) {
        self.grow_pending = true;
    }

    /// True when no cell appears twice
    pub fn is_self_disjoint(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.body.len());
        self.body.iter().all(|c| seen.insert(*c))
    }
}

/// The apple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub cell: Cell,
    /// Time of the spawn; drives the pulse animation
    pub spawned_at: u64,
}

impl Food {
    /// Pulse cycles per second
    const PULSE_RATE: f32 = 1.5;

    /// Monotonic pulse phase in radians
    pub fn pulse_phase(&self, now: u64) -> f32 {
        let secs = now.saturating_sub(self.spawned_at) as f32 / 1000.0;
        secs * Self::PULSE_RATE * std::f32::consts::TAU
    }

    /// Drawn size in pixels (cosmetic only)
    pub fn pulse_size(&self, now: u64) -> f32 {
        CELL_SIZE * (0.8 + 0.1 * self.pulse_phase(now).sin())
    }
}

/// Owner of everything that occupies cells
#[derive(Debug, Clone)]
pub struct GridWorld {
    pub snake: Snake,
    pub food: Food,
    pub obstacles: ObstacleSet,
}

impl GridWorld {
    /// Fresh round: centered snake, one apple, then obstacles around both
    pub fn new(rng: &mut RandomSource, obstacle_count: usize, now: u64) -> Self {
        let snake = Snake::spawn();
        let mut world = Self {
            food: Food {
                cell: snake.head(),
                spawned_at: now,
            },
            snake,
            obstacles: ObstacleSet::default(),
        };
        world.respawn_food(rng, now);
        world.obstacles =
            ObstacleSet::generate(rng, obstacle_count, world.snake.body(), world.food.cell);
        world
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(cell)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.contains(cell) || self.obstacles.contains(cell)
    }

    /// Move the apple to a random free cell. Leaves it in place if the board is full.
    pub fn respawn_food(&mut self, rng: &mut RandomSource, now: u64) -> bool {
        let free: Vec<Cell> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.is_occupied(*c))
            .collect();
        match rng.pick(&free) {
            Some(&cell) => {
                self.food = Food {
                    cell,
                    spawned_at: now,
                };
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_layout() {
        let snake = Snake::spawn();
        assert_eq!(
            snake.body(),
            &[Cell::new(15, 15), Cell::new(14, 15), Cell::new(13, 15)]
        );
        assert_eq!(snake.facing, Direction::Right);
        assert!(snake.queue.is_empty());
    }

    #[test]
    fn test_turn_then_move() {
        let mut snake = Snake::spawn();
        assert!(snake.change_direction(Direction::Up));
        let next = snake.next_head();
        snake.advance(next);
        assert_eq!(snake.head(), Cell::new(15, 14));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.facing, Direction::Up);
    }

    #[test]
    fn test_reversal_and_duplicate_rejected() {
        let mut snake = Snake::spawn();
        assert!(!snake.change_direction(Direction::Left));
        assert!(!snake.change_direction(Direction::Right));
        assert!(snake.queue.is_empty());

        assert!(snake.change_direction(Direction::Up));
        assert!(!snake.change_direction(Direction::Up));
        assert!(!snake.change_direction(Direction::Down));
        // Slot full even for a legal follow-up turn
        assert!(!snake.change_direction(Direction::Left));
        assert_eq!(snake.queue.peek(), Some(Direction::Up));
    }

    #[test]
    fn test_growth_skips_tail_once() {
        let mut snake = Snake::spawn();
        snake.grow();
        let next = snake.next_head();
        snake.advance(next);
        assert_eq!(snake.len(), 4);
        assert!(!snake.grow_pending);
        let next = snake.next_head();
        snake.advance(next);
        assert_eq!(snake.len(), 4);
        assert!(snake.is_self_disjoint());
    }

    #[test]
    fn test_food_avoids_snake_and_obstacles() {
        let mut rng = RandomSource::new(3);
        let mut world = GridWorld::new(&mut rng, OBSTACLE_COUNT, 0);
        for t in 0..200 {
            world.respawn_food(&mut rng, t);
            assert!(!world.is_occupied(world.food.cell));
            assert!(world.food.cell.in_bounds());
        }
    }

    #[test]
    fn test_food_pulse_is_cosmetic_and_bounded() {
        let food = Food {
            cell: Cell::new(1, 1),
            spawned_at: 100,
        };
        assert_eq!(food.pulse_phase(100), 0.0);
        assert!(food.pulse_phase(900) > food.pulse_phase(500));
        for t in (100..3000).step_by(37) {
            let s = food.pulse_size(t);
            assert!(s >= CELL_SIZE * 0.7 - 0.001 && s <= CELL_SIZE * 0.9 + 0.001);
        }
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_queue_never_exceeds_one(
            ops in proptest::collection::vec((any_direction(), any::<bool>()), 0..64)
        ) {
            let mut snake = Snake::spawn();
            for (dir, pop) in ops {
                let before = snake.queue.len();
                let reference = snake.queue.peek().unwrap_or(snake.facing);
                let accepted = snake.change_direction(dir);
                if dir == reference || dir == reference.opposite() {
                    prop_assert!(!accepted);
                    prop_assert_eq!(snake.queue.len(), before);
                }
                prop_assert!(snake.queue.len() <= 1);
                if pop {
                    let _ = snake.next_head();
                }
            }
        }

        #[test]
        fn prop_food_spawn_disjoint(seed in any::<u64>()) {
            let mut rng = RandomSource::new(seed);
            let world = GridWorld::new(&mut rng, OBSTACLE_COUNT, 0);
            prop_assert!(!world.snake.contains(world.food.cell));
            prop_assert!(!world.is_obstacle(world.food.cell));
        }
    }
}
