//! Procedural obstacle placement
//!
//! Shapes are small rectangles (1x1, 2x1, 1x2, 2x2) dropped at random anchors.
//! A candidate is kept only if none of its cells touch the snake, the apple,
//! another shape, the spawn ring or the corridor ahead of the spawn heading.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::rng::RandomSource;
use crate::consts::GRID_SIZE;

/// Keep-out radius (Manhattan) around the spawn head
pub const SPAWN_CLEARANCE: i32 = 3;
/// Corridor kept open ahead of the spawn heading: length, and half-width
pub const CORRIDOR_LENGTH: i32 = 8;
pub const CORRIDOR_HALF_WIDTH: i32 = 1;
/// Anchors stay this far from the border
pub const BORDER_MARGIN: i32 = 2;
/// Total placement attempts per requested shape
pub const ATTEMPTS_PER_SHAPE: usize = 20;

/// A placed rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub origin: Cell,
    pub width: i32,
    pub height: i32,
}

impl Shape {
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).map(move |dx| Cell::new(self.origin.x + dx, self.origin.y + dy))
        })
    }

    /// Draw a footprint: 60% 1x1, 20% 2x1, 10% 1x2, 10% 2x2
    fn random_footprint(rng: &mut RandomSource) -> (i32, i32) {
        let roll = rng.unit();
        if roll < 0.6 {
            (1, 1)
        } else if roll < 0.8 {
            (2, 1)
        } else if roll < 0.9 {
            (1, 2)
        } else {
            (2, 2)
        }
    }
}

/// Obstacles for one round. Immutable once generated.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    shapes: Vec<Shape>,
    cells: HashSet<Cell>,
}

impl ObstacleSet {
    /// Place up to `count` shapes. Gives up after `20 * count` attempts in total,
    /// so the result may hold fewer shapes than requested.
    pub fn generate(
        rng: &mut RandomSource,
        count: usize,
        snake_body: &[Cell],
        food: Cell,
    ) -> Self {
        let mut set = Self::default();
        let Some(&spawn_head) = snake_body.first() else {
            return set;
        };
        let budget = ATTEMPTS_PER_SHAPE * count;
        let mut attempts = 0;

        while set.shapes.len() < count && attempts < budget {
            attempts += 1;
            let (width, height) = Shape::random_footprint(rng);
            let origin = Cell::new(
                rng.range_i32(BORDER_MARGIN, GRID_SIZE - BORDER_MARGIN - width),
                rng.range_i32(BORDER_MARGIN, GRID_SIZE - BORDER_MARGIN - height),
            );
            let shape = Shape {
                origin,
                width,
                height,
            };

            let valid = shape.cells().all(|c| {
                !snake_body.contains(&c)
                    && c != food
                    && !set.cells.contains(&c)
                    && c.manhattan(spawn_head) > SPAWN_CLEARANCE
                    && !in_spawn_corridor(c, spawn_head)
            });
            if valid {
                set.cells.extend(shape.cells());
                set.shapes.push(shape);
            }
        }

        if set.shapes.len() < count {
            log::warn!(
                "Placed {} of {} obstacles after {} attempts",
                set.shapes.len(),
                count,
                attempts
            );
        }
        set
    }

    /// Build a set from known shapes. Overlapping cells are merged.
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let cells = shapes.iter().flat_map(|s| s.cells().collect::<Vec<_>>()).collect();
        Self { shapes, cells }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Rectangle directly ahead (to the right) of the spawn head
fn in_spawn_corridor(cell: Cell, spawn_head: Cell) -> bool {
    let dx = cell.x - spawn_head.x;
    dx >= 1 && dx <= CORRIDOR_LENGTH && (cell.y - spawn_head.y).abs() <= CORRIDOR_HALF_WIDTH
}
