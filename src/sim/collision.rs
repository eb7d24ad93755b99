//! Collision classification and resolution
//!
//! The pending head cell is classified before anything moves, so active
//! effects can veto an outcome without undoing state.
//!
//! Precedence, applied once here and nowhere else:
//! 1. Wall (outside the grid)
//! 2. Obstacle
//! 3. Self (body minus a vacating tail); skipped entirely under Ghost Mode
//! 4. Food, else a clear move
//!
//! Resolution: a Shield absorbs Wall and Obstacle hits only. Self hits are
//! always fatal.

use super::grid::{Cell, GridWorld};

/// Hazards in the order they are checked
pub const HAZARD_ORDER: [Collision; 3] = [Collision::Wall, Collision::Obstacle, Collision::SelfHit];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    Food,
    Wall,
    Obstacle,
    SelfHit,
}

impl Collision {
    pub fn is_hazard(self) -> bool {
        matches!(self, Collision::Wall | Collision::Obstacle | Collision::SelfHit)
    }

    /// Whether a Shield may absorb this hit
    pub fn shieldable(self) -> bool {
        matches!(self, Collision::Wall | Collision::Obstacle)
    }

    /// Reason shown on the death screen
    pub fn reason(self) -> &'static str {
        match self {
            Collision::Wall => "wall",
            Collision::Obstacle => "obstacle",
            Collision::SelfHit => "self",
            Collision::None | Collision::Food => "",
        }
    }
}

/// What the move step should do with a classified cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Head advances; `ate` when the cell held the apple
    Advance { ate: bool },
    /// Shield spent, head stays put
    Absorbed(Collision),
    /// Round over
    Fatal(Collision),
}

fn hits(world: &GridWorld, next: Cell, hazard: Collision, ghost: bool) -> bool {
    match hazard {
        Collision::Wall => !next.in_bounds(),
        Collision::Obstacle => world.is_obstacle(next),
        Collision::SelfHit => {
            if ghost {
                return false;
            }
            let body = world.snake.body();
            let checked = if world.snake.tail_vacates() {
                &body[..body.len() - 1]
            } else {
                body
            };
            checked.contains(&next)
        }
        Collision::None | Collision::Food => false,
    }
}

/// Classify the cell the head is about to enter
pub fn classify(world: &GridWorld, next: Cell, ghost: bool) -> Collision {
    HAZARD_ORDER
        .into_iter()
        .find(|&hazard| hits(world, next, hazard, ghost))
        .unwrap_or(if next == world.food.cell {
            Collision::Food
        } else {
            Collision::None
        })
}

/// Apply the shield rule to a classification
pub fn resolve(collision: Collision, shield_active: bool) -> Resolution {
    match collision {
        Collision::None => Resolution::Advance { ate: false },
        Collision::Food => Resolution::Advance { ate: true },
        hit if shield_active && hit.shieldable() => Resolution::Absorbed(hit),
        hit => Resolution::Fatal(hit),
    }
}
