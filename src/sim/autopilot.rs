//! Idle/demo mode - the game plays itself
//!
//! Greedy: among the moves that are not classified as hazards, head for the
//! apple, preferring cells with more open neighbours. The body is treated as
//! solid even under Ghost Mode. Menus are confirmed straight away.

use super::collision::{Resolution, classify, resolve};
use super::grid::{Cell, Direction, GridWorld};
use super::state::{GamePhase, GameState};
use super::tick::Command;

/// Pick this frame's command, if any
pub fn steer(state: &GameState) -> Option<Command> {
    match state.phase {
        GamePhase::Title | GamePhase::PowerupSelection => Some(Command::Confirm),
        GamePhase::Countdown | GamePhase::Playing => choose_turn(state),
        GamePhase::DeathAnimation | GamePhase::GameOver => None,
    }
}

fn choose_turn(state: &GameState) -> Option<Command> {
    let world = &state.round.world;
    let snake = &world.snake;
    if !snake.queue.is_empty() {
        return None;
    }
    let head = snake.head();

    let best = Direction::ALL
        .into_iter()
        .filter(|&d| d != snake.facing.opposite())
        .filter_map(|d| {
            let next = head.step(d);
            match resolve(classify(world, next, false), false) {
                Resolution::Advance { ate } => {
                    let distance = next.manhattan(world.food.cell);
                    let room = open_neighbours(world, next);
                    // Dead ends only when nothing else is left
                    let trapped = i32::from(room == 0 && !ate) * 1_000;
                    Some((trapped + distance - room, d))
                }
                Resolution::Absorbed(_) | Resolution::Fatal(_) => None,
            }
        })
        .min_by_key(|&(cost, _)| cost)
        .map(|(_, d)| d);

    match best {
        Some(dir) if dir != snake.facing => Some(Command::Steer(dir)),
        _ => None,
    }
}

fn open_neighbours(world: &GridWorld, cell: Cell) -> i32 {
    Direction::ALL
        .into_iter()
        .map(|d| cell.step(d))
        .filter(|&c| !classify(world, c, false).is_hazard())
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_MOVE_DELAY_MS;
    use crate::sim::grid::{Food, Snake};
    use crate::sim::obstacles::ObstacleSet;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_avoids_wall() {
        let mut state = GameState::new(3, 0);
        state.phase = GamePhase::Playing;
        state.round.world.obstacles = ObstacleSet::default();
        state.round.world.snake = Snake::from_cells(
            vec![Cell::new(29, 10), Cell::new(28, 10), Cell::new(27, 10)],
            Direction::Right,
        );
        state.round.world.food = Food {
            cell: Cell::new(29, 20),
            spawned_at: 0,
        };
        assert_eq!(steer(&state), Some(Command::Steer(Direction::Down)));
    }

    #[test]
    fn test_confirms_menus() {
        let state = GameState::new(3, 0);
        assert_eq!(steer(&state), Some(Command::Confirm));
    }

    #[test]
    fn test_demo_run_keeps_invariants() {
        let mut state = GameState::new(12_345, 0);
        let mut now = 0;
        let mut ghost_seen = false;
        while now < 120_000 && state.phase != GamePhase::GameOver {
            let input = TickInput {
                commands: steer(&state).into_iter().collect(),
            };
            tick(&mut state, &input, now);

            let world = &state.round.world;
            ghost_seen |= state.round.powerups.is_ghost_active();
            assert!(world.snake.queue.len() <= 1);
            if state.phase == GamePhase::Playing && !ghost_seen {
                assert!(world.snake.is_self_disjoint());
            }
            assert!(!world.is_obstacle(world.food.cell));
            assert!(!world.snake.body()[1..].contains(&world.food.cell));
            now += BASE_MOVE_DELAY_MS / 4;
        }
        assert!(state.round.playing_since.is_some());
    }
}
