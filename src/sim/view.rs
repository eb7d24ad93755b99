//! Render-facing snapshot
//!
//! The renderer reads one `FrameView` per frame and never touches game state
//! or does timing math of its own.

use glam::Vec2;

use super::animation::FrameEffects;
use super::grid::{Cell, Direction};
use super::obstacles::Shape;
use super::particles::ParticleVisual;
use super::powerup::{PowerupChoice, PowerupKind, Remaining};
use super::state::{GamePhase, GameState};
use crate::settings::Settings;

/// One active power-up as the HUD shows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupHud {
    pub kind: PowerupKind,
    pub label: &'static str,
    pub remaining: Remaining,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub phase: GamePhase,
    /// Body cells, head first
    pub cells: Vec<Cell>,
    /// Interpolated pixel centers, head first
    pub segments: Vec<Vec2>,
    /// Progress from the previous cell toward the current one, [0, 1]
    pub interpolation: f32,
    pub facing: Direction,
    pub food: Cell,
    pub food_pulse_phase: f32,
    pub food_size: f32,
    pub obstacles: Vec<Shape>,
    pub particles: Vec<ParticleVisual>,
    pub powerups: Vec<PowerupHud>,
    pub ghost: bool,
    pub shield: bool,
    pub score: u64,
    pub high_score: u64,
    pub apples: u32,
    pub elapsed_ms: u64,
    pub effects: FrameEffects,
    pub choice: Option<PowerupChoice>,
    pub death_reason: Option<&'static str>,
}

impl FrameView {
    /// Snapshot `state` at `now`
    pub fn capture(state: &GameState, now: u64, settings: &Settings) -> Self {
        let round = &state.round;
        let snake = &round.world.snake;

        let interpolation = if state.phase == GamePhase::Playing {
            crate::progress(now, round.last_move_at, round.move_delay_ms())
        } else {
            1.0
        };
        let previous = snake.previous_body();
        let segments = snake
            .body()
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let to = cell.center();
                let from = previous.get(i).map_or(to, |c| c.center());
                from.lerp(to, interpolation)
            })
            .collect();

        let particles = if settings.particles && state.phase != GamePhase::GameOver {
            round.particles.visuals(now)
        } else {
            Vec::new()
        };

        let powerups = round
            .powerups
            .active()
            .iter()
            .filter(|p| !p.is_expired(now))
            .map(|p| PowerupHud {
                kind: p.kind(),
                label: p.kind().label(),
                remaining: p.remaining(now),
            })
            .collect();

        let mut effects = round.effects.sample(now);
        if !settings.screen_shake {
            effects.shake_offset = Vec2::ZERO;
        }
        if !settings.flashes {
            effects.flash_alpha = 0;
            effects.score_scale = 1.0;
        }

        Self {
            phase: state.phase,
            cells: snake.body().to_vec(),
            segments,
            interpolation,
            facing: snake.facing,
            food: round.world.food.cell,
            food_pulse_phase: round.world.food.pulse_phase(now),
            food_size: round.world.food.pulse_size(now),
            obstacles: round.world.obstacles.shapes().to_vec(),
            particles,
            powerups,
            ghost: round.powerups.is_ghost_active(),
            shield: round.powerups.is_shield_active(),
            score: round.score,
            high_score: state.high_score,
            apples: round.apples,
            elapsed_ms: round.elapsed_ms(now),
            effects,
            choice: round.choice.clone(),
            death_reason: round.effects.death().map(|d| d.reason),
        }
    }
}
