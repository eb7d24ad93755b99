//! Frame step and phase state machine
//!
//! One call per loop iteration, in fixed order:
//! 1. input commands
//! 2. phase timers (countdown end, death animation end)
//! 3. at most one snake move, gated by the move interval
//! 4. time-driven effects (particle ageing, power-up expiry)

use super::collision::{Collision, Resolution, classify, resolve};
use super::grid::Direction;
use super::particles::palette;
use super::powerup::PowerupChoice;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Edge-triggered player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn; doubles as left/right navigation in the power-up picker
    Steer(Direction),
    /// Start, restart, or confirm a power-up
    Confirm,
    Quit,
}

/// Input collected since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn single(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }
}

/// Advance the game to `now` (monotonic milliseconds)
pub fn tick(state: &mut GameState, input: &TickInput, now: u64) {
    if !state.running {
        return;
    }

    for &command in &input.commands {
        handle_command(state, command, now);
        if !state.running {
            return;
        }
    }

    advance_phase_timers(state, now);

    if state.phase == GamePhase::Playing {
        prune_powerups(state, now);
        step_snake(state, now);
    }

    state.round.particles.update(now);
    prune_powerups(state, now);
}

fn handle_command(state: &mut GameState, command: Command, now: u64) {
    match (command, state.phase) {
        (Command::Quit, _) => {
            log::info!("Quit requested");
            state.running = false;
            state.events.push(GameEvent::Quit);
        }
        (Command::Confirm, GamePhase::Title | GamePhase::GameOver) => {
            state.start_round(now);
        }
        (Command::Confirm, GamePhase::PowerupSelection) => {
            confirm_choice(state, now);
        }
        (Command::Steer(dir), GamePhase::Countdown | GamePhase::Playing) => {
            state.round.world.snake.change_direction(dir);
        }
        (Command::Steer(Direction::Left), GamePhase::PowerupSelection) => {
            if let Some(choice) = state.round.choice.as_mut() {
                choice.previous();
            }
        }
        (Command::Steer(Direction::Right), GamePhase::PowerupSelection) => {
            if let Some(choice) = state.round.choice.as_mut() {
                choice.next();
            }
        }
        // No skip during the death animation, nothing else to do elsewhere
        _ => {}
    }
}

fn advance_phase_timers(state: &mut GameState, now: u64) {
    match state.phase {
        GamePhase::Countdown if state.round.effects.countdown_finished(now) => {
            let round = &mut state.round;
            round.effects.end_countdown();
            // First move is a full interval away
            round.last_move_at = now;
            round.playing_since = Some(now);
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::Playing);
        }
        GamePhase::DeathAnimation if state.round.effects.death_finished(now) => {
            state.round.particles.clear();
            state.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", state.round.score);
            state.events.push(GameEvent::GameOver {
                score: state.round.score,
            });
        }
        _ => {}
    }
}

fn prune_powerups(state: &mut GameState, now: u64) {
    for kind in state.round.powerups.prune(now) {
        state.events.push(GameEvent::PowerupExpired(kind));
    }
}

/// Attempt one move if the interval has elapsed
fn step_snake(state: &mut GameState, now: u64) {
    let round = &mut state.round;
    if now.saturating_sub(round.last_move_at) < round.move_delay_ms() {
        return;
    }
    round.last_move_at = now;

    let ghost = round.powerups.is_ghost_active();
    let shield = round.powerups.is_shield_active();
    let next = round.world.snake.next_head();
    let collision = classify(&round.world, next, ghost);
    log::trace!("Move to ({}, {}): {:?}", next.x, next.y, collision);

    match resolve(collision, shield) {
        Resolution::Advance { ate } => {
            round.world.snake.advance(next);
            if ate {
                eat_food(state, now);
            }
        }
        Resolution::Absorbed(hit) => absorb_hit(state, hit, now),
        Resolution::Fatal(hit) => die(state, hit, now),
    }
}

fn eat_food(state: &mut GameState, now: u64) {
    let GameState {
        round, rng, events, ..
    } = state;

    let origin = round.world.food.cell.center();
    let points = round.powerups.points_per_food();
    round.score += points;
    round.apples += 1;
    round.world.snake.grow();
    round.world.respawn_food(rng, now);

    round
        .particles
        .explode(rng, origin, 12, (60.0, 140.0), &palette::FOOD, now);
    round.effects.trigger_shake(SHAKE_FOOD, now);
    round.effects.flash_score(now);
    events.push(GameEvent::FoodEaten {
        points,
        score: round.score,
    });

    if round.apples % POWERUP_EVERY_APPLES == 0 && round.choice.is_none() {
        let choice = PowerupChoice::roll(rng);
        log::debug!("Offering power-ups: {:?}", choice.options);
        events.push(GameEvent::PowerupOffered(choice.options.clone()));
        round.choice = Some(choice);
        state.phase = GamePhase::PowerupSelection;
    }
}

fn confirm_choice(state: &mut GameState, now: u64) {
    let round = &mut state.round;
    if let Some(kind) = round.choice.take().and_then(|c| c.selected()) {
        round.powerups.activate(kind, now);
        state.events.push(GameEvent::PowerupActivated(kind));
    }
    round.last_move_at = now;
    state.phase = GamePhase::Playing;
}

fn absorb_hit(state: &mut GameState, hit: Collision, now: u64) {
    let GameState {
        round, rng, events, ..
    } = state;

    round.powerups.consume_shield();
    round.world.snake.hold();
    let origin = round.world.snake.head().center();
    round
        .particles
        .explode(rng, origin, 16, (80.0, 160.0), &palette::SHIELD, now);
    round.effects.trigger_shake(SHAKE_SHIELD, now);
    round.effects.flash_screen(now);
    log::debug!("Shield absorbed a {} hit", hit.reason());
    events.push(GameEvent::ShieldAbsorbed);
}

fn die(state: &mut GameState, hit: Collision, now: u64) {
    let GameState {
        round,
        rng,
        events,
        high_score,
        ..
    } = state;

    let focus = round.world.snake.head().center();
    round.ended_at = Some(now);
    round.choice = None;
    round
        .particles
        .explode(rng, focus, 20, (80.0, 200.0), &palette::DEATH, now);
    round.effects.trigger_shake(SHAKE_DEATH, now);
    round.effects.flash_screen(now);
    round.effects.start_death(now, focus, hit.reason());

    log::info!("Died ({}) with score {}", hit.reason(), round.score);
    events.push(GameEvent::Died {
        reason: hit.reason(),
        score: round.score,
    });
    if round.score > *high_score {
        *high_score = round.score;
        events.push(GameEvent::NewHighScore(round.score));
    }
    state.phase = GamePhase::DeathAnimation;
}
