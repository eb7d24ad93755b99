//! Snake Rush entry point
//!
//! Headless demo: loads settings and the high score, lets the autopilot play
//! rounds on a virtual 60 Hz clock, and logs what happens. Persistence lives
//! here, the simulation only reports events.

use std::time::{SystemTime, UNIX_EPOCH};

use snake_rush::sim::{
    Command, FrameView, GameEvent, GamePhase, GameState, TickInput, autopilot, tick,
};
use snake_rush::{HighScores, Settings};

/// Virtual frame length
const FRAME_MS: u64 = 16;
/// Give up on a round that never ends
const ROUND_LIMIT_MS: u64 = 10 * 60 * 1000;
/// How often a frame snapshot is logged
const VIEW_LOG_EVERY_MS: u64 = 1000;
/// Rounds played per run
const ROUNDS: u32 = 3;

fn main() {
    env_logger::init();
    log::info!("Snake Rush (headless) starting...");

    let settings = Settings::load_from(Settings::DEFAULT_FILE);
    let mut store = HighScores::load(HighScores::DEFAULT_FILE);

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!(
        "Game initialized with seed: {} (quality {}, {} rounds)",
        seed,
        settings.quality.as_str(),
        ROUNDS
    );

    let mut state = GameState::new(seed, store.high_score());
    state.set_particle_cap(settings.max_particles());

    let mut now = 0;
    for round in 1..=ROUNDS {
        let started = now;
        let mut last_view = now;
        loop {
            let input = if state.phase == GamePhase::GameOver {
                // Autopilot leaves the game-over screen alone
                TickInput::single(Command::Confirm)
            } else {
                TickInput {
                    commands: autopilot::steer(&state).into_iter().collect(),
                }
            };
            tick(&mut state, &input, now);

            for event in state.drain_events() {
                report(&event, &mut store);
            }

            if now - last_view >= VIEW_LOG_EVERY_MS {
                last_view = now;
                let view = FrameView::capture(&state, now, &settings);
                log::debug!(
                    "[{:>6}ms] {:?} len={} score={} particles={} shake={:.1},{:.1}",
                    now,
                    view.phase,
                    view.cells.len(),
                    view.score,
                    view.particles.len(),
                    view.effects.shake_offset.x,
                    view.effects.shake_offset.y
                );
            }

            if state.phase == GamePhase::GameOver || !state.running {
                break;
            }
            if now - started > ROUND_LIMIT_MS {
                log::warn!("Round {} hit the time limit, stopping", round);
                break;
            }
            now += FRAME_MS;
        }

        let r = &state.round;
        println!(
            "Round {}: score {} ({} apples, length {}) - best {}",
            round,
            r.score,
            r.apples,
            r.world.snake.len(),
            store.high_score()
        );
        if state.phase != GamePhase::GameOver {
            break;
        }
        now += FRAME_MS;
    }
}

fn report(event: &GameEvent, store: &mut HighScores) {
    match event {
        GameEvent::NewHighScore(score) => match store.update(*score) {
            Ok(true) => log::info!("New high score: {}", score),
            Ok(false) => {}
            Err(e) => log::warn!("Failed to save high score: {}", e),
        },
        GameEvent::Died { reason, score } => log::info!("Died ({}) with {} points", reason, score),
        GameEvent::PowerupActivated(kind) => log::info!("Power-up: {}", kind.label()),
        other => log::debug!("{:?}", other),
    }
}
