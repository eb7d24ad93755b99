//! Game state and round aggregate
//!
//! Everything a round mutates lives in `Round`; restarting replaces it whole.

use serde::{Deserialize, Serialize};

use super::animation::AnimationSequencer;
use super::grid::GridWorld;
use super::particles::ParticleSystem;
use super::powerup::{PowerupChoice, PowerupKind, PowerupSystem};
use super::rng::RandomSource;
use crate::consts::*;

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Title,
    /// 3-2-1-GO before the snake moves
    Countdown,
    /// Active gameplay
    Playing,
    /// Movement suspended while the player picks a power-up
    PowerupSelection,
    /// Freeze/zoom/fade after a fatal hit
    DeathAnimation,
    /// Run ended, waiting for restart
    GameOver,
}

/// Notifications for the host (logging, persistence, audio)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { seed: u64, obstacles: usize },
    Playing,
    FoodEaten { points: u64, score: u64 },
    ShieldAbsorbed,
    PowerupOffered(Vec<PowerupKind>),
    PowerupActivated(PowerupKind),
    PowerupExpired(PowerupKind),
    Died { reason: &'static str, score: u64 },
    NewHighScore(u64),
    GameOver { score: u64 },
    Quit,
}

/// State of a single round
#[derive(Debug, Clone)]
pub struct Round {
    pub world: GridWorld,
    pub powerups: PowerupSystem,
    pub particles: ParticleSystem,
    pub effects: AnimationSequencer,
    pub score: u64,
    pub apples: u32,
    /// Baseline for the move scheduler
    pub last_move_at: u64,
    /// Set when the countdown ends
    pub playing_since: Option<u64>,
    /// Frozen at death so the HUD clock stops
    pub ended_at: Option<u64>,
    pub choice: Option<PowerupChoice>,
}

impl Round {
    pub fn new(rng: &mut RandomSource, particle_cap: usize, now: u64) -> Self {
        Self {
            world: GridWorld::new(rng, OBSTACLE_COUNT, now),
            powerups: PowerupSystem::default(),
            particles: ParticleSystem::with_capacity(particle_cap),
            effects: AnimationSequencer::default(),
            score: 0,
            apples: 0,
            last_move_at: now,
            playing_since: None,
            ended_at: None,
            choice: None,
        }
    }

    /// Effective move interval in milliseconds
    pub fn move_delay_ms(&self) -> u64 {
        (BASE_MOVE_DELAY_MS as f32 * self.powerups.current_move_delay_multiplier()).round()
            as u64
    }

    /// Milliseconds of play so far
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        match self.playing_since {
            Some(start) => self.ended_at.unwrap_or(now).saturating_sub(start),
            None => 0,
        }
    }
}

/// Complete game state, owned by the loop
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: RandomSource,
    pub phase: GamePhase,
    pub round: Round,
    pub high_score: u64,
    /// Cleared by `tick` on quit
    pub running: bool,
    /// Live particle cap applied to each new round
    pub particle_cap: usize,
    /// Drained by the host each frame
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut rng = RandomSource::new(seed);
        let particle_cap = crate::QualityPreset::default().max_particles();
        let round = Round::new(&mut rng, particle_cap, 0);
        Self {
            rng,
            phase: GamePhase::Title,
            round,
            high_score,
            running: true,
            particle_cap,
            events: Vec::new(),
        }
    }

    pub fn set_particle_cap(&mut self, cap: usize) {
        self.particle_cap = cap;
        self.round.particles.set_capacity(cap);
    }

    /// Replace the round with a fresh one and start the countdown
    pub fn start_round(&mut self, now: u64) {
        self.round = Round::new(&mut self.rng, self.particle_cap, now);
        self.round.effects.start_countdown(now);
        self.phase = GamePhase::Countdown;
        log::info!(
            "Round started (seed {}, {} obstacles)",
            self.rng.seed(),
            self.round.world.obstacles.len()
        );
        self.events.push(GameEvent::RoundStarted {
            seed: self.rng.seed(),
            obstacles: self.round.world.obstacles.len(),
        });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
