//! Power-up effects
//!
//! Four kinds, each with its own lifetime rule:
//! - Shield: no timer, consumed by absorbing one wall/obstacle hit
//! - Double Points: lasts for a fixed number of apples
//! - Ghost Mode, Speed Boost: wall-clock duration

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Shield,
    DoublePoints,
    GhostMode,
    SpeedBoost,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Shield,
        PowerupKind::DoublePoints,
        PowerupKind::GhostMode,
        PowerupKind::SpeedBoost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::Shield => "Shield",
            PowerupKind::DoublePoints => "Double Points",
            PowerupKind::GhostMode => "Ghost Mode",
            PowerupKind::SpeedBoost => "Speed Boost",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerupKind::Shield => "Survive one crash",
            PowerupKind::DoublePoints => "2x points for 5 apples",
            PowerupKind::GhostMode => "Pass through yourself",
            PowerupKind::SpeedBoost => "Move twice as fast",
        }
    }
}

/// Per-kind payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Shield,
    DoublePoints { uses_left: u32 },
    GhostMode,
    SpeedBoost,
}

impl Effect {
    fn fresh(kind: PowerupKind) -> Self {
        match kind {
            PowerupKind::Shield => Effect::Shield,
            PowerupKind::DoublePoints => Effect::DoublePoints {
                uses_left: DOUBLE_POINTS_USES,
            },
            PowerupKind::GhostMode => Effect::GhostMode,
            PowerupKind::SpeedBoost => Effect::SpeedBoost,
        }
    }

    pub fn kind(&self) -> PowerupKind {
        match self {
            Effect::Shield => PowerupKind::Shield,
            Effect::DoublePoints { .. } => PowerupKind::DoublePoints,
            Effect::GhostMode => PowerupKind::GhostMode,
            Effect::SpeedBoost => PowerupKind::SpeedBoost,
        }
    }

    /// Wall-clock duration for time-bound kinds
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Effect::GhostMode => Some(GHOST_DURATION_MS),
            Effect::SpeedBoost => Some(SPEED_BOOST_DURATION_MS),
            Effect::Shield | Effect::DoublePoints { .. } => None,
        }
    }
}

/// What the HUD shows for an active effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Held until consumed
    UntilUsed,
    Millis(u64),
    Uses(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Powerup {
    pub effect: Effect,
    pub active: bool,
    pub activated_at: u64,
}

impl Powerup {
    pub fn activate(kind: PowerupKind, now: u64) -> Self {
        Self {
            effect: Effect::fresh(kind),
            active: true,
            activated_at: now,
        }
    }

    pub fn kind(&self) -> PowerupKind {
        self.effect.kind()
    }

    /// Pure function of `now`; safe to call any number of times
    pub fn is_expired(&self, now: u64) -> bool {
        if !self.active {
            return true;
        }
        match self.effect {
            Effect::Shield => false,
            Effect::DoublePoints { uses_left } => uses_left == 0,
            Effect::GhostMode | Effect::SpeedBoost => {
                let duration = self.effect.duration_ms().unwrap_or(0);
                now.saturating_sub(self.activated_at) >= duration
            }
        }
    }

    pub fn remaining(&self, now: u64) -> Remaining {
        match self.effect {
            Effect::Shield => Remaining::UntilUsed,
            Effect::DoublePoints { uses_left } => Remaining::Uses(uses_left),
            Effect::GhostMode | Effect::SpeedBoost => {
                let duration = self.effect.duration_ms().unwrap_or(0);
                Remaining::Millis(
                    duration.saturating_sub(now.saturating_sub(self.activated_at)),
                )
            }
        }
    }
}

/// The set of running effects and the queries the rules consult
#[derive(Debug, Clone, Default)]
pub struct PowerupSystem {
    active: Vec<Powerup>,
}

impl PowerupSystem {
    /// Start an effect. An effect of the same kind already running is refreshed
    /// rather than duplicated.
    pub fn activate(&mut self, kind: PowerupKind, now: u64) {
        let fresh = Powerup::activate(kind, now);
        match self.active.iter_mut().find(|p| p.kind() == kind) {
            Some(existing) => *existing = fresh,
            None => self.active.push(fresh),
        }
        log::debug!("Power-up activated: {}", kind.label());
    }

    /// Drop expired effects, returning their kinds
    pub fn prune(&mut self, now: u64) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        self.active.retain(|p| {
            if p.is_expired(now) {
                expired.push(p.kind());
                false
            } else {
                true
            }
        });
        for kind in &expired {
            log::debug!("Power-up expired: {}", kind.label());
        }
        expired
    }

    fn has_active(&self, kind: PowerupKind) -> bool {
        self.active.iter().any(|p| p.active && p.kind() == kind)
    }

    pub fn is_ghost_active(&self) -> bool {
        self.has_active(PowerupKind::GhostMode)
    }

    pub fn is_shield_active(&self) -> bool {
        self.has_active(PowerupKind::Shield)
    }

    pub fn is_double_points_active(&self) -> bool {
        self.has_active(PowerupKind::DoublePoints)
    }

    /// Multiplier applied to the base move delay
    pub fn current_move_delay_multiplier(&self) -> f32 {
        if self.has_active(PowerupKind::SpeedBoost) {
            SPEED_BOOST_DELAY_FACTOR
        } else {
            1.0
        }
    }

    /// Points for one apple. Spends a Double Points use when one is running.
    pub fn points_per_food(&mut self) -> u64 {
        for p in self.active.iter_mut().filter(|p| p.active) {
            if let Effect::DoublePoints { uses_left } = &mut p.effect {
                if *uses_left == 0 {
                    continue;
                }
                *uses_left -= 1;
                if *uses_left == 0 {
                    p.active = false;
                }
                return DOUBLE_POINTS_PER_FOOD;
            }
        }
        POINTS_PER_FOOD
    }

    /// Spend the shield. Returns false if none was up.
    pub fn consume_shield(&mut self) -> bool {
        match self
            .active
            .iter_mut()
            .find(|p| p.active && p.kind() == PowerupKind::Shield)
        {
            Some(shield) => {
                shield.active = false;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> &[Powerup] {
        &self.active
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Pending three-way choice shown after every third apple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerupChoice {
    pub options: Vec<PowerupKind>,
    pub highlighted: usize,
}

impl PowerupChoice {
    pub fn roll(rng: &mut RandomSource) -> Self {
        Self {
            options: rng.sample_distinct(&PowerupKind::ALL, POWERUP_CHOICES),
            highlighted: 1,
        }
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.options.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.options.is_empty() {
            let n = self.options.len();
            self.highlighted = (self.highlighted + n - 1) % n;
        }
    }

    pub fn selected(&self) -> Option<PowerupKind> {
        self.options.get(self.highlighted).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_timed_expiry() {
        let ghost = Powerup::activate(PowerupKind::GhostMode, 1_000);
        assert!(!ghost.is_expired(1_000));
        assert!(!ghost.is_expired(1_000 + GHOST_DURATION_MS - 1));
        assert!(ghost.is_expired(1_000 + GHOST_DURATION_MS));
        assert_eq!(
            ghost.remaining(1_500),
            Remaining::Millis(GHOST_DURATION_MS - 500)
        );
    }

    #[test]
    fn test_shield_never_times_out() {
        let mut system = PowerupSystem::default();
        system.activate(PowerupKind::Shield, 0);
        system.prune(u64::MAX / 2);
        assert!(system.is_shield_active());
        assert!(system.consume_shield());
        assert!(!system.is_shield_active());
        assert!(!system.consume_shield());
        assert_eq!(system.prune(10), vec![PowerupKind::Shield]);
        assert!(system.active().is_empty());
    }

    #[test]
    fn test_double_points_runs_out() {
        let mut system = PowerupSystem::default();
        system.activate(PowerupKind::DoublePoints, 0);
        for _ in 0..DOUBLE_POINTS_USES {
            assert_eq!(system.points_per_food(), DOUBLE_POINTS_PER_FOOD);
        }
        assert!(!system.is_double_points_active());
        assert_eq!(system.points_per_food(), POINTS_PER_FOOD);
        assert_eq!(system.prune(0), vec![PowerupKind::DoublePoints]);
    }

    #[test]
    fn test_speed_boost_halves_delay() {
        let mut system = PowerupSystem::default();
        assert_eq!(system.current_move_delay_multiplier(), 1.0);
        system.activate(PowerupKind::SpeedBoost, 0);
        assert_eq!(system.current_move_delay_multiplier(), 0.5);
        system.prune(SPEED_BOOST_DURATION_MS);
        assert_eq!(system.current_move_delay_multiplier(), 1.0);
    }

    #[test]
    fn test_reactivation_refreshes() {
        let mut system = PowerupSystem::default();
        system.activate(PowerupKind::GhostMode, 0);
        system.activate(PowerupKind::GhostMode, 4_000);
        assert_eq!(system.active().len(), 1);
        system.prune(GHOST_DURATION_MS);
        assert!(system.is_ghost_active());
    }

    #[test]
    fn test_prune_keeps_live_entries() {
        let mut system = PowerupSystem::default();
        system.activate(PowerupKind::SpeedBoost, 0);
        system.activate(PowerupKind::GhostMode, 0);
        system.activate(PowerupKind::Shield, 0);
        let expired = system.prune(SPEED_BOOST_DURATION_MS);
        assert_eq!(expired, vec![PowerupKind::SpeedBoost]);
        assert!(system.is_ghost_active());
        assert!(system.is_shield_active());
        assert!(system.prune(SPEED_BOOST_DURATION_MS).is_empty());
    }

    #[test]
    fn test_choice_navigation() {
        let mut rng = RandomSource::new(8);
        let mut choice = PowerupChoice::roll(&mut rng);
        assert_eq!(choice.options.len(), 3);
        assert_eq!(choice.highlighted, 1);
        choice.next();
        choice.next();
        assert_eq!(choice.highlighted, 0);
        choice.previous();
        assert_eq!(choice.highlighted, 2);
        assert_eq!(choice.selected(), Some(choice.options[2]));
    }

    fn any_kind() -> impl Strategy<Value = PowerupKind> {
        prop_oneof![
            Just(PowerupKind::Shield),
            Just(PowerupKind::DoublePoints),
            Just(PowerupKind::GhostMode),
            Just(PowerupKind::SpeedBoost),
        ]
    }

    proptest! {
        #[test]
        fn prop_is_expired_idempotent(kind in any_kind(), start in 0u64..100_000, dt in 0u64..20_000) {
            let p = Powerup::activate(kind, start);
            let now = start + dt;
            let first = p.is_expired(now);
            for _ in 0..5 {
                prop_assert_eq!(p.is_expired(now), first);
            }
        }
    }
}
