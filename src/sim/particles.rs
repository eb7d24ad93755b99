//! Cosmetic particle bursts
//!
//! Particles never touch gameplay. Position is derived from origin, velocity
//! and age, so the result does not depend on frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::PARTICLE_LIFETIME_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub mod palette {
    use super::Rgb;

    pub const FOOD: [Rgb; 3] = [Rgb(255, 60, 60), Rgb(255, 150, 40), Rgb(255, 230, 90)];
    pub const SHIELD: [Rgb; 2] = [Rgb(80, 200, 255), Rgb(235, 250, 255)];
    pub const DEATH: [Rgb; 3] = [Rgb(255, 40, 40), Rgb(255, 255, 255), Rgb(120, 255, 120)];
}

/// How burst angles are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spread {
    /// Evenly spaced over a full turn
    Ring,
    /// Uniformly random
    Random,
}

/// Parameters of one burst
#[derive(Debug, Clone, Copy)]
pub struct Burst<'a> {
    pub count: usize,
    pub spread: Spread,
    /// Pixels per second
    pub speed: (f32, f32),
    pub radius: f32,
    pub colors: &'a [Rgb],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub origin: Vec2,
    pub vel: Vec2,
    pub born_at: u64,
    pub radius: f32,
    pub color: Rgb,
}

/// Per-particle draw parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleVisual {
    pub pos: Vec2,
    pub alpha: u8,
    pub radius: f32,
    pub color: Rgb,
}

impl Particle {
    /// Normalized age in [0, 1]
    pub fn age(&self, now: u64) -> f32 {
        crate::progress(now, self.born_at, PARTICLE_LIFETIME_MS)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.born_at) >= PARTICLE_LIFETIME_MS
    }

    pub fn pos(&self, now: u64) -> Vec2 {
        let secs = now.saturating_sub(self.born_at) as f32 / 1000.0;
        self.origin + self.vel * secs
    }

    /// Alpha fades to 0, radius shrinks to half
    pub fn visual(&self, now: u64) -> ParticleVisual {
        let t = self.age(now);
        ParticleVisual {
            pos: self.pos(now),
            alpha: (255.0 * (1.0 - t)).round() as u8,
            radius: self.radius * (1.0 - 0.5 * t),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Live particle cap; the oldest are dropped first
    max: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::with_capacity(crate::QualityPreset::default().max_particles())
    }
}

impl ParticleSystem {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            particles: Vec::new(),
            max,
        }
    }

    pub fn set_capacity(&mut self, max: usize) {
        self.max = max;
        self.enforce_cap();
    }

    pub fn emit(&mut self, rng: &mut RandomSource, origin: Vec2, burst: Burst<'_>, now: u64) {
        let step = std::f32::consts::TAU / burst.count.max(1) as f32;
        for i in 0..burst.count {
            let angle = match burst.spread {
                Spread::Ring => step * i as f32,
                Spread::Random => rng.range_f32(0.0, std::f32::consts::TAU),
            };
            let speed = rng.range_f32(burst.speed.0, burst.speed.1);
            let color = rng.pick(burst.colors).copied().unwrap_or(Rgb(255, 255, 255));
            self.particles.push(Particle {
                origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                born_at: now,
                radius: burst.radius,
                color,
            });
        }
        self.enforce_cap();
    }

    /// Ring burst plus a smaller random "depth" burst
    pub fn explode(
        &mut self,
        rng: &mut RandomSource,
        origin: Vec2,
        ring: usize,
        speed: (f32, f32),
        colors: &[Rgb],
        now: u64,
    ) {
        self.emit(
            rng,
            origin,
            Burst {
                count: ring,
                spread: Spread::Ring,
                speed,
                radius: 4.0,
                colors,
            },
            now,
        );
        self.emit(
            rng,
            origin,
            Burst {
                count: ring / 2,
                spread: Spread::Random,
                speed: (speed.0 * 0.4, speed.1 * 0.6),
                radius: 3.0,
                colors,
            },
            now,
        );
    }

    /// Remove particles past their lifetime
    pub fn update(&mut self, now: u64) {
        self.particles.retain(|p| !p.is_expired(now));
    }

    pub fn visuals(&self, now: u64) -> Vec<ParticleVisual> {
        self.particles
            .iter()
            .filter(|p| !p.is_expired(now))
            .map(|p| p.visual(now))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.max {
            let excess = self.particles.len() - self.max;
            self.particles.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(count: usize) -> Burst<'static> {
        Burst {
            count,
            spread: Spread::Ring,
            speed: (100.0, 100.0),
            radius: 4.0,
            colors: &palette::FOOD,
        }
    }

    #[test]
    fn test_ring_is_evenly_spaced() {
        let mut rng = RandomSource::new(0);
        let mut system = ParticleSystem::with_capacity(100);
        system.emit(&mut rng, Vec2::ZERO, ring(4), 0);
        let v: Vec<Vec2> = system.particles.iter().map(|p| p.vel).collect();
        assert!((v[0] - Vec2::new(100.0, 0.0)).length() < 0.01);
        assert!((v[1] - Vec2::new(0.0, 100.0)).length() < 0.01);
        assert!((v[2] - Vec2::new(-100.0, 0.0)).length() < 0.01);
    }

    #[test]
    fn test_lifetime_and_fade() {
        let mut rng = RandomSource::new(0);
        let mut system = ParticleSystem::with_capacity(100);
        system.emit(&mut rng, Vec2::new(10.0, 10.0), ring(8), 1_000);

        let p = system.particles[0];
        let start = p.visual(1_000);
        assert_eq!(start.alpha, 255);
        assert_eq!(start.radius, 4.0);
        let mid = p.visual(1_300);
        assert!(mid.alpha > 120 && mid.alpha < 135);
        assert!((mid.radius - 3.0).abs() < 0.01);
        assert!((mid.pos - Vec2::new(40.0, 10.0)).length() < 0.01);

        system.update(1_599);
        assert_eq!(system.len(), 8);
        system.update(1_600);
        assert!(system.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut rng = RandomSource::new(0);
        let mut system = ParticleSystem::with_capacity(10);
        system.emit(&mut rng, Vec2::ZERO, ring(8), 0);
        system.emit(&mut rng, Vec2::ZERO, ring(8), 50);
        assert_eq!(system.len(), 10);
        assert_eq!(system.particles.iter().filter(|p| p.born_at == 0).count(), 2);
    }

    #[test]
    fn test_explode_adds_depth_particles() {
        let mut rng = RandomSource::new(4);
        let mut system = ParticleSystem::with_capacity(100);
        system.explode(&mut rng, Vec2::ZERO, 12, (60.0, 120.0), &palette::DEATH, 0);
        assert_eq!(system.len(), 18);
    }
}
