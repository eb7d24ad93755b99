//! Time-driven effects: countdown, screen shake, flashes, death sequence
//!
//! Every effect is stored as a trigger timestamp and sampled against the
//! frame clock. `AnimationSequencer::sample` turns the lot into a plain
//! `FrameEffects` so the renderer does no timing math.

use glam::Vec2;

use super::rng::RandomSource;
use crate::consts::*;
use crate::progress;

/// Shaping applied to a segment's linear progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// `t^1.5`
    EaseIn,
    /// `1 - (1 - t)^2`
    EaseOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t.powf(1.5),
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// One timed segment of a multi-phase animation
#[derive(Debug, Clone, Copy)]
pub struct Segment<T> {
    pub stage: T,
    pub duration_ms: u64,
    pub easing: Easing,
}

/// Find the segment covering `elapsed` and the eased progress through it.
/// Past the end, the last segment is returned at full progress.
pub fn locate<T: Copy>(table: &[Segment<T>], elapsed: u64) -> Option<(T, f32)> {
    let mut start = 0;
    for seg in table {
        let end = start + seg.duration_ms;
        if elapsed < end {
            let t = progress(elapsed, start, seg.duration_ms);
            return Some((seg.stage, seg.easing.apply(t)));
        }
        start = end;
    }
    table.last().map(|seg| (seg.stage, 1.0))
}

pub fn total_ms<T>(table: &[Segment<T>]) -> u64 {
    table.iter().map(|s| s.duration_ms).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStage {
    Three,
    Two,
    One,
    Go,
}

impl CountdownStage {
    pub fn label(self) -> &'static str {
        match self {
            CountdownStage::Three => "3",
            CountdownStage::Two => "2",
            CountdownStage::One => "1",
            CountdownStage::Go => "GO",
        }
    }
}

pub const COUNTDOWN: [Segment<CountdownStage>; 4] = [
    Segment {
        stage: CountdownStage::Three,
        duration_ms: 1_000,
        easing: Easing::EaseOut,
    },
    Segment {
        stage: CountdownStage::Two,
        duration_ms: 1_000,
        easing: Easing::EaseOut,
    },
    Segment {
        stage: CountdownStage::One,
        duration_ms: 1_000,
        easing: Easing::EaseOut,
    },
    Segment {
        stage: CountdownStage::Go,
        duration_ms: 500,
        easing: Easing::Linear,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathStage {
    /// Everything frozen in place
    Hold,
    /// Camera zooms on the head
    Zoom,
    /// Zoom held while the screen fades to black
    Fade,
}

pub const DEATH_SEQUENCE: [Segment<DeathStage>; 3] = [
    Segment {
        stage: DeathStage::Hold,
        duration_ms: 500,
        easing: Easing::Linear,
    },
    Segment {
        stage: DeathStage::Zoom,
        duration_ms: 1_500,
        easing: Easing::EaseIn,
    },
    Segment {
        stage: DeathStage::Fade,
        duration_ms: 500,
        easing: Easing::Linear,
    },
];

pub const DEATH_MAX_ZOOM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownFrame {
    pub label: &'static str,
    pub scale: f32,
    /// Radians
    pub rotation: f32,
    pub alpha: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathFrame {
    pub stage: DeathStage,
    pub zoom: f32,
    /// Pixel position the zoom is centered on
    pub focus: Vec2,
    pub fade_alpha: u8,
}

/// Everything the renderer needs from the sequencer for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEffects {
    pub shake_offset: Vec2,
    pub score_scale: f32,
    pub flash_alpha: u8,
    pub countdown: Option<CountdownFrame>,
    pub death: Option<DeathFrame>,
}

impl Default for FrameEffects {
    fn default() -> Self {
        Self {
            shake_offset: Vec2::ZERO,
            score_scale: 1.0,
            flash_alpha: 0,
            countdown: None,
            death: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathSequence {
    pub started_at: u64,
    pub focus: Vec2,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    intensity: f32,
    triggered_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationSequencer {
    countdown_started_at: Option<u64>,
    shake: Option<Shake>,
    score_flash_at: Option<u64>,
    screen_flash_at: Option<u64>,
    death: Option<DeathSequence>,
}

impl AnimationSequencer {
    pub fn start_countdown(&mut self, now: u64) {
        self.countdown_started_at = Some(now);
    }

    /// True once the full countdown has elapsed
    pub fn countdown_finished(&self, now: u64) -> bool {
        self.countdown_started_at
            .is_some_and(|t| now.saturating_sub(t) >= total_ms(&COUNTDOWN))
    }

    pub fn end_countdown(&mut self) {
        self.countdown_started_at = None;
    }

    pub fn countdown_frame(&self, now: u64) -> Option<CountdownFrame> {
        let started = self.countdown_started_at?;
        let (stage, t) = locate(&COUNTDOWN, now.saturating_sub(started))?;
        let frame = match stage {
            CountdownStage::Go => CountdownFrame {
                label: stage.label(),
                scale: 1.0 + 0.5 * t,
                rotation: 0.0,
                alpha: (255.0 * (1.0 - t)).round() as u8,
            },
            _ => CountdownFrame {
                label: stage.label(),
                scale: 2.0 - t,
                rotation: 0.35 * (1.0 - t),
                alpha: 255,
            },
        };
        Some(frame)
    }

    pub fn trigger_shake(&mut self, intensity: f32, now: u64) {
        self.shake = Some(Shake {
            intensity,
            triggered_at: now,
        });
    }

    /// Current shake amplitude, decaying linearly to 0
    pub fn shake_intensity(&self, now: u64) -> f32 {
        match self.shake {
            Some(s) => s.intensity * (1.0 - progress(now, s.triggered_at, SHAKE_DECAY_MS)),
            None => 0.0,
        }
    }

    pub fn flash_score(&mut self, now: u64) {
        self.score_flash_at = Some(now);
    }

    pub fn flash_screen(&mut self, now: u64) {
        self.screen_flash_at = Some(now);
    }

    /// Score readout scale: 1.5 at trigger back to 1.0
    pub fn score_scale(&self, now: u64) -> f32 {
        match self.score_flash_at {
            Some(t) => 1.0 + 0.5 * (1.0 - progress(now, t, SCORE_FLASH_MS)),
            None => 1.0,
        }
    }

    /// White overlay alpha
    pub fn flash_alpha(&self, now: u64) -> u8 {
        match self.screen_flash_at {
            Some(t) => (180.0 * (1.0 - progress(now, t, SCREEN_FLASH_MS))).round() as u8,
            None => 0,
        }
    }

    pub fn start_death(&mut self, now: u64, focus: Vec2, reason: &'static str) {
        self.death = Some(DeathSequence {
            started_at: now,
            focus,
            reason,
        });
    }

    pub fn death(&self) -> Option<&DeathSequence> {
        self.death.as_ref()
    }

    pub fn death_finished(&self, now: u64) -> bool {
        self.death
            .is_some_and(|d| now.saturating_sub(d.started_at) >= total_ms(&DEATH_SEQUENCE))
    }

    pub fn death_frame(&self, now: u64) -> Option<DeathFrame> {
        let death = self.death?;
        let (stage, t) = locate(&DEATH_SEQUENCE, now.saturating_sub(death.started_at))?;
        let (zoom, fade) = match stage {
            DeathStage::Hold => (1.0, 0.0),
            DeathStage::Zoom => (1.0 + t * (DEATH_MAX_ZOOM - 1.0), 0.0),
            DeathStage::Fade => (DEATH_MAX_ZOOM, t),
        };
        Some(DeathFrame {
            stage,
            zoom,
            focus: death.focus,
            fade_alpha: (255.0 * fade).round() as u8,
        })
    }

    /// Random offset within the current shake amplitude. Seeded from the
    /// trigger time and `now` so sampling never touches the gameplay RNG.
    pub fn shake_offset(&self, now: u64) -> Vec2 {
        let intensity = self.shake_intensity(now);
        match self.shake {
            Some(s) if intensity > 0.0 => {
                let mut rng = RandomSource::new(s.triggered_at.rotate_left(32) ^ now);
                Vec2::new(
                    rng.range_f32(-intensity, intensity),
                    rng.range_f32(-intensity, intensity),
                )
            }
            _ => Vec2::ZERO,
        }
    }

    /// Derive this frame's visual parameters
    pub fn sample(&self, now: u64) -> FrameEffects {
        FrameEffects {
            shake_offset: self.shake_offset(now),
            score_scale: self.score_scale(now),
            flash_alpha: self.flash_alpha(now),
            countdown: self.countdown_frame(now),
            death: self.death_frame(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_totals() {
        assert_eq!(total_ms(&COUNTDOWN), COUNTDOWN_MS);
        assert_eq!(total_ms(&DEATH_SEQUENCE), DEATH_ANIMATION_MS);
    }

    #[test]
    fn test_countdown_stages() {
        let mut seq = AnimationSequencer::default();
        seq.start_countdown(10_000);
        let label = |t| seq.countdown_frame(t).map(|f| f.label);
        assert_eq!(label(10_000), Some("3"));
        assert_eq!(label(10_999), Some("3"));
        assert_eq!(label(11_000), Some("2"));
        assert_eq!(label(12_500), Some("1"));
        assert_eq!(label(13_000), Some("GO"));
        assert!(!seq.countdown_finished(13_499));
        assert!(seq.countdown_finished(13_500));

        let first = seq.countdown_frame(10_000).unwrap();
        assert_eq!(first.scale, 2.0);
        assert!(first.rotation > 0.0);
        let settled = seq.countdown_frame(10_999).unwrap();
        assert!(settled.scale < 1.01);
    }

    #[test]
    fn test_shake_decays_linearly() {
        let mut seq = AnimationSequencer::default();
        seq.trigger_shake(SHAKE_FOOD, 0);
        assert_eq!(seq.shake_intensity(0), 8.0);
        assert!((seq.shake_intensity(150) - 4.0).abs() < 0.001);
        assert_eq!(seq.shake_intensity(300), 0.0);

        for t in 0..300 {
            let fx = seq.sample(t);
            let amp = seq.shake_intensity(t);
            assert!(fx.shake_offset.x.abs() <= amp && fx.shake_offset.y.abs() <= amp);
        }
        assert_eq!(seq.sample(300).shake_offset, Vec2::ZERO);
        // Same frame, same offset
        assert_eq!(seq.shake_offset(120), seq.shake_offset(120));
    }

    #[test]
    fn test_flashes() {
        let mut seq = AnimationSequencer::default();
        assert_eq!(seq.score_scale(0), 1.0);
        assert_eq!(seq.flash_alpha(0), 0);
        seq.flash_score(100);
        seq.flash_screen(100);
        assert_eq!(seq.score_scale(100), 1.5);
        assert!(seq.flash_alpha(100) > 0);
        assert_eq!(seq.flash_alpha(250), 0);
        assert!(seq.score_scale(250) > 1.0);
        assert_eq!(seq.score_scale(400), 1.0);
    }

    #[test]
    fn test_death_phases() {
        let mut seq = AnimationSequencer::default();
        seq.start_death(1_000, Vec2::new(50.0, 60.0), "wall");

        let hold = seq.death_frame(1_499).unwrap();
        assert_eq!(hold.stage, DeathStage::Hold);
        assert_eq!(hold.zoom, 1.0);

        let zoom_start = seq.death_frame(1_500).unwrap();
        assert_eq!(zoom_start.stage, DeathStage::Zoom);
        assert_eq!(zoom_start.zoom, 1.0);

        // Halfway through the zoom: 1 + 0.5^1.5 * 2
        let mid = seq.death_frame(2_250).unwrap();
        assert!((mid.zoom - (1.0 + 0.5f32.powf(1.5) * 2.0)).abs() < 0.001);

        let mut last = 1.0;
        for t in (1_500..3_000).step_by(25) {
            let z = seq.death_frame(t).unwrap().zoom;
            assert!(z >= last);
            last = z;
        }

        let fade = seq.death_frame(3_250).unwrap();
        assert_eq!(fade.stage, DeathStage::Fade);
        assert_eq!(fade.zoom, 3.0);
        assert!(fade.fade_alpha > 100 && fade.fade_alpha < 155);
        assert_eq!(fade.focus, Vec2::new(50.0, 60.0));

        assert!(!seq.death_finished(3_499));
        assert!(seq.death_finished(3_500));
        assert_eq!(seq.death_frame(3_500).unwrap().fade_alpha, 255);
    }
}
