// src/effects.rs
//! Schedules for the decorative browser timers. Pages embed the computed plan
//! as JSON and the inline script only replays it; nothing here touches page
//! state.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HeartSchedule {
    pub initial_count: u32,
    pub initial_spacing_ms: u64,
    pub interval_ms: u64,
    pub min_duration_s: f64,
    pub max_duration_s: f64,
    pub max_delay_s: f64,
    pub max_drift_px: f64,
    pub glyphs: &'static [&'static str],
}

impl Default for HeartSchedule {
    fn default() -> Self {
        Self {
            initial_count: 5,
            initial_spacing_ms: 2000,
            interval_ms: 3000,
            min_duration_s: 10.0,
            max_duration_s: 20.0,
            max_delay_s: 5.0,
            max_drift_px: 100.0,
            glyphs: &["❤️", "💕", "💖", "💗", "💓", "💝"],
        }
    }
}

impl HeartSchedule {
    /// When each of the first hearts appears, relative to page load.
    pub fn initial_offsets(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.initial_count)
            .map(|i| Duration::from_millis(u64::from(i) * self.initial_spacing_ms))
    }

    /// Upper bound on hearts alive at once; the script skips spawns past it.
    pub fn max_alive(&self) -> u64 {
        let longest = Duration::try_from_secs_f64((self.max_duration_s + self.max_delay_s).max(0.0))
            .unwrap_or(Duration::MAX);
        let longest_ms = u64::try_from(longest.as_millis()).unwrap_or(u64::MAX);
        (longest_ms / self.interval_ms.max(1))
            .saturating_add(1)
            .saturating_add(u64::from(self.initial_count))
    }

    fn plan(&self) -> HeartPlan {
        HeartPlan {
            initial_offsets_ms: self
                .initial_offsets()
                .map(|at| u64::try_from(at.as_millis()).unwrap_or(u64::MAX))
                .collect(),
            interval_ms: self.interval_ms.max(1),
            max_alive: self.max_alive(),
            min_duration_s: self.min_duration_s,
            max_duration_s: self.max_duration_s,
            max_delay_s: self.max_delay_s,
            max_drift_px: self.max_drift_px,
            glyphs: self.glyphs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    pub duration_ms: u64,
    pub tick_ms: u64,
    pub max_particles: f64,
    pub left_x: (f64, f64),
    pub right_x: (f64, f64),
    pub start_velocity: u32,
    pub spread: u32,
    /// Frames each particle lives for.
    pub particle_ticks: u32,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self {
            duration_ms: 3000,
            tick_ms: 250,
            max_particles: 50.0,
            left_x: (0.1, 0.3),
            right_x: (0.7, 0.9),
            start_velocity: 30,
            spread: 360,
            particle_ticks: 60,
        }
    }
}

impl ConfettiBurst {
    /// Particles per side at `elapsed`; `None` once the deadline has passed
    /// and the timer stops itself.
    pub fn particle_count(&self, elapsed: Duration) -> Option<f64> {
        let total = self.duration_ms as f64;
        let left = total - elapsed.as_millis() as f64;
        (left > 0.0).then(|| self.max_particles * (left / total))
    }

    /// Elapsed time of every tick that still fires a burst.
    pub fn ticks(&self) -> impl Iterator<Item = Duration> + '_ {
        let step = self.tick_ms.max(1);
        (1..)
            .map(move |i| Duration::from_millis(i * step))
            .take_while(move |at| self.particle_count(*at).is_some())
    }

    fn plan(&self) -> ConfettiPlan {
        ConfettiPlan {
            bursts: self
                .ticks()
                .filter_map(|at| {
                    self.particle_count(at).map(|particles| BurstTick {
                        at_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
                        particles,
                    })
                })
                .collect(),
            left_x: self.left_x,
            right_x: self.right_x,
            start_velocity: self.start_velocity,
            spread: self.spread,
            particle_ticks: self.particle_ticks,
        }
    }
}

/// How long the loading placeholder stays up. Validation has already run.
pub const LOADING_DELAY_MS: u64 = 400;

/// What a rendered page asks the browser to run.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub reveal_after_ms: Option<u64>,
    pub hearts: Option<HeartSchedule>,
    pub confetti: Option<ConfettiBurst>,
}

impl Effects {
    pub fn revealing(mut self) -> Self {
        self.reveal_after_ms = Some(LOADING_DELAY_MS);
        self
    }

    pub fn with_hearts(mut self, on: bool) -> Self {
        self.hearts = on.then(HeartSchedule::default);
        self
    }

    pub fn with_confetti(mut self) -> Self {
        self.confetti = Some(ConfettiBurst::default());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.reveal_after_ms.is_none() && self.hearts.is_none() && self.confetti.is_none()
    }

    /// The fully computed schedule handed to the page script.
    pub fn plan(&self) -> EffectsPlan {
        EffectsPlan {
            reveal_after_ms: self.reveal_after_ms,
            hearts: self.hearts.as_ref().map(HeartSchedule::plan),
            confetti: self.confetti.as_ref().map(ConfettiBurst::plan),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EffectsPlan {
    pub reveal_after_ms: Option<u64>,
    pub hearts: Option<HeartPlan>,
    pub confetti: Option<ConfettiPlan>,
}

#[derive(Debug, Serialize)]
pub struct HeartPlan {
    pub initial_offsets_ms: Vec<u64>,
    pub interval_ms: u64,
    pub max_alive: u64,
    pub min_duration_s: f64,
    pub max_duration_s: f64,
    pub max_delay_s: f64,
    pub max_drift_px: f64,
    pub glyphs: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct BurstTick {
    pub at_ms: u64,
    pub particles: f64,
}

#[derive(Debug, Serialize)]
pub struct ConfettiPlan {
    pub bursts: Vec<BurstTick>,
    pub left_x: (f64, f64),
    pub right_x: (f64, f64),
    pub start_velocity: u32,
    pub spread: u32,
    pub particle_ticks: u32,
}
