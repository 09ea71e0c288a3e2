//! Media player abstraction
//!
//! The session only needs to read the playback position and to start, pause
//! and re-rate playback. `SimulatedPlayer` implements that against the tokio
//! clock, for headless annotation runs and for tests with a paused clock.

use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Playback speeds offered to annotators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRate {
    Quarter,
    Half,
    #[default]
    Normal,
    Double,
}

impl PlaybackRate {
    pub const ALL: [PlaybackRate; 4] = [
        PlaybackRate::Quarter,
        PlaybackRate::Half,
        PlaybackRate::Normal,
        PlaybackRate::Double,
    ];

    pub fn as_f64(&self) -> f64 {
        match self {
            PlaybackRate::Quarter => 0.25,
            PlaybackRate::Half => 0.5,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::Double => 2.0,
        }
    }

    pub fn from_f64(rate: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_f64() == rate)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.as_f64())
    }
}

pub trait MediaPlayer: Send + 'static {
    /// Current position in seconds
    fn position(&self) -> f64;

    /// Whether the position is moving forward right now
    fn is_advancing(&self) -> bool;

    /// Total length in seconds, when known
    fn duration(&self) -> Option<f64>;

    fn play(&mut self);

    fn pause(&mut self);

    fn set_playback_rate(&mut self, rate: PlaybackRate);
}

/// Clock-driven stand-in for a real player
///
/// Clones share the same timeline, so a test can keep a handle while the
/// session owns another.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    inner: Arc<Mutex<Timeline>>,
}

#[derive(Debug)]
struct Timeline {
    duration: f64,
    rate: PlaybackRate,
    /// Position when playback last started or paused
    anchor: f64,
    /// Set while playing
    started: Option<Instant>,
}

impl Timeline {
    fn position(&self) -> f64 {
        let elapsed = self
            .started
            .map(|at| at.elapsed().as_secs_f64() * self.rate.as_f64())
            .unwrap_or(0.0);
        (self.anchor + elapsed).min(self.duration)
    }

    fn settle(&mut self) {
        self.anchor = self.position();
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }
}

impl SimulatedPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Timeline {
                duration,
                rate: PlaybackRate::Normal,
                anchor: 0.0,
                started: None,
            })),
        }
    }

    fn timeline(&self) -> std::sync::MutexGuard<'_, Timeline> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_playing(&self) -> bool {
        self.timeline().started.is_some()
    }

    pub fn playback_rate(&self) -> PlaybackRate {
        self.timeline().rate
    }

    pub fn seek(&self, position: f64) {
        let mut timeline = self.timeline();
        timeline.anchor = position.clamp(0.0, timeline.duration);
        if timeline.started.is_some() {
            timeline.started = Some(Instant::now());
        }
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn position(&self) -> f64 {
        self.timeline().position()
    }

    fn is_advancing(&self) -> bool {
        let timeline = self.timeline();
        timeline.started.is_some() && timeline.position() < timeline.duration
    }

    fn duration(&self) -> Option<f64> {
        Some(self.timeline().duration)
    }

    fn play(&mut self) {
        let mut timeline = self.timeline();
        if timeline.started.is_none() {
            timeline.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let mut timeline = self.timeline();
        timeline.settle();
        timeline.started = None;
    }

    fn set_playback_rate(&mut self, rate: PlaybackRate) {
        let mut timeline = self.timeline();
        timeline.settle();
        timeline.rate = rate;
    }
}
