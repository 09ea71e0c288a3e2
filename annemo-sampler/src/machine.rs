//! Sampling state machine
//!
//! States:
//! - `Idle`: slider not held, no periodic timer
//! - `Armed`: slider held, timer running, playback not advancing
//! - `Playing`: slider held, timer running, playback advancing
//!
//! The timer is armed exactly when the state is not `Idle`. Ticks emit only in
//! `Playing`, so a paused video produces no samples even while held.
//!
//! `Sampler::handle` is pure: it reads the `Observation` taken by the driver
//! and returns the commands the driver must carry out, in order.

use annemo_common::{Dimension, EmotionSample, Submission, VALUE_RANGE};
use std::time::Duration;

/// Period between samples while the slider is held and playback advances
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// What is being annotated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationContext {
    pub subject: String,
    pub video: String,
    pub dimension: Dimension,
}

/// Player and clock readings taken when an event is handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub media_time: f64,
    pub advancing: bool,
    pub duration: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub client_time_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Armed,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SamplerEvent {
    PointerDown,
    PointerUp,
    SliderMoved(f64),
    /// The player started or stopped advancing on its own
    PlaybackChanged,
    Tick,
    ContentEnded,
    ContextChanged(AnnotationContext),
    Teardown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartPlayback,
    PausePlayback,
    ArmTimer,
    CancelTimer,
    ResetPlaybackRate,
    Emit(Submission<EmotionSample>),
}

#[derive(Debug, Clone)]
pub struct Sampler {
    context: AnnotationContext,
    state: SamplerState,
    value: f64,
}

impl Sampler {
    pub fn new(context: AnnotationContext) -> Self {
        Self {
            context,
            state: SamplerState::Idle,
            value: 0.0,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn context(&self) -> &AnnotationContext {
        &self.context
    }

    pub fn timer_armed(&self) -> bool {
        self.state != SamplerState::Idle
    }

    pub fn handle(&mut self, event: SamplerEvent, obs: &Observation) -> Vec<Command> {
        match event {
            SamplerEvent::PointerDown => {
                if self.state != SamplerState::Idle {
                    return Vec::new();
                }
                self.state = if obs.advancing {
                    SamplerState::Playing
                } else {
                    SamplerState::Armed
                };
                vec![
                    Command::StartPlayback,
                    Command::ArmTimer,
                    Command::Emit(self.sample(obs, obs.media_time, obs.advancing)),
                ]
            }
            SamplerEvent::PointerUp => {
                if self.state == SamplerState::Idle {
                    return Vec::new();
                }
                self.state = SamplerState::Idle;
                vec![
                    Command::PausePlayback,
                    Command::CancelTimer,
                    Command::Emit(self.sample(obs, obs.media_time, false)),
                ]
            }
            SamplerEvent::SliderMoved(value) => {
                // NaN keeps the previous reading
                if !value.is_nan() {
                    self.value = value.clamp(*VALUE_RANGE.start(), *VALUE_RANGE.end());
                }
                Vec::new()
            }
            SamplerEvent::PlaybackChanged => {
                self.reconcile(obs);
                Vec::new()
            }
            SamplerEvent::Tick => {
                self.reconcile(obs);
                if self.state == SamplerState::Playing {
                    vec![Command::Emit(self.sample(obs, obs.media_time, true))]
                } else {
                    Vec::new()
                }
            }
            SamplerEvent::ContentEnded => {
                if self.state == SamplerState::Playing {
                    self.state = SamplerState::Armed;
                }
                let end = obs.duration.unwrap_or(obs.media_time);
                vec![Command::Emit(self.sample(obs, end, false))]
            }
            SamplerEvent::ContextChanged(context) => {
                let mut commands = Vec::new();
                if self.state != SamplerState::Idle {
                    commands.push(Command::CancelTimer);
                    commands.push(Command::PausePlayback);
                }
                commands.push(Command::ResetPlaybackRate);
                self.state = SamplerState::Idle;
                self.value = 0.0;
                self.context = context;
                commands
            }
            SamplerEvent::Teardown => {
                if self.state == SamplerState::Idle {
                    return Vec::new();
                }
                self.state = SamplerState::Idle;
                vec![Command::CancelTimer, Command::PausePlayback]
            }
        }
    }

    /// Follow the player between Armed and Playing
    fn reconcile(&mut self, obs: &Observation) {
        self.state = match self.state {
            SamplerState::Armed if obs.advancing => SamplerState::Playing,
            SamplerState::Playing if !obs.advancing => SamplerState::Armed,
            state => state,
        };
    }

    fn sample(&self, obs: &Observation, media_time: f64, playing: bool) -> Submission<EmotionSample> {
        Submission {
            subject: self.context.subject.clone(),
            data: EmotionSample {
                client_time: obs.client_time_ms,
                subject: Some(self.context.subject.clone()),
                video: Some(self.context.video.clone()),
                dimension: self.context.dimension,
                media_time,
                value: self.value,
                playing,
            },
        }
    }
}
