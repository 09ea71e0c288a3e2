//! Annotation session driver
//!
//! One tokio task per session owns the player, the sink and the tick timer,
//! and feeds every input through the `Sampler`. Inputs arrive on an unbounded
//! channel, so UI callbacks never block. Dropping the `AnnotationSession`
//! handle closes the channel, which tears the session down and cancels the
//! timer.

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::machine::{
    AnnotationContext, Command, Observation, Sampler, SamplerEvent, SamplerState, TICK_INTERVAL,
};
use crate::player::{MediaPlayer, PlaybackRate};
use crate::sink::SampleSink;
use crate::timer::{next_tick, TickTimer};

/// Point-in-time view of a running session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SamplerState,
    pub value: f64,
    pub timer_armed: bool,
    pub playback_rate: PlaybackRate,
    pub context: AnnotationContext,
}

enum SessionInput {
    Event(SamplerEvent),
    SetPlaybackRate(PlaybackRate),
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

pub struct AnnotationSession {
    inputs: mpsc::UnboundedSender<SessionInput>,
    task: JoinHandle<()>,
}

impl AnnotationSession {
    /// Start a session for `context`; must be called within a tokio runtime
    pub fn spawn<P, S>(context: AnnotationContext, player: P, sink: S) -> Self
    where
        P: MediaPlayer,
        S: SampleSink,
    {
        let (inputs, rx) = mpsc::unbounded_channel();
        info!(
            "Annotation session started: {} / {} / {}",
            context.subject, context.video, context.dimension
        );
        let actor = SessionActor {
            sampler: Sampler::new(context),
            player,
            sink,
            timer: None,
            rate: PlaybackRate::Normal,
        };
        let task = tokio::spawn(actor.run(rx));
        Self { inputs, task }
    }

    fn send(&self, input: SessionInput) {
        // Fails only after the task is gone, when there is nothing left to drive
        let _ = self.inputs.send(input);
    }

    pub fn pointer_down(&self) {
        self.send(SessionInput::Event(SamplerEvent::PointerDown));
    }

    pub fn pointer_up(&self) {
        self.send(SessionInput::Event(SamplerEvent::PointerUp));
    }

    pub fn slider_moved(&self, value: f64) {
        self.send(SessionInput::Event(SamplerEvent::SliderMoved(value)));
    }

    /// The player started or stopped on its own (buffering, user pause)
    pub fn playback_changed(&self) {
        self.send(SessionInput::Event(SamplerEvent::PlaybackChanged));
    }

    pub fn content_ended(&self) {
        self.send(SessionInput::Event(SamplerEvent::ContentEnded));
    }

    /// Move to another content item or dimension
    pub fn change_context(&self, context: AnnotationContext) {
        self.send(SessionInput::Event(SamplerEvent::ContextChanged(context)));
    }

    pub fn set_playback_rate(&self, rate: PlaybackRate) {
        self.send(SessionInput::SetPlaybackRate(rate));
    }

    /// `None` once the session task has stopped
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionInput::Snapshot(tx));
        rx.await.ok()
    }

    /// Tear down and wait for the session task to finish
    pub async fn shutdown(self) {
        let AnnotationSession { inputs, task } = self;
        drop(inputs);
        let _ = task.await;
    }
}

struct SessionActor<P, S> {
    sampler: Sampler,
    player: P,
    sink: S,
    timer: Option<TickTimer>,
    rate: PlaybackRate,
}

impl<P: MediaPlayer, S: SampleSink> SessionActor<P, S> {
    async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<SessionInput>) {
        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(SessionInput::Event(event)) => self.dispatch(event),
                    Some(SessionInput::SetPlaybackRate(rate)) => self.apply_rate(rate),
                    Some(SessionInput::Snapshot(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    None => {
                        self.dispatch(SamplerEvent::Teardown);
                        break;
                    }
                },
                _ = next_tick(&mut self.timer) => self.dispatch(SamplerEvent::Tick),
            }
        }
        debug!("Annotation session stopped");
    }

    fn observe(&self) -> Observation {
        Observation {
            media_time: self.player.position(),
            advancing: self.player.is_advancing(),
            duration: self.player.duration(),
            client_time_ms: Utc::now().timestamp_millis(),
        }
    }

    fn dispatch(&mut self, event: SamplerEvent) {
        let observation = self.observe();
        for command in self.sampler.handle(event, &observation) {
            match command {
                Command::StartPlayback => self.player.play(),
                Command::PausePlayback => self.player.pause(),
                Command::ArmTimer => self.timer = Some(TickTimer::start(TICK_INTERVAL)),
                Command::CancelTimer => self.timer = None,
                Command::ResetPlaybackRate => self.apply_rate(PlaybackRate::Normal),
                Command::Emit(submission) => self.sink.emit(submission),
            }
        }
    }

    fn apply_rate(&mut self, rate: PlaybackRate) {
        if rate != self.rate {
            debug!("Playback rate {} -> {}", self.rate, rate);
        }
        self.rate = rate;
        self.player.set_playback_rate(rate);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.sampler.state(),
            value: self.sampler.value(),
            timer_armed: self.timer.is_some(),
            playback_rate: self.rate,
            context: self.sampler.context().clone(),
        }
    }
}
