//! Annemo Sampler - client-side annotation sampling
//!
//! Turns a continuously held slider into a stream of time-stamped emotion
//! samples while the content plays, and submits them to the ingest service.
//!
//! The decision logic lives in [`machine::Sampler`], a synchronous state
//! machine with no clock or I/O. [`session::AnnotationSession`] drives it from
//! a tokio task that owns the media player, the sample sink and the periodic
//! tick.

pub mod client;
pub mod error;
pub mod machine;
pub mod player;
pub mod session;
pub mod sink;
pub mod social;
pub mod timer;

pub use client::IngestClient;
pub use error::{ClientError, Result};
pub use machine::{AnnotationContext, Command, Observation, Sampler, SamplerEvent, SamplerState};
pub use player::{MediaPlayer, PlaybackRate, SimulatedPlayer};
pub use session::{AnnotationSession, SessionSnapshot};
pub use sink::{HttpSink, SampleSink};
pub use social::SocialRatingForm;
