//! # Annemo Common Library
//!
//! Shared code for the annotation ingest service and its clients:
//! - Error taxonomy shared by server and client
//! - Wire types for emotion and social samples
//! - Subject/content registry loading and validation
//! - Layered settings resolution (CLI > env > TOML > defaults)

pub mod config;
pub mod error;
pub mod registry;
pub mod samples;

pub use error::{Error, Result};
pub use registry::{content_stem, Registry};
pub use samples::{
    Dimension, EmotionSample, SocialAxis, SocialDimensions, SocialSample, Submission, VALUE_RANGE,
};
