//! Destinations for emitted samples
//!
//! `emit` must not block the session: the HTTP sink hands each submission to
//! its own task and only logs failures. Samples are not retried or buffered.

use annemo_common::{EmotionSample, Submission};
use tokio::sync::mpsc;
use tracing::warn;

use crate::client::IngestClient;

pub trait SampleSink: Send + 'static {
    fn emit(&self, submission: Submission<EmotionSample>);
}

/// Forwards samples to a channel; dropped silently once the receiver is gone
impl SampleSink for mpsc::UnboundedSender<Submission<EmotionSample>> {
    fn emit(&self, submission: Submission<EmotionSample>) {
        let _ = self.send(submission);
    }
}

/// Posts every sample to `POST /emotion`
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: IngestClient,
}

impl HttpSink {
    pub fn new(client: IngestClient) -> Self {
        Self { client }
    }
}

impl SampleSink for HttpSink {
    fn emit(&self, submission: Submission<EmotionSample>) {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.submit_emotion(&submission).await {
                warn!(
                    "Dropped {} sample for {} at t={}: {}",
                    submission.data.dimension, submission.subject, submission.data.media_time, e
                );
            }
        });
    }
}
