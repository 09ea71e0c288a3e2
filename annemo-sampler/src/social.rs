//! One-shot social rating form shown after a content item

use annemo_common::{SocialAxis, SocialDimensions, SocialSample, Submission, VALUE_RANGE};
use tracing::info;

use crate::client::IngestClient;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct SocialRatingForm {
    subject: String,
    video: String,
    dimensions: SocialDimensions,
    submitted: bool,
}

impl SocialRatingForm {
    pub fn new(subject: impl Into<String>, video: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            video: video.into(),
            dimensions: SocialDimensions::default(),
            submitted: false,
        }
    }

    /// Set one axis, clamped to the slider range; ignored after submission
    pub fn set(&mut self, axis: SocialAxis, value: f64) {
        if self.submitted || value.is_nan() {
            return;
        }
        self.dimensions
            .set(axis, value.clamp(*VALUE_RANGE.start(), *VALUE_RANGE.end()));
    }

    pub fn get(&self, axis: SocialAxis) -> f64 {
        self.dimensions.get(axis)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn to_submission(&self) -> Submission<SocialSample> {
        Submission {
            subject: self.subject.clone(),
            data: SocialSample {
                subject: Some(self.subject.clone()),
                video: Some(self.video.clone()),
                dimensions: self.dimensions,
            },
        }
    }

    /// Send the rating and wait for the acknowledgement
    ///
    /// A failed submission leaves the form open so it can be sent again.
    pub async fn submit(&mut self, client: &IngestClient) -> Result<()> {
        if self.submitted {
            return Err(ClientError::AlreadySubmitted);
        }
        client.submit_social(&self.to_submission()).await?;
        self.submitted = true;
        info!("Social rating submitted for {} / {}", self.subject, self.video);
        Ok(())
    }
}
