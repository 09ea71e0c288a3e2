//! HTTP client for the ingest service

use annemo_common::{EmotionSample, SocialSample, Submission};
use reqwest::Response;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VideosBody {
    videos: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocationBody {
    location: String,
}

#[derive(Debug, Clone)]
pub struct IngestClient {
    http: reqwest::Client,
    base_url: String,
}

impl IngestClient {
    /// Client for the service at `base_url` (e.g. `http://127.0.0.1:3001`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn submit_emotion(&self, submission: &Submission<EmotionSample>) -> Result<()> {
        let response = self.http.post(self.url("/emotion")).json(submission).send().await?;
        check(response).await?;
        debug!(
            "Submitted {} sample for {} at t={}",
            submission.data.dimension, submission.subject, submission.data.media_time
        );
        Ok(())
    }

    pub async fn submit_social(&self, submission: &Submission<SocialSample>) -> Result<()> {
        let response = self.http.post(self.url("/social")).json(submission).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Content items available to `subject`
    pub async fn videos(&self, subject: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url("/videos"))
            .query(&[("subject", subject)])
            .send()
            .await?;
        let body: VideosBody = check(response).await?.json().await?;
        Ok(body.videos)
    }

    /// Base URL the content items are served from
    pub async fn location(&self) -> Result<String> {
        let response = self.http.get(self.url("/location")).send().await?;
        let body: LocationBody = check(response).await?.json().await?;
        Ok(body.location)
    }
}

/// Full URL of a content item below `location`
pub fn content_url(location: &str, video: &str) -> String {
    format!("{}/{}", location.trim_end_matches('/'), video)
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
