//! Sample ingestion
//!
//! Validates incoming samples against the registry, formats them as log
//! records and appends them to the store. Each accepted call performs exactly
//! one append; rejected calls perform none. Storage failures are returned to
//! the caller as-is, without retry.

use annemo_common::config::KeyLayout;
use annemo_common::{EmotionSample, Error, Registry, Result, SocialSample};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::record::{emotion_record, format_server_time, social_record, LogRecord};
use crate::store::{AppendLogStore, LogKey};

pub struct IngestionService {
    registry: Arc<Registry>,
    store: Arc<AppendLogStore>,
    layout: KeyLayout,
}

impl IngestionService {
    pub fn new(registry: Arc<Registry>, store: Arc<AppendLogStore>, layout: KeyLayout) -> Self {
        Self {
            registry,
            store,
            layout,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Record one emotion sample for `subject`
    pub async fn submit_emotion(&self, subject: &str, sample: &EmotionSample) -> Result<PathBuf> {
        self.check_subject(subject)?;
        sample.validate(subject)?;
        self.check_content(sample.video.as_deref())?;

        let server_time = format_server_time(&Local::now());
        let record = emotion_record(&server_time, subject, sample);
        let key = LogKey::for_emotion(
            self.layout,
            subject,
            sample.video.as_deref(),
            sample.dimension,
        );
        self.persist(&key, &record).await
    }

    /// Record one social rating for `subject`
    pub async fn submit_social(&self, subject: &str, sample: &SocialSample) -> Result<PathBuf> {
        self.check_subject(subject)?;
        sample.validate(subject)?;
        self.check_content(sample.video.as_deref())?;

        let record = social_record(subject, sample);
        let key = LogKey::for_social(self.layout, subject, sample.video.as_deref());
        self.persist(&key, &record).await
    }

    fn check_subject(&self, subject: &str) -> Result<()> {
        if self.registry.is_known_subject(subject) {
            Ok(())
        } else {
            warn!("Rejected sample for unknown subject {:?}", subject);
            Err(Error::UnknownSubject(subject.to_string()))
        }
    }

    /// An absent content item is allowed; a present one must be registered
    fn check_content(&self, content_item: Option<&str>) -> Result<()> {
        match content_item {
            Some(item) if !self.registry.is_known_content(item) => {
                warn!("Rejected sample for unknown content item {:?}", item);
                Err(Error::InvalidSample(format!("unknown content item '{}'", item)))
            }
            _ => Ok(()),
        }
    }

    async fn persist(&self, key: &LogKey, record: &LogRecord) -> Result<PathBuf> {
        match self.store.append(key, record).await {
            Ok(path) => {
                debug!("Stored sample in {}", path.display());
                Ok(path)
            }
            Err(e) => {
                error!("Failed to store sample for {}: {}", key.file_name(), e);
                Err(e)
            }
        }
    }
}
