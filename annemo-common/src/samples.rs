//! Wire types for annotation samples
//!
//! These shapes are shared by the ingest service (which deserializes and
//! validates them) and the sampler client (which produces them). Field names
//! on the wire follow the browser client's JSON (`clienttime`, `time`,
//! `playing`, capitalized social axes).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Inclusive range every slider value must fall into
pub const VALUE_RANGE: std::ops::RangeInclusive<f64> = -1.0..=1.0;

/// Continuous emotional axis annotated during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Arousal,
    Valence,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Arousal => "arousal",
            Dimension::Valence => "valence",
        }
    }

    /// Labels shown at the two ends of the annotation slider
    pub fn scale_labels(&self) -> (&'static str, &'static str) {
        match self {
            Dimension::Arousal => ("very calm", "very excited"),
            Dimension::Valence => ("very negative", "very positive"),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arousal" => Ok(Dimension::Arousal),
            "valence" => Ok(Dimension::Valence),
            other => Err(Error::InvalidSample(format!("unknown dimension '{}'", other))),
        }
    }
}

/// Request envelope used by both `POST /emotion` and `POST /social`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission<T> {
    pub subject: String,
    pub data: T,
}

/// One time-stamped slider reading taken during playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    /// Client wall clock in milliseconds since the Unix epoch
    #[serde(rename = "clienttime")]
    pub client_time: i64,

    /// Optional echo of the envelope subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Content item being annotated (e.g. `interview-03.mp4`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,

    pub dimension: Dimension,

    /// Media position in seconds
    #[serde(rename = "time")]
    pub media_time: f64,

    pub value: f64,

    pub playing: bool,
}

impl EmotionSample {
    /// Check numeric ranges and that any echoed subject matches `subject`
    pub fn validate(&self, subject: &str) -> Result<()> {
        check_echoed_subject(self.subject.as_deref(), subject)?;
        check_value("value", self.value)?;
        if !self.media_time.is_finite() || self.media_time < 0.0 {
            return Err(Error::InvalidSample(format!(
                "media time must be a non-negative number, got {}",
                self.media_time
            )));
        }
        Ok(())
    }
}

/// Fixed social rating axes, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialAxis {
    Agreement,
    Engagement,
    Dominance,
    Performance,
    Rapport,
}

impl SocialAxis {
    pub const ALL: [SocialAxis; 5] = [
        SocialAxis::Agreement,
        SocialAxis::Engagement,
        SocialAxis::Dominance,
        SocialAxis::Performance,
        SocialAxis::Rapport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialAxis::Agreement => "Agreement",
            SocialAxis::Engagement => "Engagement",
            SocialAxis::Dominance => "Dominance",
            SocialAxis::Performance => "Performance",
            SocialAxis::Rapport => "Rapport",
        }
    }
}

impl fmt::Display for SocialAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ratings on the five social axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SocialDimensions {
    pub agreement: f64,
    pub engagement: f64,
    pub dominance: f64,
    pub performance: f64,
    pub rapport: f64,
}

impl SocialDimensions {
    pub fn get(&self, axis: SocialAxis) -> f64 {
        match axis {
            SocialAxis::Agreement => self.agreement,
            SocialAxis::Engagement => self.engagement,
            SocialAxis::Dominance => self.dominance,
            SocialAxis::Performance => self.performance,
            SocialAxis::Rapport => self.rapport,
        }
    }

    pub fn set(&mut self, axis: SocialAxis, value: f64) {
        let slot = match axis {
            SocialAxis::Agreement => &mut self.agreement,
            SocialAxis::Engagement => &mut self.engagement,
            SocialAxis::Dominance => &mut self.dominance,
            SocialAxis::Performance => &mut self.performance,
            SocialAxis::Rapport => &mut self.rapport,
        };
        *slot = value;
    }

    /// Values in `SocialAxis::ALL` order
    pub fn values(&self) -> [f64; 5] {
        SocialAxis::ALL.map(|axis| self.get(axis))
    }
}

/// One discrete rating per subject/content pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,

    pub dimensions: SocialDimensions,
}

impl SocialSample {
    pub fn validate(&self, subject: &str) -> Result<()> {
        check_echoed_subject(self.subject.as_deref(), subject)?;
        for axis in SocialAxis::ALL {
            check_value(axis.as_str(), self.dimensions.get(axis))?;
        }
        Ok(())
    }
}

fn check_echoed_subject(echoed: Option<&str>, subject: &str) -> Result<()> {
    match echoed {
        Some(inner) if inner != subject => Err(Error::InvalidSample(format!(
            "sample subject '{}' does not match request subject '{}'",
            inner, subject
        ))),
        _ => Ok(()),
    }
}

fn check_value(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && VALUE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidSample(format!(
            "{} must be within [-1, 1], got {}",
            name, value
        )))
    }
}
