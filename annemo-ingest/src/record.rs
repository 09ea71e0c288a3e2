//! Log record formatting
//!
//! A record is one comma-separated text line. Text fields containing a comma
//! are wrapped in double quotes with inner quotes backslash-escaped; all other
//! fields are written verbatim. Line breaks inside text fields are flattened
//! to spaces so a record always occupies exactly one line.

use annemo_common::{EmotionSample, SocialSample};
use chrono::{DateTime, Datelike, TimeZone};
use std::borrow::Cow;
use std::fmt;

/// Marker opening every social record
pub const SOCIAL_MARKER: &str = "Social";

/// Quote `value` if it contains the field delimiter
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains(',') {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// One formatted line, without the trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord(String);

impl LogRecord {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Line bytes including the terminating newline
    pub fn to_line(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.0.len() + 1);
        line.extend_from_slice(self.0.as_bytes());
        line.push(b'\n');
        line
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<String>,
}

impl RecordBuilder {
    pub fn text(mut self, value: &str) -> Self {
        let single_line: Cow<'_, str> = if value.contains(['\r', '\n']) {
            Cow::Owned(value.replace(['\r', '\n'], " "))
        } else {
            Cow::Borrowed(value)
        };
        self.fields.push(escape_field(&single_line).into_owned());
        self
    }

    /// Numbers and booleans never contain the delimiter
    pub fn value<T: fmt::Display>(mut self, value: T) -> Self {
        self.fields.push(value.to_string());
        self
    }

    pub fn build(self) -> LogRecord {
        LogRecord(self.fields.join(","))
    }
}

/// Emotion record: server time, client time, subject, content item,
/// dimension, media time, playing, value
pub fn emotion_record(server_time: &str, subject: &str, sample: &EmotionSample) -> LogRecord {
    LogRecord::builder()
        .text(server_time)
        .value(sample.client_time)
        .text(subject)
        .text(sample.video.as_deref().unwrap_or(""))
        .value(sample.dimension)
        .value(sample.media_time)
        .value(sample.playing)
        .value(sample.value)
        .build()
}

/// Social record: marker, subject, content item, then the five axes
pub fn social_record(subject: &str, sample: &SocialSample) -> LogRecord {
    sample.dimensions.values().into_iter().fold(
        LogRecord::builder()
            .text(SOCIAL_MARKER)
            .text(subject)
            .text(sample.video.as_deref().unwrap_or("")),
        |builder, value| builder.value(value),
    )
    .build()
}

/// Server wall clock as `Friday, October 16th, 2026, 3:04:05 PM`
pub fn format_server_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let day = at.day();
    format!(
        "{}, {} {}{}, {}",
        at.format("%A"),
        at.format("%B"),
        day,
        ordinal_suffix(day),
        at.format("%Y, %-I:%M:%S %p")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annemo_common::{Dimension, SocialAxis, SocialDimensions};
    use chrono::Utc;

    #[test]
    fn test_escape_identity_without_comma() {
        for s in ["", "alice", "clip \"raw\".mp4", "0.5", "quote\"only"] {
            assert_eq!(escape_field(s), s);
            // Applying twice is still the identity
            assert_eq!(escape_field(&escape_field(s)), s);
        }
    }

    #[test]
    fn test_escape_wraps_and_escapes_quotes() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\", then go"), "\"say \\\"hi\\\", then go\"");
    }

    #[test]
    fn test_builder_flattens_line_breaks() {
        let record = LogRecord::builder().text("two\nlines").text("x\r\ny").build();
        assert_eq!(record.as_str(), "two lines,x  y");
        assert_eq!(record.to_line(), b"two lines,x  y\n");
    }

    #[test]
    fn test_emotion_record_field_order() {
        let sample = EmotionSample {
            client_time: 1000,
            subject: None,
            video: Some("clip.mp4".into()),
            dimension: Dimension::Arousal,
            media_time: 1.2,
            value: 0.5,
            playing: true,
        };
        let record = emotion_record("\"Mon, 1\"", "alice", &sample);
        assert_eq!(
            record.as_str(),
            "\"\\\"Mon, 1\\\"\",1000,alice,clip.mp4,arousal,1.2,true,0.5"
        );
    }

    #[test]
    fn test_emotion_record_without_video_keeps_column() {
        let sample = EmotionSample {
            client_time: 7,
            subject: None,
            video: None,
            dimension: Dimension::Valence,
            media_time: 0.0,
            value: -1.0,
            playing: false,
        };
        let record = emotion_record("now", "bob", &sample);
        assert_eq!(record.as_str(), "now,7,bob,,valence,0,false,-1");
    }

    #[test]
    fn test_social_record_axis_order() {
        let mut dimensions = SocialDimensions::default();
        dimensions.set(SocialAxis::Agreement, 1.0);
        dimensions.set(SocialAxis::Rapport, -0.33);
        let sample = SocialSample {
            subject: None,
            video: Some("b.mp4".into()),
            dimensions,
        };
        assert_eq!(
            social_record("alice", &sample).as_str(),
            "Social,alice,b.mp4,1,0,0,0,-0.33"
        );
    }

    #[test]
    fn test_server_time_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 5).unwrap();
        assert_eq!(format_server_time(&at), "Friday, October 16th, 2026, 3:04:05 PM");

        let morning = Utc.with_ymd_and_hms(2026, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(format_server_time(&morning), "Thursday, January 1st, 2026, 12:30:00 AM");
    }

    #[test]
    fn test_ordinal_suffixes() {
        let expected = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (31, "st"),
        ];
        for (day, suffix) in expected {
            assert_eq!(ordinal_suffix(day), suffix, "day {}", day);
        }
    }
}
