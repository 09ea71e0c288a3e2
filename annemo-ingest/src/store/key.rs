//! Log key derivation
//!
//! A `LogKey` names the single file a sample is appended to. Derivation is a
//! pure function of the sample's subject, content item and stream, so two
//! samples with the same inputs always land in the same file.

use annemo_common::config::KeyLayout;
use annemo_common::{content_stem, Dimension};

use super::names::LOG_EXTENSION;

/// Which series within a subject/content pair a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Emotion(Dimension),
    Social,
}

impl Stream {
    fn as_str(&self) -> &'static str {
        match self {
            Stream::Emotion(dimension) => dimension.as_str(),
            Stream::Social => "social",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogKey {
    /// Legacy form: everything a subject submits goes to one file
    Subject { subject: String },
    Stream {
        subject: String,
        content: Option<String>,
        stream: Stream,
    },
}

impl LogKey {
    pub fn for_emotion(
        layout: KeyLayout,
        subject: &str,
        content_item: Option<&str>,
        dimension: Dimension,
    ) -> Self {
        Self::derive(layout, subject, content_item, Stream::Emotion(dimension))
    }

    pub fn for_social(layout: KeyLayout, subject: &str, content_item: Option<&str>) -> Self {
        Self::derive(layout, subject, content_item, Stream::Social)
    }

    fn derive(layout: KeyLayout, subject: &str, content_item: Option<&str>, stream: Stream) -> Self {
        match layout {
            KeyLayout::PerSubject => LogKey::Subject {
                subject: subject.to_string(),
            },
            KeyLayout::PerStream => LogKey::Stream {
                subject: subject.to_string(),
                content: content_item.and_then(content_stem).map(str::to_string),
                stream,
            },
        }
    }

    /// File name inside the results directory, e.g. `alice_clip01_arousal.csv`
    pub fn file_name(&self) -> String {
        let stem = match self {
            LogKey::Subject { subject } => encode_segment(subject),
            LogKey::Stream {
                subject,
                content,
                stream,
            } => {
                let mut segments = vec![encode_segment(subject)];
                if let Some(content) = content {
                    segments.push(encode_segment(content));
                }
                segments.push(stream.as_str().to_string());
                segments.join("_")
            }
        };
        format!("{}.{}", stem, LOG_EXTENSION)
    }
}

/// Encode a key segment into `[A-Za-z0-9-]`
///
/// Every byte outside `[A-Za-z0-9]` (including `-` and `_`) becomes `-XX`
/// with two uppercase hex digits. The encoding is injective and never emits
/// `_`, so segments joined with `_` cannot run into each other.
fn encode_segment(segment: &str) -> String {
    if segment.is_empty() {
        // A lone `-` is not a valid escape, so it cannot clash with any encoding
        return "-".to_string();
    }
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("-{:02X}", byte));
        }
    }
    encoded
}
