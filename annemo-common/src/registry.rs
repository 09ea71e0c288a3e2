//! Subject and content registry
//!
//! The registry is read once at startup from a JSON document of the form
//!
//! ```json
//! { "location": "https://media.example.org/clips",
//!   "videos": ["a.mp4", "b.mp4"],
//!   "users": ["alice", "bob"] }
//! ```
//!
//! Any deviation (missing key, wrong type, empty string, extra key) is a
//! `ConfigInvalid` error. So are two distinct content items with the same
//! file stem, since they would share a log file. A loaded `Registry` is
//! immutable; services share it behind an `Arc`.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Raw document shape, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDocument {
    location: String,
    videos: Vec<String>,
    users: Vec<String>,
}

/// Validated set of known subjects and content items
#[derive(Debug, Clone)]
pub struct Registry {
    location: String,
    videos: Vec<String>,
    users: HashSet<String>,
}

impl Registry {
    /// Build a registry from already-validated parts
    pub fn new<L, V, U>(location: L, videos: V, users: U) -> Result<Self>
    where
        L: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
        U: IntoIterator,
        U::Item: Into<String>,
    {
        let doc = RegistryDocument {
            location: location.into(),
            videos: videos.into_iter().map(Into::into).collect(),
            users: users.into_iter().map(Into::into).collect(),
        };
        Self::from_document(doc)
    }

    /// Load and validate the registry file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigInvalid(format!("cannot read registry {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json(&text)?;
        debug!(
            "Loaded registry from {}: {} subjects, {} content items",
            path.display(),
            registry.users.len(),
            registry.videos.len()
        );
        Ok(registry)
    }

    /// Parse and validate a registry document
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: RegistryDocument = serde_json::from_str(text)
            .map_err(|e| Error::ConfigInvalid(format!("registry document: {}", e)))?;
        Self::from_document(doc)
    }

    fn from_document(doc: RegistryDocument) -> Result<Self> {
        if doc.location.trim().is_empty() {
            return Err(Error::ConfigInvalid("location must not be empty".into()));
        }
        if let Some(pos) = doc.videos.iter().position(|v| v.trim().is_empty()) {
            return Err(Error::ConfigInvalid(format!("videos[{}] is empty", pos)));
        }
        if let Some(pos) = doc.users.iter().position(|u| u.trim().is_empty()) {
            return Err(Error::ConfigInvalid(format!("users[{}] is empty", pos)));
        }

        let mut stems: HashMap<&str, &str> = HashMap::new();
        for (pos, video) in doc.videos.iter().map(String::as_str).enumerate() {
            let stem = content_stem(video).ok_or_else(|| {
                Error::ConfigInvalid(format!("videos[{}] has no usable file name", pos))
            })?;
            match stems.insert(stem, video) {
                Some(other) if other != video => {
                    return Err(Error::ConfigInvalid(format!(
                        "videos '{}' and '{}' share the file stem '{}'",
                        other, video, stem
                    )));
                }
                _ => {}
            }
        }

        Ok(Self {
            location: doc.location,
            videos: doc.videos,
            users: doc.users.into_iter().collect(),
        })
    }

    /// Base location content items are served from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// All content items, in document order
    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    pub fn subject_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_known_subject(&self, name: &str) -> bool {
        self.users.contains(name)
    }

    pub fn is_known_content(&self, item: &str) -> bool {
        self.videos.iter().any(|v| v == item)
    }

    /// Content available to `subject`
    ///
    /// Known subjects see the full list; unknown subjects get an empty slice.
    pub fn list_content_for(&self, subject: &str) -> &[String] {
        if self.is_known_subject(subject) {
            &self.videos
        } else {
            &[]
        }
    }
}

/// Basename of a content item without its final extension
///
/// Returns `None` when nothing usable remains.
pub fn content_stem(content_item: &str) -> Option<&str> {
    let base = content_item
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(content_item);
    let stem = match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    };
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        None
    } else {
        Some(stem)
    }
}
