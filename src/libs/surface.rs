//! Compose surface abstraction.
//!
//! A compose surface is the editable region plus subject and recipient fields
//! where a message is drafted. The tracker only reads from it; how the data
//! is scraped is up to whoever feeds the events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a compose surface (one compose window or draft).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Recipient fields of a surface. `None` means the field was not read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
}

/// Read access to a compose surface.
///
/// Every accessor returns `None` for a field the surface could not read, so
/// callers can keep what they already know instead of overwriting it.
pub trait ComposeSurface {
    fn content(&self) -> Option<String>;
    fn recipients(&self) -> Recipients;
    fn subject(&self) -> Option<String>;

    /// A surface with no recipients, subject or body could not be read.
    fn is_empty(&self) -> bool {
        let blank = |field: Option<String>| field.map_or(true, |value| value.trim().is_empty());
        blank(self.content()) && blank(self.subject()) && blank(self.recipients().to)
    }
}

/// A point-in-time copy of a compose surface, as carried by tracker events.
/// Fields missing from the event stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SurfaceSnapshot {
    pub fn new(to: &str, subject: &str, content: &str) -> Self {
        Self {
            to: Some(to.to_string()),
            subject: Some(subject.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    /// A snapshot carrying only the message body.
    pub fn content_only(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }
}

impl ComposeSurface for SurfaceSnapshot {
    fn content(&self) -> Option<String> {
        self.content.clone()
    }

    fn recipients(&self) -> Recipients {
        Recipients {
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
        }
    }

    fn subject(&self) -> Option<String> {
        self.subject.clone()
    }
}
