//! Content sources for managed files

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Where the bytes of a managed file come from.
///
/// Exactly one source is configured per file. The source is part of the
/// file's identity: switching it forces the file to be replaced rather
/// than updated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSource {
    /// Inline text content
    Plain(String),
    /// Inline text content withheld from debug output
    Sensitive(String),
    /// Base64-encoded payload, standard alphabet
    Base64(String),
}

impl ContentSource {
    /// Build a source from the three optional configuration attributes.
    ///
    /// Zero or more than one attribute being set is rejected here, never
    /// silently prioritized.
    pub fn from_attrs(
        content: Option<String>,
        sensitive_content: Option<String>,
        content_base64: Option<String>,
    ) -> Result<Self> {
        match (content, sensitive_content, content_base64) {
            (Some(text), None, None) => Ok(Self::Plain(text)),
            (None, Some(text), None) => Ok(Self::Sensitive(text)),
            (None, None, Some(encoded)) => Ok(Self::Base64(encoded)),
            (None, None, None) => Err(Error::MissingContent),
            (Some(_), Some(_), _) => {
                Err(Error::ConflictingContent("content", "sensitive_content"))
            }
            (Some(_), None, Some(_)) => {
                Err(Error::ConflictingContent("content", "content_base64"))
            }
            (None, Some(_), Some(_)) => Err(Error::ConflictingContent(
                "sensitive_content",
                "content_base64",
            )),
        }
    }

    /// Resolve the final byte payload.
    ///
    /// Base64 decoding happens here so a malformed payload surfaces
    /// before anything touches the filesystem.
    pub fn resolve(&self) -> Result<Vec<u8>> {
        match self {
            Self::Plain(text) | Self::Sensitive(text) => Ok(text.clone().into_bytes()),
            Self::Base64(encoded) => Ok(BASE64.decode(encoded)?),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(text) => f.debug_tuple("Plain").field(text).finish(),
            Self::Sensitive(_) => f.debug_tuple("Sensitive").field(&"<redacted>").finish(),
            Self::Base64(encoded) => f.debug_tuple("Base64").field(encoded).finish(),
        }
    }
}
