//! Encoded photo payloads.
//!
//! A [`Photo`] is a `data:` URL holding one base64-encoded still image. Apart
//! from display, nothing in the crate looks inside it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// MIME type used when a frame does not name one.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// An embedded image attached to a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(String);

impl Photo {
    /// Encode raw image bytes as a `data:` URL.
    #[must_use]
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    /// Wrap an already encoded `data:` URL.
    #[must_use]
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The full `data:` URL.
    #[must_use]
    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// The MIME type named in the URL header, if well formed.
    #[must_use]
    pub fn mime(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split_once(',')?.0;
        header.strip_suffix(";base64")
    }

    /// Decode the image bytes. Returns `None` for malformed payloads.
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        let (_, body) = self.0.split_once(";base64,")?;
        STANDARD.decode(body).ok()
    }
}
