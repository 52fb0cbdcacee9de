//! Raster payloads carried between the image generator, compositor and transports.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;

pub const PNG_MIME: &str = "image/png";
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Encoded image bytes plus their MIME type.
///
/// Decoding helpers are lenient: malformed input yields an empty payload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime: String,
    pub bytes: Bytes,
}

impl ImageData {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn png(bytes: impl Into<Bytes>) -> Self {
        Self::new(PNG_MIME, bytes)
    }

    pub fn empty() -> Self {
        Self::new(UNKNOWN_MIME, Bytes::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Decodes standard base64 (whitespace tolerated). Invalid input keeps the
    /// MIME type but carries no bytes.
    pub fn from_base64(mime: &str, data: &str) -> Self {
        let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => Self::new(mime, bytes),
            Err(_) => Self::new(mime, Bytes::new()),
        }
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
