//! Canonical base64 image payload shared by every stage after normalization.

use base64::Engine;

use crate::error::PipelineError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Base64-encoded image ready to send to an LLM API.
///
/// The payload is always valid standard base64, so the image can be decoded
/// without any external context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    media_type: String,
    data: String,
}

impl EncodedImage {
    /// Encode raw bytes with the given MIME type (e.g. "image/jpeg").
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<media-type>;base64,<payload>` URL.
    ///
    /// The media type is kept verbatim (parameters included) so that
    /// [`data_url`](Self::data_url) reproduces the input exactly.
    pub fn from_data_url(url: &str) -> Result<Self, PipelineError> {
        let rest = url
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| invalid("inline payload must start with 'data:'"))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| invalid("inline payload has no ',' separator"))?;
        let media_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| invalid("inline payload is not base64-encoded"))?;

        if media_type.is_empty() {
            return Err(invalid("inline payload has no media type"));
        }
        if data.is_empty() {
            return Err(invalid("inline payload is empty"));
        }
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| invalid(&format!("inline payload is not valid base64: {e}")))?;

        Ok(Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        })
    }

    /// MIME type, e.g. "image/png".
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// MIME type without parameters, e.g. "image/jpeg" for "image/jpeg;name=a.jpg".
    pub fn base_media_type(&self) -> &str {
        self.media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Raw base64 payload (no data URL header).
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("{DATA_PREFIX}{}{BASE64_MARKER},{}", self.media_type, self.data)
    }

    /// Decode the payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>, PipelineError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| invalid(&format!("payload is not valid base64: {e}")))
    }
}

fn invalid(message: &str) -> PipelineError {
    PipelineError::InvalidImage {
        message: message.to_string(),
    }
}
