//! Inline media handling.
//!
//! Media travels as a data URI (`data:<mimetype>;base64,<encoded_data>`). Nothing here
//! decodes the payload; the URI is only split so a provider can place the pieces in its
//! own wire format.

use std::fmt;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// An attachment referenced by data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    pub url: String,
}

impl MediaPart {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn data_uri(&self) -> Result<DataUri<'_>, DataUriError> {
        DataUri::parse(&self.url)
    }
}

/// Borrowed view over the two halves of a well-formed base64 data URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataUriError {
    MissingScheme,
    MissingComma,
    NotBase64,
    InvalidMimeType,
    EmptyPayload,
    InvalidPayload,
}

impl fmt::Display for DataUriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DataUriError::MissingScheme => "missing 'data:' scheme",
            DataUriError::MissingComma => "missing ',' separating header and payload",
            DataUriError::NotBase64 => "payload is not marked as base64",
            DataUriError::InvalidMimeType => "mime type must look like 'type/subtype'",
            DataUriError::EmptyPayload => "payload is empty",
            DataUriError::InvalidPayload => "payload contains non-base64 characters",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for DataUriError {}

impl<'a> DataUri<'a> {
    pub fn parse(uri: &'a str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix(SCHEME).ok_or(DataUriError::MissingScheme)?;
        let (header, data) = rest.split_once(',').ok_or(DataUriError::MissingComma)?;
        let header = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(DataUriError::NotBase64)?;

        // Parameters such as `;codecs=avc1` may sit between the mime type and the marker.
        let mime_type = header.split(';').next().unwrap_or_default();
        match mime_type.split_once('/') {
            Some((kind, subtype)) if is_token(kind) && is_token(subtype) => {}
            _ => return Err(DataUriError::InvalidMimeType),
        }

        if data.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        if !data.bytes().all(is_base64_byte) {
            return Err(DataUriError::InvalidPayload);
        }

        Ok(Self { mime_type, data })
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b))
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_')
}
