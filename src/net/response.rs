//! Buffered HTTP response.
//!
//! The body is the [`GrowableByteBuffer`] the response sink accumulated, so
//! it can be read as exact bytes or as NUL-terminated text.
//!
//! ## Notes
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names.
//! - `status_text` is derived from the status code's canonical reason phrase
//!   and is `"Unknown"` for non-standard codes.
use crate::buffer::GrowableByteBuffer;
use http::HeaderMap;
use std::borrow::Cow;

#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: url::Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Raw response body.
    pub body: GrowableByteBuffer,

    /// ASCII rendition of the body, filled in when the request asked for it
    /// and the body was valid UTF-8.
    pub ascii: Option<String>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        self.body.to_string_lossy()
    }

    /// Body as ASCII. Characters outside ASCII become `?`. Returns `None`
    /// if the body is not valid UTF-8.
    pub fn body_ascii(&self) -> Option<String> {
        to_ascii(self.body.as_bytes())
    }
}

pub(crate) fn to_ascii(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?;
    Some(
        text.chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect(),
    )
}
