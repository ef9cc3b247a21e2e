//! Fetch configuration.
//!
//! `FetchConfig` controls how a [`Session`](crate::net::Session) talks to the
//! server (user agent, redirects, timeout) and how the response body is
//! accumulated (initial buffer size, optional body size ceiling).
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use karl_curl::config::FetchConfig;
//! let cfg = FetchConfig::default();
//! assert_eq!(cfg.initial_capacity, 1024);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use karl_curl::config::FetchConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = FetchConfig::builder()
//!     .user_agent("karl-curl/2.0")
//!     .initial_capacity(4096)
//!     .max_body_size(1 << 20)
//!     .max_redirects(5)
//!     .build()?; // returns Result<FetchConfig, FetchConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `user_agent`: Sent with every request (default: `karl-curl/1.0`).
//! - `initial_capacity`: First allocation of the body buffer in bytes (default: 1024).
//! - `max_body_size`: Ceiling for the body buffer, terminator included (default: none).
//! - `follow_redirects`: Follow `301`/`302`/`303`/`307`/`308` responses, re-sending
//!   the same method and body, POST included (default: `true`).
//! - `max_redirects`: Redirect hop limit (default: 10).
//! - `timeout`: Total request timeout (default: none).
//! - `https_only`: Refuse plain `http://` URLs.

use crate::buffer::DEFAULT_INITIAL_CAPACITY;
use std::fmt;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "karl-curl/1.0";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub initial_capacity: usize,
    pub max_body_size: Option<usize>,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub timeout: Option<Duration>,
    pub https_only: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_body_size: None,
            follow_redirects: true,
            max_redirects: 10,
            timeout: None,
            https_only: false,
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    inner: FetchConfig,
}

impl FetchConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut FetchConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn initial_capacity(self, bytes: usize) -> Self { self.map(|c| c.initial_capacity = bytes) }
    pub fn max_body_size(self, bytes: usize) -> Self { self.map(|c| c.max_body_size = Some(bytes)) }
    pub fn follow_redirects(self, on: bool) -> Self { self.map(|c| c.follow_redirects = on) }
    pub fn max_redirects(self, n: usize) -> Self { self.map(|c| c.max_redirects = n) }
    pub fn timeout(self, t: Duration) -> Self { self.map(|c| c.timeout = Some(t)) }
    pub fn https_only(self, on: bool) -> Self { self.map(|c| c.https_only = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut FetchConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<FetchConfig, FetchConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchConfigError {
    ZeroInitialCapacity,
    LimitBelowInitial { limit: usize, initial: usize },
    ZeroRedirects,
    EmptyUserAgent,
}

impl fmt::Display for FetchConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchConfigError::ZeroInitialCapacity =>
                write!(f, "initial_capacity must be at least 1"),
            FetchConfigError::LimitBelowInitial { limit, initial } =>
                write!(f, "max_body_size ({limit}) < initial_capacity ({initial})"),
            FetchConfigError::ZeroRedirects =>
                write!(f, "max_redirects must be at least 1 when following redirects"),
            FetchConfigError::EmptyUserAgent =>
                write!(f, "user_agent must not be empty"),
        }
    }
}
impl std::error::Error for FetchConfigError {}

pub(crate) fn validate(c: &FetchConfig) -> Result<(), FetchConfigError> {
    if c.initial_capacity == 0 {
        return Err(FetchConfigError::ZeroInitialCapacity);
    }
    if let Some(limit) = c.max_body_size {
        if limit < c.initial_capacity {
            return Err(FetchConfigError::LimitBelowInitial {
                limit,
                initial: c.initial_capacity,
            });
        }
    }
    if c.follow_redirects && c.max_redirects == 0 {
        return Err(FetchConfigError::ZeroRedirects);
    }
    if c.user_agent.trim().is_empty() {
        return Err(FetchConfigError::EmptyUserAgent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = FetchConfig::builder().build().unwrap();
        assert_eq!(cfg.user_agent, "karl-curl/1.0");
        assert_eq!(cfg.initial_capacity, 1024);
        assert_eq!(cfg.max_body_size, None);
        assert!(cfg.follow_redirects);
        assert!(!cfg.https_only);
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = FetchConfig::builder()
            .user_agent("test/0.1")
            .initial_capacity(64)
            .max_body_size(128)
            .follow_redirects(false)
            .max_redirects(0)
            .timeout(Duration::from_secs(3))
            .https_only(true)
            .build()
            .unwrap();

        assert_eq!(cfg.user_agent, "test/0.1");
        assert_eq!(cfg.initial_capacity, 64);
        assert_eq!(cfg.max_body_size, Some(128));
        assert!(!cfg.follow_redirects);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(3)));
        assert!(cfg.https_only);
    }

    #[test]
    fn with_applies_closure() {
        let cfg = FetchConfig::builder()
            .with(|c| {
                c.initial_capacity = 8;
                c.max_body_size = Some(8);
            })
            .build()
            .unwrap();
        assert_eq!(cfg.initial_capacity, 8);
        assert_eq!(cfg.max_body_size, Some(8));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            FetchConfig::builder().initial_capacity(0).build().unwrap_err(),
            FetchConfigError::ZeroInitialCapacity
        );
        assert_eq!(
            FetchConfig::builder().initial_capacity(100).max_body_size(10).build().unwrap_err(),
            FetchConfigError::LimitBelowInitial { limit: 10, initial: 100 }
        );
        assert_eq!(
            FetchConfig::builder().max_redirects(0).build().unwrap_err(),
            FetchConfigError::ZeroRedirects
        );
        assert_eq!(
            FetchConfig::builder().user_agent("  ").build().unwrap_err(),
            FetchConfigError::EmptyUserAgent
        );
    }

    #[test]
    fn error_messages_are_readable() {
        let e = FetchConfigError::LimitBelowInitial { limit: 1, initial: 2 };
        assert_eq!(e.to_string(), "max_body_size (1) < initial_capacity (2)");
    }
}
