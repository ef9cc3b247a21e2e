use crate::config::{validate, FetchConfig};
use crate::errors::FetchError;
use crate::net::fetch::fetch;
use crate::net::{Request, Response};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns the HTTP client used for a request (or a short series of them).
///
/// There is no shared global handle: every session builds its own client
/// from its [`FetchConfig`], and everything is released when the session is
/// dropped. Independent sessions can run concurrently.
pub struct Session {
    id: SessionId,
    config: FetchConfig,
    client: reqwest::Client,
}

impl Session {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        validate(&config)?;

        // Redirects are followed by `fetch` itself so POST keeps its method
        // and body on every hop.
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .https_only(config.https_only);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let id = SessionId::new();
        log::debug!("Session[{}]: created with user agent {:?}", id, config.user_agent);

        Ok(Self {
            id,
            config,
            client: builder.build()?,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Runs `request` to completion and returns the buffered response.
    ///
    /// The body is streamed chunk by chunk into a fresh
    /// [`ResponseSink`](crate::sink::ResponseSink). Cancelling `cancel` stops
    /// the transfer at the next chunk boundary.
    pub async fn fetch(&self, request: Request, cancel: CancellationToken) -> Result<Response, FetchError> {
        let result = fetch(&self.client, &self.config, request, cancel).await;
        if let Err(e) = &result {
            log::error!("Session[{}]: request failed: {}", self.id, e);
        }
        result
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        log::trace!("Session[{}]: released", self.id);
    }
}
