//! Minimal HTTP client built around a streaming response accumulator.
//!
//! The transport ([`net`]) pushes body chunks, in arrival order, into a
//! per-request [`ResponseSink`]. The sink appends them to a
//! [`GrowableByteBuffer`], which keeps the content NUL-terminated after every
//! append. When the transfer ends, the caller gets the buffer back inside a
//! [`Response`].
//!
//! ```no_run
//! # async fn run() -> Result<(), karl_curl::FetchError> {
//! use karl_curl::{FetchConfig, Request, Session};
//! use tokio_util::sync::CancellationToken;
//!
//! let session = Session::new(FetchConfig::default())?;
//! let res = session
//!     .fetch(Request::get("https://example.com/"), CancellationToken::new())
//!     .await?;
//! println!("{} {}", res.status, res.text());
//! # Ok(()) }
//! ```

pub mod buffer;
pub mod sink;
pub mod net;
pub mod config;
pub mod errors;

pub use buffer::GrowableByteBuffer;
pub use config::{FetchConfig, FetchConfigError};
pub use errors::{FetchError, SinkError};
pub use net::{Request, Response, Session};
pub use sink::{Completed, ResponseSink, SinkState};
