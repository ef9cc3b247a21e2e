//! Transport side: turns a [`Request`] into a [`Response`] by streaming the
//! HTTP body into a [`ResponseSink`](crate::sink::ResponseSink).
mod fetch;
mod request;
mod response;
mod session;

pub use request::Request;
pub use response::Response;
pub use session::{Session, SessionId};
