use crate::config::FetchConfigError;
use crate::sink::SinkState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("cannot allocate {requested} bytes (capacity stays at {capacity})")]
    Allocation { requested: usize, capacity: usize },

    #[error("{operation} is not allowed in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SinkState,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] FetchConfigError),

    #[error("Network error: {0}")]
    Net(#[from] reqwest::Error),

    #[error("Transfer aborted by consumer: {0}")]
    Aborted(SinkError),

    #[error("Response sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("More than {0} redirects")]
    TooManyRedirects(usize),

    #[error("Request canceled")]
    Canceled,
}
