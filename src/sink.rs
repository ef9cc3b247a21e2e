//! Per-request chunk destination.
//!
//! A [`ResponseSink`] is handed to the transport for exactly one request. The
//! transport pushes every received chunk into [`ResponseSink::on_chunk`] in
//! arrival order, and once the transfer is over the caller collects the
//! buffer with [`ResponseSink::finish`].
//!
//! ```
//! use karl_curl::sink::ResponseSink;
//!
//! let mut sink = ResponseSink::new(8).unwrap();
//! assert_eq!(sink.on_chunk(b"ab").unwrap(), 2);
//! assert_eq!(sink.on_chunk(b"cdefgh").unwrap(), 6);
//!
//! let done = sink.finish(200).unwrap();
//! assert_eq!(done.status, 200);
//! assert_eq!(done.body.as_bytes_with_nul(), b"abcdefgh\0");
//! ```

use crate::buffer::GrowableByteBuffer;
use crate::errors::SinkError;

/// Lifecycle of a sink. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Created, no chunk seen yet
    Empty,
    /// At least one chunk was delivered
    Accumulating,
    /// Buffer has been handed out
    Finished,
}

/// Result of a finished transfer. Owns the accumulated body.
#[derive(Debug)]
pub struct Completed {
    pub status: u16,
    pub body: GrowableByteBuffer,
    /// Set when a chunk was refused. The body then only holds the prefix
    /// received before the failure.
    pub failure: Option<SinkError>,
}

impl Completed {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug)]
pub struct ResponseSink {
    state: SinkState,
    buffer: Option<GrowableByteBuffer>,
    failure: Option<SinkError>,
}

impl ResponseSink {
    /// Creates a sink with an unbounded buffer of `initial_capacity` bytes.
    pub fn new(initial_capacity: usize) -> Result<Self, SinkError> {
        Ok(Self::from_buffer(GrowableByteBuffer::with_capacity(initial_capacity)?))
    }

    /// Creates a sink whose buffer refuses to grow past `max_capacity` bytes.
    pub fn with_limit(initial_capacity: usize, max_capacity: usize) -> Result<Self, SinkError> {
        Ok(Self::from_buffer(GrowableByteBuffer::with_limit(
            initial_capacity,
            max_capacity,
        )?))
    }

    fn from_buffer(buffer: GrowableByteBuffer) -> Self {
        Self {
            state: SinkState::Empty,
            buffer: Some(buffer),
            failure: None,
        }
    }

    pub fn state(&self) -> SinkState {
        self.state
    }

    /// The error that made the sink refuse a chunk, if any.
    pub fn failure(&self) -> Option<&SinkError> {
        self.failure.as_ref()
    }

    /// Current content. `None` once the sink is finished.
    pub fn buffer(&self) -> Option<&GrowableByteBuffer> {
        self.buffer.as_ref()
    }

    /// Receives one chunk from the transport and returns how many bytes were
    /// accepted. A count lower than `chunk.len()` means the buffer could not
    /// grow and the transfer must be aborted. Once a chunk was refused every
    /// later chunk is refused too, so the body never has a gap.
    pub fn on_chunk(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        if self.state == SinkState::Finished {
            return Err(self.invalid_state("on_chunk"));
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return Err(self.invalid_state("on_chunk"));
        };
        self.state = SinkState::Accumulating;

        if self.failure.is_some() {
            log::warn!("refusing chunk of {} bytes after an earlier failure", chunk.len());
            return Ok(0);
        }

        log::trace!("received chunk of {} bytes", chunk.len());
        match buffer.append(chunk) {
            Ok(()) => Ok(chunk.len()),
            Err(e) => {
                log::warn!("refusing chunk of {} bytes: {}", chunk.len(), e);
                self.failure = Some(e);
                Ok(0)
            }
        }
    }

    /// Ends the transfer and hands the buffer over together with `status`.
    pub fn finish(&mut self, status: u16) -> Result<Completed, SinkError> {
        if self.state == SinkState::Finished {
            return Err(self.invalid_state("finish"));
        }
        let Some(body) = self.buffer.take() else {
            return Err(self.invalid_state("finish"));
        };
        self.state = SinkState::Finished;

        Ok(Completed {
            status,
            body,
            failure: self.failure.take(),
        })
    }

    fn invalid_state(&self, operation: &'static str) -> SinkError {
        log::error!("ResponseSink: {} called in state {:?}", operation, self.state);
        SinkError::InvalidState {
            operation,
            state: self.state,
        }
    }
}
