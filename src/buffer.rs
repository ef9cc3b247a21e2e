//! Append-only, NUL-terminated byte buffer.
//!
//! [`GrowableByteBuffer`] collects response chunks into one contiguous
//! allocation. Between any two calls the content is followed by a single
//! `0` byte, so the bytes can be handed to code that expects C-style text
//! as well as to code that needs the exact byte count.
//!
//! Growth doubles the capacity, or jumps straight to the required size when
//! doubling is not enough, so a single oversized chunk costs one
//! reallocation. Views returned by the read accessors borrow the buffer and
//! must be fetched again after each [`append`](GrowableByteBuffer::append).

use crate::errors::SinkError;
use std::borrow::Cow;
use std::ffi::CStr;

/// Initial allocation used when nothing else is configured (1 KiB).
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct GrowableByteBuffer {
    /// Content followed by the terminator. `data.len() == length + 1` at all times.
    data: Vec<u8>,
    /// Logical capacity, including the terminator slot.
    capacity: usize,
    /// Optional ceiling on `capacity`.
    max_capacity: Option<usize>,
    /// Number of times the storage was grown.
    reallocations: usize,
}

impl GrowableByteBuffer {
    /// Creates an empty buffer holding only the terminator.
    ///
    /// A capacity of `0` is raised to `1` so the terminator always fits.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, SinkError> {
        Self::allocate(initial_capacity.max(1), None)
    }

    /// Same as [`with_capacity`](Self::with_capacity), but growth past
    /// `max_capacity` bytes fails with [`SinkError::Allocation`].
    pub fn with_limit(initial_capacity: usize, max_capacity: usize) -> Result<Self, SinkError> {
        let initial = initial_capacity.max(1);
        if initial > max_capacity {
            return Err(SinkError::Allocation {
                requested: initial,
                capacity: 0,
            });
        }
        Self::allocate(initial, Some(max_capacity))
    }

    fn allocate(capacity: usize, max_capacity: Option<usize>) -> Result<Self, SinkError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| SinkError::Allocation {
                requested: capacity,
                capacity: 0,
            })?;
        data.push(0);

        Ok(Self {
            data,
            capacity,
            max_capacity,
            reallocations: 0,
        })
    }

    /// Appends `chunk` after the current content and moves the terminator.
    ///
    /// On error nothing changes: content, length and capacity stay as they were.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        if chunk.is_empty() {
            return Ok(());
        }

        let length = self.len();
        let required = length
            .checked_add(chunk.len())
            .and_then(|n| n.checked_add(1))
            .ok_or(SinkError::Allocation {
                requested: usize::MAX,
                capacity: self.capacity,
            })?;

        if required > self.capacity {
            self.grow(required)?;
        }

        // Overwrite the old terminator with the first content byte.
        self.data.truncate(length);
        self.data.extend_from_slice(chunk);
        self.data.push(0);

        debug_assert_eq!(self.data.len(), required);
        Ok(())
    }

    fn grow(&mut self, required: usize) -> Result<(), SinkError> {
        let mut new_capacity = self.capacity.saturating_mul(2).max(required);
        if let Some(max) = self.max_capacity {
            new_capacity = new_capacity.min(max);
        }
        if new_capacity < required {
            return Err(SinkError::Allocation {
                requested: required,
                capacity: self.capacity,
            });
        }

        self.data
            .try_reserve_exact(new_capacity - self.data.len())
            .map_err(|_| SinkError::Allocation {
                requested: new_capacity,
                capacity: self.capacity,
            })?;

        log::debug!(
            "growing response buffer from {} to {} bytes",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
        self.reallocations += 1;
        Ok(())
    }

    /// Content bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Content bytes followed by the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Content viewed as a C string. Stops at the first interior NUL, if the
    /// body contains one.
    pub fn as_c_str(&self) -> &CStr {
        // The last byte is always 0, so this cannot fail.
        CStr::from_bytes_until_nul(&self.data).unwrap_or_default()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Number of content bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Consumes the buffer and returns the content without the terminator.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.pop();
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_terminated(buf: &GrowableByteBuffer) {
        let raw = buf.as_bytes_with_nul();
        assert_eq!(raw.len(), buf.len() + 1);
        assert_eq!(raw[buf.len()], 0);
        assert!(buf.len() < buf.capacity());
    }

    #[test]
    fn new_buffer_is_empty_and_terminated() {
        let buf = GrowableByteBuffer::with_capacity(16).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.as_bytes_with_nul(), b"\0");
        assert_eq!(buf.as_c_str().to_bytes(), b"");
        assert_terminated(&buf);
    }

    #[test]
    fn zero_capacity_still_fits_terminator() {
        let buf = GrowableByteBuffer::with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 1);
        assert_terminated(&buf);
    }

    #[test]
    fn grows_from_eight_to_fit_terminator() {
        let mut buf = GrowableByteBuffer::with_capacity(8).unwrap();

        buf.append(b"ab").unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_bytes_with_nul(), b"ab\0");
        assert_eq!(buf.reallocations(), 0);

        // 2 + 6 + 1 = 9 > 8
        buf.append(b"cdefgh").unwrap();
        assert_eq!(buf.len(), 8);
        assert!(buf.capacity() >= 9);
        assert_eq!(buf.as_bytes_with_nul(), b"abcdefgh\0");
        assert_eq!(buf.reallocations(), 1);
    }

    #[test]
    fn empty_chunks_do_nothing() {
        let mut buf = GrowableByteBuffer::with_capacity(1).unwrap();
        for _ in 0..10 {
            buf.append(b"").unwrap();
        }
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.reallocations(), 0);
        assert_terminated(&buf);
    }

    #[test]
    fn large_chunk_needs_one_reallocation() {
        let mut buf = GrowableByteBuffer::with_capacity(4).unwrap();
        buf.append(b"xyz").unwrap();

        // Would take several doublings; must be done in one step
        let big = vec![b'q'; 1000];
        buf.append(&big).unwrap();

        assert_eq!(buf.reallocations(), 1);
        assert!(buf.capacity() >= 1004);
        assert_eq!(&buf.as_bytes()[..3], b"xyz");
        assert_eq!(&buf.as_bytes()[3..], &big[..]);
        assert_terminated(&buf);
    }

    #[test]
    fn capacity_doubles_when_doubling_is_enough() {
        let mut buf = GrowableByteBuffer::with_capacity(8).unwrap();
        buf.append(b"1234567").unwrap();
        buf.append(b"8").unwrap();
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn many_small_chunks_match_one_big_chunk() {
        let expected: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8 + 1).collect();

        let mut small = GrowableByteBuffer::with_capacity(8).unwrap();
        for b in &expected {
            small.append(std::slice::from_ref(b)).unwrap();
            assert_terminated(&small);
        }

        let mut big = GrowableByteBuffer::with_capacity(8).unwrap();
        big.append(&expected).unwrap();

        assert_eq!(small.as_bytes(), &expected[..]);
        assert_eq!(small.as_bytes(), big.as_bytes());
    }

    #[test]
    fn concatenates_mixed_chunks_in_order() {
        let chunks: [&[u8]; 6] = [b"GET", b"", b" /index", b".html", b"", b" HTTP/1.1\r\n"];
        let mut buf = GrowableByteBuffer::with_capacity(2).unwrap();
        let mut expected = Vec::new();

        for c in chunks {
            buf.append(c).unwrap();
            expected.extend_from_slice(c);
            assert_eq!(buf.as_bytes(), &expected[..]);
            assert_terminated(&buf);
        }
        assert_eq!(buf.to_string_lossy(), "GET /index.html HTTP/1.1\r\n");
    }

    #[test]
    fn reads_do_not_mutate() {
        let mut buf = GrowableByteBuffer::with_capacity(4).unwrap();
        buf.append(b"hello").unwrap();

        let first = buf.as_bytes().to_vec();
        let second = buf.as_bytes().to_vec();
        assert_eq!(first, second);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.as_c_str().to_str().unwrap(), "hello");
    }

    #[test]
    fn interior_nul_is_kept_in_bytes() {
        let mut buf = GrowableByteBuffer::with_capacity(4).unwrap();
        buf.append(b"a\0b").unwrap();
        assert_eq!(buf.as_bytes(), b"a\0b");
        assert_eq!(buf.as_c_str().to_bytes(), b"a");
    }

    #[test]
    fn limit_failure_leaves_buffer_intact() {
        let mut buf = GrowableByteBuffer::with_limit(4, 10).unwrap();
        buf.append(b"abc").unwrap();
        buf.append(b"def").unwrap();
        assert_eq!(buf.capacity(), 8);

        let err = buf.append(b"ghijk").unwrap_err();
        assert_eq!(
            err,
            SinkError::Allocation {
                requested: 12,
                capacity: 8
            }
        );
        assert_eq!(buf.as_bytes(), b"abcdef");
        assert_eq!(buf.capacity(), 8);
        assert_terminated(&buf);

        // Still fits under the ceiling
        buf.append(b"ghi").unwrap();
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.as_bytes_with_nul(), b"abcdefghi\0");
    }

    #[test]
    fn limit_below_initial_is_rejected() {
        assert!(GrowableByteBuffer::with_limit(16, 8).is_err());
    }

    #[test]
    fn into_vec_drops_terminator() {
        let mut buf = GrowableByteBuffer::with_capacity(4).unwrap();
        buf.append(b"body").unwrap();
        assert_eq!(buf.into_vec(), b"body".to_vec());
    }
}
