//! Response accumulator
//!
//! Modem replies are unstructured text. The session appends everything the
//! modem says into this buffer and looks for literal tokens in it.

use heapless::Vec;

/// Capacity of the session's response buffer in bytes
pub const RESPONSE_CAPACITY: usize = 512;

/// Bounded append-only byte buffer with reset-on-overflow
///
/// When a byte does not fit, the whole buffer is discarded and the byte
/// starts a fresh buffer. A half-matched token is lost, never corrupted.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuffer<const N: usize> {
    data: Vec<u8, N>,
}

impl<const N: usize> ResponseBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append one byte, resetting the buffer first if it is full
    pub fn push(&mut self, byte: u8) {
        if self.data.push(byte).is_err() {
            self.data.clear();
            // Cannot fail on an empty buffer unless N == 0
            let _ = self.data.push(byte);
        }
    }

    /// Append a run of bytes
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Discard all accumulated text
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Check whether `token` occurs anywhere in the buffer
    pub fn contains(&self, token: &str) -> bool {
        let needle = token.as_bytes();
        if needle.is_empty() {
            return true;
        }
        self.data.windows(needle.len()).any(|w| w == needle)
    }

    /// Check whether any of `tokens` occurs in the buffer
    pub fn contains_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.contains(t))
    }

    /// Accumulated bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of accumulated bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been accumulated since the last reset
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
