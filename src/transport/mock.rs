//! # Mock Transport
//!
//! In-memory transport for tests: records every byte written and replays
//! a scripted sequence of poll results for reads. Command-stream tests
//! assert against [`MockTransport::written`]; status-path tests script
//! reads with [`queue_silence`](MockTransport::queue_silence) and
//! [`queue_read`](MockTransport::queue_read).

use std::collections::VecDeque;

use async_trait::async_trait;

use super::Transport;
use crate::error::BrasaError;

/// Recording/scripted transport. Reads past the end of the script report
/// "no data", like a silent printer.
#[derive(Debug, Default)]
pub struct MockTransport {
    written: Vec<u8>,
    reads: VecDeque<Option<u8>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, in order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Drain the write record, for asserting on one operation at a time.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Script a byte to be returned by a future poll.
    pub fn queue_read(&mut self, byte: u8) {
        self.reads.push_back(Some(byte));
    }

    /// Script `polls` empty polls before whatever is queued next.
    pub fn queue_silence(&mut self, polls: usize) {
        for _ in 0..polls {
            self.reads.push_back(None);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), BrasaError> {
        self.written.extend_from_slice(data);
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<Option<u8>, BrasaError> {
        Ok(self.reads.pop_front().flatten())
    }
}
