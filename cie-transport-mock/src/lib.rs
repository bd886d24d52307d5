// SPDX-License-Identifier: Apache-2.0

//! Expectation-verified mock of the contactless reader.
//!
//! [`MockTransport`] stands in for the PN532 driver behind [`NfcReader`].
//! Tests register the commands the code under test must send, in order,
//! together with the answers to play back. Each `send_command` consumes the
//! next expectation or fails with a diagnostic naming the offending byte.
//!
//! ```
//! use cie_transport::NfcReader;
//! use cie_transport_mock::MockTransport;
//!
//! let mut reader = MockTransport::new();
//! reader.expect(&[0x00, 0xA4], &[0x90, 0x00]).unwrap();
//!
//! let mut answer = [0u8; 2];
//! reader.send_command(&[0x00, 0xA4, 0x04, 0x00], &mut answer).unwrap();
//! assert_eq!(answer, [0x90, 0x00]);
//! assert!(reader.all_satisfied());
//! ```

mod diagnostics;
mod errors;
mod queue;

use std::ops::Deref;

use cie_transport::{APDUCommand, NfcReader};
pub use diagnostics::{hex_bytes, CaptureSink, ConsoleSink, DiagnosticSink, LogSink};
pub use errors::{ExpectationError, MockError, VerifyError};
use log::debug;
pub use queue::{Expectation, ExpectationQueue};

/// Mock reader answering from an [`ExpectationQueue`]
#[derive(Debug)]
pub struct MockTransport<S: DiagnosticSink = LogSink> {
    queue: ExpectationQueue,
    sink: S,
    /// Every command presented, matched or not
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport<LogSink> {
    pub fn new() -> Self {
        Self::with_sink(LogSink)
    }
}

impl Default for MockTransport<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> MockTransport<S> {
    /// Create a mock reporting mismatches to `sink`
    pub fn with_sink(sink: S) -> Self {
        MockTransport {
            queue: ExpectationQueue::new(),
            sink,
            sent_log: Vec::new(),
        }
    }

    /// Start a new batch of expectations, forgetting the previous run
    pub fn reset(&mut self) {
        self.queue.reset();
        self.sent_log.clear();
    }

    /// Expect a command whose bytes from `offset` on start with `pattern`
    pub fn expect_command(
        &mut self,
        pattern: &[u8],
        offset: usize,
        response: &[u8],
    ) -> Result<(), ExpectationError> {
        self.queue.register(pattern, offset, response)
    }

    /// Expect a command starting with `command`
    pub fn expect(&mut self, command: &[u8], response: &[u8]) -> Result<(), ExpectationError> {
        self.expect_command(command, 0, response)
    }

    /// Expect the serialized form of `command`
    pub fn expect_apdu<I>(
        &mut self,
        command: &APDUCommand<I>,
        response: &[u8],
    ) -> Result<(), ExpectationError>
    where
        I: Deref<Target = [u8]>,
    {
        let raw = command.serialize()?;
        self.expect_command(&raw, 0, response)
    }

    /// Whether every expected command was sent and matched
    pub fn all_satisfied(&self) -> bool {
        self.queue.all_satisfied()
    }

    /// Teardown check with the reason it failed
    pub fn verify(&self) -> Result<(), VerifyError> {
        self.queue.verify()
    }

    pub fn queue(&self) -> &ExpectationQueue {
        &self.queue
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Commands presented to the mock, in order
    pub fn sent_commands(&self) -> &[Vec<u8>] {
        &self.sent_log
    }
}

impl<S: DiagnosticSink> NfcReader for MockTransport<S> {
    type Error = MockError;

    fn begin(&mut self) -> Result<(), MockError> {
        Ok(())
    }

    fn detect_card(&mut self) -> Result<bool, MockError> {
        Ok(true)
    }

    fn send_command(&mut self, command: &[u8], response: &mut [u8]) -> Result<usize, MockError> {
        debug!("[{:3}] >> {}", command.len(), hex::encode(command));
        self.sent_log.push(command.to_vec());

        match self.queue.consume(command) {
            Ok(baked) => {
                let n = baked.len().min(response.len());
                response[..n].copy_from_slice(&baked[..n]);
                debug!("[{:3}] << {}", n, hex::encode(&response[..n]));
                Ok(n)
            }
            Err(err) => {
                let message = self.describe(&err, command);
                self.sink.report(&message);
                Err(err)
            }
        }
    }
}

impl<S: DiagnosticSink> MockTransport<S> {
    /// Diagnostic text for `err`, with the pending pattern and the bytes received in its place
    fn describe(&self, err: &MockError, command: &[u8]) -> String {
        match (err, self.queue.pending()) {
            (MockError::Mismatch { .. } | MockError::CommandTooShort { .. }, Some(pending)) => {
                let start = pending.offset().min(command.len());
                let end = (pending.offset() + pending.pattern().len()).min(command.len());
                format!(
                    "{err}: expected [{}] at offset {} but received [{}]",
                    hex_bytes(pending.pattern()),
                    pending.offset(),
                    hex_bytes(&command[start..end])
                )
            }
            _ => err.to_string(),
        }
    }
}
