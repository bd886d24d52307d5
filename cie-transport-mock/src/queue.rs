// SPDX-License-Identifier: Apache-2.0

//! Ordered expectations and the counters that track their consumption.

use cie_transport::MAX_FRAME_LEN;
use log::trace;

use crate::errors::{ExpectationError, MockError, VerifyError};

/// One expected command and the answer baked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pattern: Vec<u8>,
    offset: usize,
    response: Vec<u8>,
}

impl Expectation {
    /// Bytes compared against the command
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Position in the command where the comparison starts
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Answer returned when the command matches
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    /// Compare the covered region of `command`, reporting the first differing byte
    fn compare(&self, index: usize, command: &[u8]) -> Result<(), MockError> {
        let needed = self.offset + self.pattern.len();
        let region = command
            .get(self.offset..needed)
            .ok_or(MockError::CommandTooShort {
                index,
                len: command.len(),
                needed,
            })?;

        match region
            .iter()
            .zip(&self.pattern)
            .position(|(received, expected)| received != expected)
        {
            Some(byte) => Err(MockError::Mismatch {
                index,
                byte,
                expected: self.pattern[byte],
                received: region[byte],
            }),
            None => Ok(()),
        }
    }
}

/// Expectations consumed in strict registration order.
///
/// The cursor only moves on a match, so every wrong attempt is reported
/// against the same pending expectation.
#[derive(Debug, Default, Clone)]
pub struct ExpectationQueue {
    expectations: Vec<Expectation>,
    /// Index of the next expectation to consume, equal to the executed count
    cursor: usize,
    attempted: usize,
}

impl ExpectationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expectation and zero all counters
    pub fn reset(&mut self) {
        self.expectations.clear();
        self.cursor = 0;
        self.attempted = 0;
    }

    /// Append an expectation matching `pattern` at `offset` of the next command
    pub fn register(
        &mut self,
        pattern: &[u8],
        offset: usize,
        response: &[u8],
    ) -> Result<(), ExpectationError> {
        if pattern.len() > MAX_FRAME_LEN {
            return Err(ExpectationError::PatternTooLong {
                len: pattern.len(),
                max: MAX_FRAME_LEN,
            });
        }
        if response.len() > MAX_FRAME_LEN {
            return Err(ExpectationError::ResponseTooLong {
                len: response.len(),
                max: MAX_FRAME_LEN,
            });
        }
        offset
            .checked_add(pattern.len())
            .filter(|&end| end <= MAX_FRAME_LEN)
            .ok_or(ExpectationError::PatternOutOfFrame {
                offset,
                len: pattern.len(),
                max: MAX_FRAME_LEN,
            })?;

        trace!(
            "expectation {}: +{} {} -> {}",
            self.expectations.len(),
            offset,
            hex::encode(pattern),
            hex::encode(response)
        );
        self.expectations.push(Expectation {
            pattern: pattern.to_vec(),
            offset,
            response: response.to_vec(),
        });

        Ok(())
    }

    /// Count an attempt and match `command` against the pending expectation.
    ///
    /// On a match the cursor advances and the baked answer is returned.
    pub fn consume(&mut self, command: &[u8]) -> Result<&[u8], MockError> {
        self.attempted += 1;
        if self.attempted > self.expectations.len() {
            return Err(MockError::OverCall {
                attempted: self.attempted,
                expected: self.expectations.len(),
            });
        }

        let index = self.cursor;
        self.expectations[index].compare(index, command)?;
        self.cursor += 1;

        Ok(&self.expectations[index].response)
    }

    /// Whether every expectation was consumed and no attempt failed
    pub fn all_satisfied(&self) -> bool {
        self.expected_count() == self.executed_count()
            && self.expected_count() == self.attempted_count()
    }

    /// Like [`all_satisfied`](Self::all_satisfied), with the reason it failed
    pub fn verify(&self) -> Result<(), VerifyError> {
        if self.attempted != self.cursor {
            return Err(VerifyError::FailedAttempts {
                attempted: self.attempted,
                executed: self.cursor,
            });
        }
        if self.cursor < self.expectations.len() {
            return Err(VerifyError::UnderCall {
                executed: self.cursor,
                expected: self.expectations.len(),
            });
        }
        Ok(())
    }

    pub fn expected_count(&self) -> usize {
        self.expectations.len()
    }

    pub fn executed_count(&self) -> usize {
        self.cursor
    }

    pub fn attempted_count(&self) -> usize {
        self.attempted
    }

    /// Expectations not yet consumed
    pub fn remaining(&self) -> usize {
        self.expectations.len() - self.cursor
    }

    /// The expectation the next command is matched against
    pub fn pending(&self) -> Option<&Expectation> {
        self.expectations.get(self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }
}
