// SPDX-License-Identifier: Apache-2.0

use cie_transport::APDUCommandError;
use thiserror::Error;

/// Failure of a single `send_command` against the expectation queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// More commands were sent than expectations registered
    #[error("reader tried to execute more commands than expected (attempt {attempted}, {expected} expected)")]
    OverCall { attempted: usize, expected: usize },
    /// The command differs from the pending expectation
    #[error("command at index {index} was not expected (byte {byte} was different: expected 0x{expected:02X} but received 0x{received:02X})")]
    Mismatch {
        index: usize,
        byte: usize,
        expected: u8,
        received: u8,
    },
    /// The command ends before the region the pending expectation covers
    #[error("command at index {index} was not expected (received {len} bytes but the pattern needs {needed})")]
    CommandTooShort {
        index: usize,
        len: usize,
        needed: usize,
    },
}

/// Rejected registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpectationError {
    #[error("pattern of {len} bytes exceeds the frame limit of {max}")]
    PatternTooLong { len: usize, max: usize },
    #[error("response of {len} bytes exceeds the frame limit of {max}")]
    ResponseTooLong { len: usize, max: usize },
    #[error("pattern at offset {offset} with {len} bytes does not fit a {max} byte frame")]
    PatternOutOfFrame {
        offset: usize,
        len: usize,
        max: usize,
    },
    #[error("expected command cannot be serialized: {0}")]
    Command(#[from] APDUCommandError),
}

/// Teardown check failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Fewer commands were executed than expected
    #[error("only {executed} of {expected} expected commands were executed")]
    UnderCall { executed: usize, expected: usize },
    /// Some attempts failed to match or overran the queue
    #[error("{attempted} commands attempted but only {executed} matched")]
    FailedAttempts { attempted: usize, executed: usize },
}
