// SPDX-License-Identifier: Apache-2.0

//! APDU command and answer types exchanged with a CIE (Carta d'Identità
//! Elettronica) through a contactless reader.
//!
//! The crate is `no_std` capable. Serializing commands needs an allocator and
//! is only available with the default `std` feature.

#![no_std]
#![warn(missing_docs)]

extern crate no_std_compat as std;

use core::ops::Deref;

use arrayref::array_ref;
use snafu::prelude::*;

mod status;

pub use status::APDUErrorCode;

/// Largest `Lc` a short APDU can carry.
pub const MAX_SHORT_DATA_LEN: usize = 255;

/// Instruction bytes used when talking to a CIE
pub mod ins {
    /// SELECT FILE
    pub const SELECT_FILE: u8 = 0xA4;
    /// READ BINARY
    pub const READ_BINARY: u8 = 0xB0;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An APDU command
pub struct APDUCommand<B> {
    /// APDU Class
    pub cla: u8,
    /// APDU Instruction
    pub ins: u8,
    /// First parameter
    pub p1: u8,
    /// Second parameter
    pub p2: u8,
    /// Command data
    pub data: B,
    /// Expected answer length, omitted from the frame when `None`
    pub le: Option<u8>,
}

#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
/// Error interpreting bytes as an APDU command
pub enum APDUCommandError {
    #[snafu(display("command data too long ({len} bytes, max 255)"))]
    /// Data does not fit a short APDU
    DataTooLong {
        /// Length of the rejected data
        len: usize,
    },
}

#[cfg(feature = "std")]
impl<B> APDUCommand<B>
where
    B: Deref<Target = [u8]>,
{
    /// Serialize this [`APDUCommand`] to the ISO 7816-4 short form
    pub fn serialize(&self) -> Result<std::vec::Vec<u8>, APDUCommandError> {
        let len = self.data.len();
        ensure!(len <= MAX_SHORT_DATA_LEN, DataTooLongSnafu { len });

        let mut v = std::vec![self.cla, self.ins, self.p1, self.p2];
        if len > 0 {
            v.push(len as u8);
            v.extend(self.data.iter());
        }
        if let Some(le) = self.le {
            v.push(le);
        }

        Ok(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An APDU answer, the body followed by a two byte status word
pub struct APDUAnswer<B> {
    data: B,
    retcode: u16,
}

#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
/// Error interpreting bytes as an APDU answer
pub enum APDUAnswerError {
    #[snafu(display("answer too short (< 2 bytes)"))]
    /// Passed APDU answer was less than the minimum 2 bytes required for the status word
    TooShort,
}

impl<B> APDUAnswer<B>
where
    B: Deref<Target = [u8]>,
{
    /// Attempt to interpret the given slice as an APDU answer
    pub fn from_answer(answer: B) -> Result<Self, APDUAnswerError> {
        ensure!(answer.len() >= 2, TooShortSnafu);
        let retcode = u16::from_be_bytes(*array_ref!(answer, answer.len() - 2, 2));

        Ok(APDUAnswer {
            data: answer,
            retcode,
        })
    }

    /// Will return the answer's payload
    #[inline(always)]
    pub fn apdu_data(&self) -> &[u8] {
        &self.data[..self.data.len() - 2]
    }

    /// Will return the answer's payload
    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        self.apdu_data()
    }

    /// Will attempt to interpret the status word as an [`APDUErrorCode`]
    ///
    /// Unknown status words are returned verbatim in the `Err` variant
    pub fn error_code(&self) -> Result<APDUErrorCode, u16> {
        self.retcode.try_into().map_err(|_| self.retcode)
    }

    /// Returns the raw status word
    #[inline(always)]
    pub fn retcode(&self) -> u16 {
        self.retcode
    }

    /// Whether the card answered `0x9000`
    pub fn is_success(&self) -> bool {
        matches!(self.error_code(), Ok(APDUErrorCode::NoError))
    }
}

impl<B> TryFrom<&APDUAnswer<B>> for APDUErrorCode
where
    B: Deref<Target = [u8]>,
{
    type Error = u16;

    fn try_from(answer: &APDUAnswer<B>) -> Result<Self, Self::Error> {
        answer.error_code()
    }
}
