// SPDX-License-Identifier: Apache-2.0

//! Reader abstraction shared by the PN532 driver and its test doubles.

use std::ops::Deref;

pub use cie_apdu::{ins, APDUAnswer, APDUAnswerError, APDUCommand, APDUCommandError, APDUErrorCode};
use log::debug;
use thiserror::Error;

/// Largest frame the reader moves in one exchange (single byte length prefix)
pub const MAX_FRAME_LEN: usize = 255;

/// Use to talk to a card through a contactless reader
pub trait NfcReader {
    /// Error defined by the reader used
    type Error;

    /// Bring the reader up
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Whether a card is in the field
    fn detect_card(&mut self) -> Result<bool, Self::Error>;

    /// Send a raw command and fill `response` with the card's answer.
    ///
    /// The length of `response` is the answer length the caller asks for.
    /// Returns the number of bytes written.
    fn send_command(&mut self, command: &[u8], response: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Failure of an APDU level exchange
#[derive(Debug, Error)]
pub enum ExchangeError<E> {
    /// The reader refused or failed the command
    #[error("reader error: {0}")]
    Reader(#[source] E),
    /// The command could not be serialized
    #[error("invalid command: {0}")]
    Command(APDUCommandError),
    /// The reader answered with something that is not an APDU answer
    #[error("invalid answer: {0}")]
    Answer(APDUAnswerError),
    /// Asked for more answer bytes than a frame carries
    #[error("requested answer of {requested} bytes exceeds the frame limit of {max}")]
    ResponseTooLong { requested: usize, max: usize },
}

/// APDU level helpers available on every [`NfcReader`]
pub trait ApduExchange: NfcReader {
    /// Send `command` and parse up to `response_len` answer bytes as an APDU answer
    fn exchange<I>(
        &mut self,
        command: &APDUCommand<I>,
        response_len: usize,
    ) -> Result<APDUAnswer<Vec<u8>>, ExchangeError<Self::Error>>
    where
        I: Deref<Target = [u8]>;
}

impl<R: NfcReader + ?Sized> ApduExchange for R {
    fn exchange<I>(
        &mut self,
        command: &APDUCommand<I>,
        response_len: usize,
    ) -> Result<APDUAnswer<Vec<u8>>, ExchangeError<Self::Error>>
    where
        I: Deref<Target = [u8]>,
    {
        if response_len > MAX_FRAME_LEN {
            return Err(ExchangeError::ResponseTooLong {
                requested: response_len,
                max: MAX_FRAME_LEN,
            });
        }

        let raw = command.serialize().map_err(ExchangeError::Command)?;
        debug!("[{:3}] >> {}", raw.len(), hex::encode(&raw));

        let mut answer = vec![0u8; response_len];
        let n = self
            .send_command(&raw, &mut answer)
            .map_err(ExchangeError::Reader)?;
        answer.truncate(n);
        debug!("[{:3}] << {}", answer.len(), hex::encode(&answer));

        APDUAnswer::from_answer(answer).map_err(ExchangeError::Answer)
    }
}
