// SPDX-License-Identifier: Apache-2.0

//! ISO 7816-4 status words

/// Status words a CIE answers with
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum APDUErrorCode {
    /// 0x9000
    NoError = 0x9000,
    /// 0x6282
    EndOfFileReached = 0x6282,
    /// 0x6700
    WrongLength = 0x6700,
    /// 0x6982
    SecurityStatusNotSatisfied = 0x6982,
    /// 0x6983
    AuthenticationBlocked = 0x6983,
    /// 0x6985
    ConditionsNotSatisfied = 0x6985,
    /// 0x6986
    CommandNotAllowed = 0x6986,
    /// 0x6A80
    WrongData = 0x6A80,
    /// 0x6A81
    FunctionNotSupported = 0x6A81,
    /// 0x6A82
    FileNotFound = 0x6A82,
    /// 0x6A83
    RecordNotFound = 0x6A83,
    /// 0x6A86
    IncorrectP1P2 = 0x6A86,
    /// 0x6B00
    WrongParameters = 0x6B00,
    /// 0x6D00
    InsNotSupported = 0x6D00,
    /// 0x6E00
    ClaNotSupported = 0x6E00,
    /// 0x6F00
    Unknown = 0x6F00,
}

impl TryFrom<u16> for APDUErrorCode {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let this = match value {
            0x9000 => Self::NoError,
            0x6282 => Self::EndOfFileReached,
            0x6700 => Self::WrongLength,
            0x6982 => Self::SecurityStatusNotSatisfied,
            0x6983 => Self::AuthenticationBlocked,
            0x6985 => Self::ConditionsNotSatisfied,
            0x6986 => Self::CommandNotAllowed,
            0x6A80 => Self::WrongData,
            0x6A81 => Self::FunctionNotSupported,
            0x6A82 => Self::FileNotFound,
            0x6A83 => Self::RecordNotFound,
            0x6A86 => Self::IncorrectP1P2,
            0x6B00 => Self::WrongParameters,
            0x6D00 => Self::InsNotSupported,
            0x6E00 => Self::ClaNotSupported,
            0x6F00 => Self::Unknown,
            _ => return Err(()),
        };

        Ok(this)
    }
}

impl APDUErrorCode {
    /// Quick-reference description of the status word
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoError => "[APDU_CODE_OK] No errors",
            Self::EndOfFileReached => "[APDU_CODE_EOF] End of file reached before reading Le bytes",
            Self::WrongLength => "[APDU_CODE_WRONG_LENGTH] Wrong length",
            Self::SecurityStatusNotSatisfied => {
                "[APDU_CODE_SECURITY_STATUS] Security status not satisfied"
            }
            Self::AuthenticationBlocked => "[APDU_CODE_AUTH_BLOCKED] Authentication method blocked",
            Self::ConditionsNotSatisfied => {
                "[APDU_CODE_CONDITIONS] Conditions of use not satisfied"
            }
            Self::CommandNotAllowed => {
                "[APDU_CODE_NOT_ALLOWED] Command not allowed (no current EF)"
            }
            Self::WrongData => "[APDU_CODE_WRONG_DATA] Incorrect parameters in the data field",
            Self::FunctionNotSupported => "[APDU_CODE_UNSUPPORTED] Function not supported",
            Self::FileNotFound => "[APDU_CODE_FILE_NOT_FOUND] File or application not found",
            Self::RecordNotFound => "[APDU_CODE_RECORD_NOT_FOUND] Record not found",
            Self::IncorrectP1P2 => "[APDU_CODE_P1P2] Incorrect parameters P1-P2",
            Self::WrongParameters => "[APDU_CODE_WRONG_PARAMS] Wrong parameters P1-P2",
            Self::InsNotSupported => "[APDU_CODE_INS_NOT_SUPPORTED] Instruction code not supported",
            Self::ClaNotSupported => "[APDU_CODE_CLA_NOT_SUPPORTED] Class not supported",
            Self::Unknown => "[APDU_CODE_UNKNOWN] No precise diagnosis",
        }
    }
}
