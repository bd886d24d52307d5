// SPDX-License-Identifier: Apache-2.0

//! Drives the mock the way card-reading code drives a real PN532.

use cie_transport::{ins, APDUCommand, ApduExchange, ExchangeError, NfcReader};
use cie_transport_mock::{CaptureSink, MockError, MockTransport, VerifyError};

const IAS_AID: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x00, 0x39];
const CIE_AID: &[u8] = &[
    0xA0, 0x00, 0x00, 0x00, 0x30, 0x80, 0x00, 0x00, 0x00, 0x09, 0x81, 0x60, 0x01,
];
const EF_ID_SERVIZI: &[u8] = &[0x10, 0x01];
const ID_SERVIZI: &[u8] = b"0123456789AB";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn select(p1: u8, p2: u8, data: &[u8]) -> APDUCommand<Vec<u8>> {
    APDUCommand {
        cla: 0x00,
        ins: ins::SELECT_FILE,
        p1,
        p2,
        data: data.to_vec(),
        le: None,
    }
}

fn read_binary(len: u8) -> APDUCommand<Vec<u8>> {
    APDUCommand {
        cla: 0x00,
        ins: ins::READ_BINARY,
        p1: 0x00,
        p2: 0x00,
        data: Vec::new(),
        le: Some(len),
    }
}

fn with_status(body: &[u8]) -> Vec<u8> {
    let mut answer = body.to_vec();
    answer.extend_from_slice(&[0x90, 0x00]);
    answer
}

/// Minimal card reading routine, generic over the reader like the real library
fn read_id_servizi<R>(reader: &mut R) -> Result<Vec<u8>, ExchangeError<R::Error>>
where
    R: NfcReader,
{
    reader.begin().map_err(ExchangeError::Reader)?;
    if !reader.detect_card().map_err(ExchangeError::Reader)? {
        return Ok(Vec::new());
    }

    reader.exchange(&select(0x04, 0x0C, IAS_AID), 2)?;
    reader.exchange(&select(0x04, 0x0C, CIE_AID), 2)?;
    reader.exchange(&select(0x02, 0x0C, EF_ID_SERVIZI), 2)?;
    let answer = reader.exchange(&read_binary(ID_SERVIZI.len() as u8), ID_SERVIZI.len() + 2)?;

    Ok(answer.data().to_vec())
}

fn expect_full_session(mock: &mut MockTransport<CaptureSink>) {
    mock.expect_apdu(&select(0x04, 0x0C, IAS_AID), &[0x90, 0x00])
        .unwrap();
    mock.expect_apdu(&select(0x04, 0x0C, CIE_AID), &[0x90, 0x00])
        .unwrap();
    mock.expect_apdu(&select(0x02, 0x0C, EF_ID_SERVIZI), &[0x90, 0x00])
        .unwrap();
    mock.expect_apdu(&read_binary(ID_SERVIZI.len() as u8), &with_status(ID_SERVIZI))
        .unwrap();
}

#[test]
fn full_session_drains_queue() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    expect_full_session(&mut mock);

    let id = read_id_servizi(&mut mock).unwrap();

    assert_eq!(id, ID_SERVIZI);
    assert!(mock.all_satisfied());
    assert_eq!(mock.verify(), Ok(()));
    assert_eq!(mock.sent_commands().len(), 4);
    assert!(mock.sink().is_empty());
}

#[test]
fn wrong_file_is_diagnosed() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    mock.expect_apdu(&select(0x04, 0x0C, IAS_AID), &[0x90, 0x00])
        .unwrap();
    mock.expect_apdu(&select(0x04, 0x0C, CIE_AID), &[0x90, 0x00])
        .unwrap();
    // The routine selects EF.ID_Servizi, the script expects EF.SOD
    mock.expect_apdu(&select(0x02, 0x0C, &[0x10, 0x06]), &[0x90, 0x00])
        .unwrap();

    let err = read_id_servizi(&mut mock).unwrap_err();

    assert!(matches!(
        err,
        ExchangeError::Reader(MockError::Mismatch {
            index: 2,
            byte: 6,
            expected: 0x06,
            received: 0x01,
        })
    ));
    assert_eq!(
        mock.sink().messages(),
        vec!["command at index 2 was not expected (byte 6 was different: expected 0x06 but received 0x01): expected [0x00 0xA4 0x02 0x0C 0x02 0x10 0x06] at offset 0 but received [0x00 0xA4 0x02 0x0C 0x02 0x10 0x01]"]
    );
    assert_eq!(
        mock.verify(),
        Err(VerifyError::FailedAttempts {
            attempted: 3,
            executed: 2,
        })
    );
}

#[test]
fn short_script_overcalls() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    mock.expect_apdu(&select(0x04, 0x0C, IAS_AID), &[0x90, 0x00])
        .unwrap();

    let err = read_id_servizi(&mut mock).unwrap_err();

    assert!(matches!(
        err,
        ExchangeError::Reader(MockError::OverCall {
            attempted: 2,
            expected: 1,
        })
    ));
    assert!(!mock.all_satisfied());
    assert_eq!(mock.queue().executed_count(), 1);
}

#[test]
fn unfinished_script_is_an_under_call() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    expect_full_session(&mut mock);
    mock.expect_apdu(&read_binary(0x10), &[0x62, 0x82]).unwrap();

    read_id_servizi(&mut mock).unwrap();

    assert!(!mock.all_satisfied());
    assert_eq!(
        mock.verify(),
        Err(VerifyError::UnderCall {
            executed: 4,
            expected: 5,
        })
    );
    assert!(mock.sink().is_empty());
}

#[test]
fn error_status_is_played_back() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    mock.expect_apdu(&select(0x04, 0x0C, IAS_AID), &[0x6A, 0x82])
        .unwrap();

    let answer = mock.exchange(&select(0x04, 0x0C, IAS_AID), 2).unwrap();

    assert!(!answer.is_success());
    assert_eq!(answer.retcode(), 0x6A82);
    assert!(mock.all_satisfied());
}

#[test]
fn partial_pattern_ignores_varying_bytes() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    // Match the READ BINARY header only, whatever offset and Le the caller uses
    mock.expect_command(&[0x00, ins::READ_BINARY], 0, &with_status(&[0xAA]))
        .unwrap();
    mock.expect_command(&[ins::READ_BINARY], 1, &with_status(&[0xBB]))
        .unwrap();

    let mut buf = [0u8; 3];
    mock.send_command(&[0x00, 0xB0, 0x00, 0x00, 0x01], &mut buf)
        .unwrap();
    assert_eq!(buf, [0xAA, 0x90, 0x00]);
    mock.send_command(&[0x00, 0xB0, 0x00, 0x01, 0x01], &mut buf)
        .unwrap();
    assert_eq!(buf, [0xBB, 0x90, 0x00]);

    assert!(mock.all_satisfied());
}

#[test]
fn many_commands_in_order() {
    init_logger();
    let mut mock = MockTransport::with_sink(CaptureSink::new());
    let commands: Vec<Vec<u8>> = (0u8..32).map(|i| vec![0x00, 0xB0, 0x00, i]).collect();
    for (i, command) in commands.iter().enumerate() {
        mock.expect(command, &[i as u8, 0x90, 0x00]).unwrap();
    }

    for (i, command) in commands.iter().enumerate() {
        let mut buf = [0u8; 3];
        assert_eq!(mock.send_command(command, &mut buf), Ok(3));
        assert_eq!(buf[0], i as u8);
    }

    assert!(mock.all_satisfied());
    assert!(mock.sink().is_empty());
}
