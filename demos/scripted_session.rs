// SPDX-License-Identifier: Apache-2.0

//! Scripted CIE read session against the mock reader
//!
//! Registers the commands a card-reading routine sends to read the
//! EF.ID_Servizi file, runs the routine, then checks the script was followed.
//! Pass `--wrong-file` to watch the mock diagnose a mismatch.
//!
//! Run with `RUST_LOG=debug` to see every frame.

use std::error::Error;

use cie_transport::{ins, APDUCommand, ApduExchange, NfcReader};
use cie_transport_mock::{ConsoleSink, MockTransport};

const IAS_AID: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x00, 0x39];
const CIE_AID: &[u8] = &[
    0xA0, 0x00, 0x00, 0x00, 0x30, 0x80, 0x00, 0x00, 0x00, 0x09, 0x81, 0x60, 0x01,
];
const EF_ID_SERVIZI: [u8; 2] = [0x10, 0x01];
const EF_SOD: [u8; 2] = [0x10, 0x06];
const ID_SERVIZI_LEN: u8 = 12;

fn select(p1: u8, data: &[u8]) -> APDUCommand<&[u8]> {
    APDUCommand {
        cla: 0x00,
        ins: ins::SELECT_FILE,
        p1,
        p2: 0x0C,
        data,
        le: None,
    }
}

fn read_binary(len: u8) -> APDUCommand<&'static [u8]> {
    APDUCommand {
        cla: 0x00,
        ins: ins::READ_BINARY,
        p1: 0x00,
        p2: 0x00,
        data: &[],
        le: Some(len),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let wrong_file = std::env::args().any(|arg| arg == "--wrong-file");
    let scripted_file = if wrong_file { EF_SOD } else { EF_ID_SERVIZI };

    let mut reader = MockTransport::with_sink(ConsoleSink);
    reader.reset();
    reader.expect_apdu(&select(0x04, IAS_AID), &[0x90, 0x00])?;
    reader.expect_apdu(&select(0x04, CIE_AID), &[0x90, 0x00])?;
    reader.expect_apdu(&select(0x02, &scripted_file), &[0x90, 0x00])?;
    let mut id_servizi = b"0123456789AB".to_vec();
    id_servizi.extend_from_slice(&[0x90, 0x00]);
    reader.expect_apdu(&read_binary(ID_SERVIZI_LEN), &id_servizi)?;

    println!("Script loaded: {} commands", reader.queue().expected_count());

    reader.begin()?;
    if !reader.detect_card()? {
        println!("No card in the field");
        return Ok(());
    }

    let steps = [
        ("select IAS", select(0x04, IAS_AID), 2usize),
        ("select CIE", select(0x04, CIE_AID), 2),
        ("select EF.ID_Servizi", select(0x02, &EF_ID_SERVIZI), 2),
        ("read EF.ID_Servizi", read_binary(ID_SERVIZI_LEN), ID_SERVIZI_LEN as usize + 2),
    ];

    for (name, command, response_len) in &steps {
        match reader.exchange(command, *response_len) {
            Ok(answer) => println!(
                "{name}: sw={:04X} data={}",
                answer.retcode(),
                hex::encode(answer.data())
            ),
            Err(e) => {
                println!("{name}: failed ({e})");
                break;
            }
        }
    }

    match reader.verify() {
        Ok(()) => println!("All expected commands were executed"),
        Err(e) => println!("Script not followed: {e}"),
    }

    Ok(())
}
