// SPDX-License-Identifier: Apache-2.0

//! Destinations for human readable mismatch reports.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use log::error;

/// Receives free-text reports about commands that did not go as expected
pub trait DiagnosticSink {
    /// Record one report
    fn report(&self, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, message: &str) {
        (**self).report(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn report(&self, message: &str) {
        (**self).report(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Rc<S> {
    fn report(&self, message: &str) {
        (**self).report(message)
    }
}

/// Forwards reports to the `log` facade at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, message: &str) {
        error!(target: "cie_transport_mock", "{}", message);
    }
}

/// Writes reports to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Keeps reports in memory so tests can assert on them
#[derive(Debug, Default)]
pub struct CaptureSink {
    messages: RefCell<Vec<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every report received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Drain the reports received so far
    pub fn take(&self) -> Vec<String> {
        self.messages.take()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl DiagnosticSink for CaptureSink {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Render bytes as `0x00 0xA4 ...`
pub fn hex_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 5);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "0x{:02X}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[]), "");
        assert_eq!(hex_bytes(&[0x0A]), "0x0A");
        assert_eq!(hex_bytes(&[0x00, 0xA4, 0xFF]), "0x00 0xA4 0xFF");
    }

    #[test]
    fn test_capture_sink_records_in_order() {
        let sink = CaptureSink::new();
        assert!(sink.is_empty());

        sink.report("first");
        (&sink).report("second");

        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_capture_sink() {
        let sink = Rc::new(CaptureSink::new());
        let handle = Rc::clone(&sink);

        sink.report("through the Rc");

        assert_eq!(handle.messages(), vec!["through the Rc"]);
    }
}
