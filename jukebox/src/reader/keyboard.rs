//! USB keyboard-wedge readers
//!
//! These readers type the card UID followed by Enter. A background thread
//! reads lines and hands them over a channel so polling can time out.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::error::ReaderError;
use crate::reader::{CardReader, CardUid};

/// Reads hex UIDs, one per line
#[derive(Debug)]
pub struct KeyboardReader {
    lines: Receiver<io::Result<String>>,
}

impl KeyboardReader {
    /// Read from standard input
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || pump(io::stdin().lock(), tx));
        Self { lines: rx }
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || pump(reader, tx));
        Self { lines: rx }
    }
}

fn pump<R: BufRead>(reader: R, tx: Sender<io::Result<String>>) {
    for line in reader.lines() {
        let message = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => Ok(line.trim().to_string()),
            Err(e) => Err(e),
        };
        let failed = message.is_err();
        if tx.send(message).is_err() || failed {
            break;
        }
    }
}

impl CardReader for KeyboardReader {
    fn read_card(&mut self, timeout: Duration) -> Result<Option<CardUid>, ReaderError> {
        match self.lines.recv_timeout(timeout) {
            Ok(Ok(line)) => CardUid::from_hex(&line)
                .map(Some)
                .ok_or_else(|| ReaderError::Transient(format!("Unreadable card UID: {}", line))),
            Ok(Err(e)) => Err(ReaderError::Io(e)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ReaderError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_until_disconnected() {
        let mut reader = KeyboardReader::from_reader(Cursor::new("04A2B3C4\n\nnot-hex\n5d1e22f0\n"));
        let timeout = Duration::from_secs(1);

        assert_eq!(reader.read_card(timeout).unwrap(), CardUid::from_hex("04a2b3c4"));
        assert!(reader.read_card(timeout).unwrap_err().is_transient());
        assert_eq!(reader.read_card(timeout).unwrap().map(|u| u.to_hex()), Some("5d1e22f0".into()));
        assert!(matches!(reader.read_card(timeout), Err(ReaderError::Disconnected)));
    }

    #[test]
    fn test_times_out_without_input() {
        let (_writer, pipe) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut reader = KeyboardReader::from_reader(io::BufReader::new(pipe));
        assert_eq!(reader.read_card(Duration::from_millis(20)).unwrap(), None);
    }
}
