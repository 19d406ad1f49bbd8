//! PN532 NFC controller over I2C
//!
//! Every exchange with the chip has the same shape: the host writes a
//! normal information frame, waits for the chip to signal ready, reads the
//! 6-byte ACK, waits again and reads the response frame.
//!
//! ```text
//! 00 00 FF LEN LCS TFI DATA... DCS 00
//! ```
//!
//! `LCS` makes `LEN + LCS` zero and `DCS` makes `TFI + DATA + DCS` zero
//! (mod 256). Over I2C every read starts with a status byte whose low bit
//! is set once the chip has data ready.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ReaderError;
use crate::reader::{CardReader, CardUid};

const PREAMBLE: u8 = 0x00;
const START_CODE: [u8; 2] = [0x00, 0xFF];
const POSTAMBLE: u8 = 0x00;

const HOST_TO_PN532: u8 = 0xD4;
const PN532_TO_HOST: u8 = 0xD5;

const CMD_GET_FIRMWARE_VERSION: u8 = 0x02;
const CMD_SAM_CONFIGURATION: u8 = 0x14;
const CMD_IN_LIST_PASSIVE_TARGET: u8 = 0x4A;

/// 106 kbps type A (ISO/IEC 14443 A, MIFARE)
const BAUD_106_TYPE_A: u8 = 0x00;

const ACK: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];
const STATUS_READY: u8 = 0x01;
const POLL_INTERVAL: Duration = Duration::from_millis(10);
const SETUP_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest UID (triple size cards have 10 bytes, MIFARE uses up to 7)
const MAX_UID_LEN: usize = 7;

/// Byte-level access to the chip
pub trait I2cBus {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Fill `buf` completely
    fn read(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Reported by `GetFirmwareVersion`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub ic: u8,
    pub version: u8,
    pub revision: u8,
    pub support: u8,
}

/// PN532 driver
#[derive(Debug)]
pub struct Pn532<B> {
    bus: B,
}

impl<B: I2cBus> Pn532<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, ReaderError> {
        let response = self
            .call(CMD_GET_FIRMWARE_VERSION, &[], 4, SETUP_TIMEOUT)?
            .ok_or_else(|| ReaderError::Transient("PN532 did not report its firmware version".into()))?;
        match response[..] {
            [ic, version, revision, support, ..] => Ok(FirmwareVersion {
                ic,
                version,
                revision,
                support,
            }),
            _ => Err(ReaderError::Transient("Short firmware version response".into())),
        }
    }

    /// Normal mode, 1 s virtual card timeout, IRQ pin in use
    pub fn sam_configuration(&mut self) -> Result<(), ReaderError> {
        self.call(CMD_SAM_CONFIGURATION, &[0x01, 0x14, 0x01], 0, SETUP_TIMEOUT)?
            .map(|_| ())
            .ok_or_else(|| ReaderError::Transient("PN532 did not confirm SAM configuration".into()))
    }

    /// Wait up to `timeout` for one ISO 14443A card
    pub fn read_passive_target(&mut self, timeout: Duration) -> Result<Option<CardUid>, ReaderError> {
        match self.call(CMD_IN_LIST_PASSIVE_TARGET, &[0x01, BAUD_106_TYPE_A], 19, timeout)? {
            Some(response) => parse_target(&response),
            None => Ok(None),
        }
    }

    /// Send `command` and return its response data, or `None` on timeout
    fn call(
        &mut self,
        command: u8,
        params: &[u8],
        response_len: usize,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, ReaderError> {
        let mut data = Vec::with_capacity(params.len() + 2);
        data.push(HOST_TO_PN532);
        data.push(command);
        data.extend_from_slice(params);
        self.bus.write(&encode_frame(&data))?;

        if !self.wait_ready(timeout)? {
            return Ok(None);
        }
        if self.read_data(ACK.len())? != ACK {
            return Err(ReaderError::Transient("Did not receive expected ACK from PN532".into()));
        }
        if !self.wait_ready(timeout)? {
            return Ok(None);
        }

        let response = decode_frame(&self.read_data(response_len + 2 + 7)?)?;
        if response.len() < 2 || response[0] != PN532_TO_HOST || response[1] != command + 1 {
            return Err(ReaderError::Transient("Received unexpected command response".into()));
        }
        Ok(Some(response[2..].to_vec()))
    }

    fn wait_ready(&mut self, timeout: Duration) -> Result<bool, ReaderError> {
        let deadline = Instant::now() + timeout;
        loop {
            let mut status = [0u8; 1];
            self.bus.read(&mut status)?;
            if status[0] & STATUS_READY != 0 {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Read `count` bytes, dropping the leading status byte
    fn read_data(&mut self, count: usize) -> Result<Vec<u8>, ReaderError> {
        let mut buf = vec![0u8; count + 1];
        self.bus.read(&mut buf)?;
        buf.remove(0);
        Ok(buf)
    }
}

impl<B: I2cBus> CardReader for Pn532<B> {
    fn read_card(&mut self, timeout: Duration) -> Result<Option<CardUid>, ReaderError> {
        self.read_passive_target(timeout)
    }
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Wrap `data` (TFI included) in a normal information frame
fn encode_frame(data: &[u8]) -> Vec<u8> {
    let len = data.len() as u8;
    let mut frame = Vec::with_capacity(data.len() + 7);
    frame.push(PREAMBLE);
    frame.extend_from_slice(&START_CODE);
    frame.push(len);
    frame.push(len.wrapping_neg());
    frame.extend_from_slice(data);
    frame.push(checksum(data).wrapping_neg());
    frame.push(POSTAMBLE);
    frame
}

/// Extract the data (TFI included) from a response frame
fn decode_frame(response: &[u8]) -> Result<Vec<u8>, ReaderError> {
    let preamble_error = || ReaderError::Transient("Response frame preamble does not contain 0x00FF".into());

    let start = response.iter().position(|b| *b != 0x00).ok_or_else(preamble_error)?;
    if start == 0 || response[start] != 0xFF {
        return Err(preamble_error());
    }

    let header = &response[start + 1..];
    let (len, lcs) = match header {
        [len, lcs, ..] => (*len as usize, *lcs),
        _ => return Err(ReaderError::Transient("Response contains no data".into())),
    };
    if (len as u8).wrapping_add(lcs) != 0 {
        return Err(ReaderError::Transient("Response length checksum did not match length".into()));
    }

    let body = header
        .get(2..2 + len + 1)
        .ok_or_else(|| ReaderError::Transient("Response frame is truncated".into()))?;
    if checksum(body) != 0 {
        return Err(ReaderError::Transient("Response checksum did not match expected value".into()));
    }
    Ok(body[..len].to_vec())
}

/// `[targets, tg, sens_res(2), sel_res, uid_len, uid...]`
fn parse_target(response: &[u8]) -> Result<Option<CardUid>, ReaderError> {
    match response.first() {
        None | Some(0) => return Ok(None),
        Some(1) => {}
        Some(_) => return Err(ReaderError::Transient("More than one card detected".into())),
    }

    let uid_len = *response
        .get(5)
        .ok_or_else(|| ReaderError::Transient("Target response is truncated".into()))? as usize;
    if uid_len > MAX_UID_LEN {
        return Err(ReaderError::Transient("Found card with unexpectedly long UID".into()));
    }
    response
        .get(6..6 + uid_len)
        .map(|uid| Some(CardUid::new(uid.to_vec())))
        .ok_or_else(|| ReaderError::Transient("Target response is truncated".into()))
}
