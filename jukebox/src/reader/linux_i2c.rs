//! `/dev/i2c-N` character devices

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;

use super::pn532::I2cBus;

/// Bus the PN532 HAT is wired to on a Raspberry Pi
pub const DEFAULT_DEVICE: &str = "/dev/i2c-1";

/// 7-bit address of the PN532
pub const PN532_ADDRESS: u16 = 0x24;

/// `I2C_SLAVE` from `linux/i2c-dev.h`
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// An I2C adapter bound to one slave address
#[derive(Debug)]
pub struct LinuxI2c {
    file: File,
}

impl LinuxI2c {
    pub fn open(path: impl AsRef<Path>, address: u16) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        // SAFETY: I2C_SLAVE takes the address by value and the descriptor is open
        let rc = unsafe { libc::ioctl(file.as_raw_fd(), I2C_SLAVE as _, libc::c_ulong::from(address)) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { file })
    }
}

impl I2cBus for LinuxI2c {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.file.read_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinuxI2c::open(dir.path().join("i2c-9"), PN532_ADDRESS).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_regular_file_rejects_slave_address() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(LinuxI2c::open(file.path(), PN532_ADDRESS).is_err());
    }
}
