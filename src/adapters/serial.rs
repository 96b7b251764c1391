//! Serial device adapter.
//!
//! Implements [`DevicePort`] on top of the `serialport` crate.  The port is
//! opened lazily and can be closed and reopened any number of times; a
//! handle that failed a write is dropped by the service so the next
//! command starts from a fresh open.
//!
//! Opening the port toggles DTR, which resets most Arduino boards.  Every
//! fresh open therefore waits `open_settle_ms` before returning, so the
//! first command byte reaches the sketch instead of the bootloader.

use std::io::Write;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::app::ports::{DeviceError, DevicePort};
use crate::config::SwitchConfig;

/// Serial endpoint receiving the ON/OFF byte.
pub struct SerialDevice {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
    settle: Duration,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialDevice {
    /// Describe the port; nothing is opened yet.
    pub fn new(config: &SwitchConfig) -> Self {
        Self {
            port_name: config.port_name.clone(),
            baud_rate: config.baud_rate,
            timeout: Duration::from_millis(config.serial_timeout_ms),
            settle: Duration::from_millis(config.open_settle_ms),
            port: None,
        }
    }

    /// Delay applied after each fresh open.
    pub fn settle_delay(&self) -> Duration {
        self.settle
    }
}

impl DevicePort for SerialDevice {
    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| DeviceError::Open(format!("{}: {}", self.port_name, e)))?;
        info!("Serial port {} opened at {} baud", self.port_name, self.baud_rate);
        if !self.settle.is_zero() {
            debug!("waiting {:?} for the board to come out of reset", self.settle);
            thread::sleep(self.settle);
        }
        self.port = Some(port);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DeviceError> {
        let name = &self.port_name;
        let port = self.port.as_mut().ok_or(DeviceError::NotOpen)?;
        let write_err = |e: std::io::Error| DeviceError::Write(format!("{}: {}", name, e));
        port.write_all(&[byte]).map_err(write_err)?;
        port.flush().map_err(write_err)
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            info!("Serial port {} closed", self.port_name);
        }
    }
}
