//! # TTL Serial Transport
//!
//! These printers speak 5 V (or 3.3 V) TTL serial. One wire carries data
//! to the printer; the printer's TX is only used by the status-request
//! path, and may be left unconnected if status sensing is not needed.
//!
//! ## Baud Rate
//!
//! Most units are factory-configured for 19200 baud, but some specimens
//! (the DFRobot GY-EH402 among them) only run at 9600. A wrong rate shows
//! up as garbage characters on the self-test line. The port speed does
//! not bound print throughput; the print head and paper feed are the
//! bottleneck, which is exactly why the driver paces output.
//!
//! ## Port Configuration
//!
//! The port is opened raw: 8 data bits, no parity, one stop bit, no flow
//! control. Hardware flow control must stay off even when the printer's
//! DTR line is wired up; the driver polls that line itself through a
//! [`ReadyLine`](crate::pacing::ReadyLine), it is not RTS/CTS.

use std::io::{Read, Write};
use std::time::Duration;

use async_trait::async_trait;
use serialport::SerialPort;

use super::Transport;
use crate::error::BrasaError;

/// Write timeout for the underlying port. Writes of a few bytes complete
/// in well under this; hitting it means the port is gone.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial connection to the printer.
///
/// ## Example
///
/// ```no_run
/// use brasa::transport::SerialTransport;
/// use brasa::printer::{Printer, PrinterConfig};
///
/// # async fn run() -> Result<(), brasa::BrasaError> {
/// let transport = SerialTransport::open("/dev/ttyUSB0", 19200)?;
/// let mut printer = Printer::new(transport, PrinterConfig::MINI);
/// printer.begin(268).await?;
/// printer.println("hello!").await?;
/// # Ok(())
/// # }
/// ```
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at `baud`, raw 8N1, no flow control.
    pub fn open(path: &str, baud: u32) -> Result<Self, BrasaError> {
        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(WRITE_TIMEOUT)
            .open()?;
        tracing::debug!(path, baud, "serial port open");
        Ok(Self { port })
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), BrasaError> {
        self.port.write_all(data)?;
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<Option<u8>, BrasaError> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(Some(byte[0]))
    }
}
