//! # Brasa - Serial Thermal Printer Driver
//!
//! Brasa is a Rust driver for TTL-serial mini thermal receipt printers
//! (Adafruit Mini / CSN-A2, DFRobot GY-EH402). It provides:
//!
//! - **Protocol implementation**: ESC/POS-style command builders
//! - **Timing-aware dispatch**: output pacing from empirical print and
//!   feed rates, or from the printer's DTR ready line
//! - **Printer session**: text with style/wrap tracking, bitmaps,
//!   firmware-rendered barcodes, user-defined glyphs, status sensing
//! - **Transport**: TTL serial, plus a mock for tests
//!
//! These printers have no flow control in the common two-wire hookup, so
//! the driver's central job is never writing a byte while the device is
//! still physically completing the last operation. All waiting is
//! cooperative (async); see [`pacing`] for the two strategies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use brasa::printer::{Printer, PrinterConfig};
//! use brasa::protocol::{Barcode, Font, TextSize};
//! use brasa::transport::SerialTransport;
//!
//! # async fn run() -> Result<(), brasa::BrasaError> {
//! let transport = SerialTransport::open("/dev/ttyUSB0", 19200)?;
//! let mut printer = Printer::new(transport, PrinterConfig::MINI);
//!
//! printer.begin(268).await?; // firmware version from the self-test page
//! printer.set_default().await?;
//!
//! printer.set_size(TextSize::Large).await?;
//! printer.println("BRASA").await?;
//! printer.set_size(TextSize::Small).await?;
//! printer.set_font(Font::B).await?;
//! printer.println("receipt body in condensed type").await?;
//! printer.print_barcode("123456789012", Barcode::UpcA).await?;
//! printer.feed(3).await?;
//!
//! printer.sleep().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Command builders and styling types |
//! | [`printer`] | The stateful, paced printer session |
//! | [`pacing`] | Deadline / ready-line output throttling |
//! | [`transport`] | Communication backends |
//! | [`error`] | Error types |
//!
//! ## Firmware Versions
//!
//! The command set drifted across firmware releases (sleep-timer width,
//! barcode numbering, feed command, direct style commands). Report the
//! version printed on the unit's self-test page to
//! [`Printer::begin`](printer::Printer::begin) and the driver picks the
//! right encodings; see [`printer::Capabilities`].

pub mod error;
pub mod pacing;
pub mod printer;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use error::BrasaError;
pub use printer::{Printer, PrinterConfig};
pub use transport::SerialTransport;
