//! # Wire Protocol
//!
//! Low-level command builders for the ESC/POS-style byte protocol spoken
//! by serial mini thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: control-byte constants and fixed-form command builders
//! - [`font`]: the print-mode bitmask, font metrics, alignment and size types
//! - [`barcode`]: barcode symbology codes
//!
//! Everything in this module is pure byte construction: no I/O, no state,
//! no timing. The stateful, paced side lives in [`crate::printer`].
//!
//! ## Usage Example
//!
//! ```
//! use brasa::protocol::{commands, font::PrintMode};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(commands::print_mode(PrintMode::BOLD.bits()));
//! data.extend(b"TOTAL  $4.20\n");
//! data.extend(commands::feed_lines(2));
//! assert_eq!(&data[..2], &[0x1B, 0x40]);
//! ```

pub mod barcode;
pub mod commands;
pub mod font;

pub use barcode::Barcode;
pub use font::{Alignment, Font, PrintMode, TextSize};
