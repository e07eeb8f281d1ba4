//! # Printer Transport Layer
//!
//! Byte transports for talking to the printer. The driver needs very
//! little from a transport: ordered, reliable byte output and a polled,
//! non-blocking byte input for the status path. Pacing and protocol
//! framing happen above this layer.
//!
//! ## Available Transports
//!
//! - [`serial`]: TTL serial via the `serialport` crate (the native hookup
//!   for these printers)
//! - [`mock`]: scripted in-memory transport for tests

pub mod mock;
pub mod serial;

use async_trait::async_trait;

use crate::error::BrasaError;

/// Ordered, reliable byte channel to the printer.
///
/// `read_byte` must poll: return `Ok(None)` immediately when no byte is
/// waiting rather than block. The status-read retry loop supplies its own
/// delays.
#[async_trait]
pub trait Transport: Send {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), BrasaError>;

    async fn read_byte(&mut self) -> Result<Option<u8>, BrasaError>;
}

pub use mock::MockTransport;
pub use serial::SerialTransport;
