//! # Printer Configuration
//!
//! Hardware constants for supported printer models and the firmware
//! capability table.
//!
//! ## Supported Printers
//!
//! | Model | Head width | Baud | Buffer |
//! |-------|------------|------|--------|
//! | Adafruit Mini / CSN-A2 | 384 dots | 19200 | 256 bytes |
//! | DFRobot GY-EH402 | 384 dots | 9600 | 256 bytes |
//!
//! Both heads print 384 dots across (48 bytes per raster row). The serial
//! rate differs; it has no effect on print speed, which is bounded by the
//! mechanism, but it does feed the per-byte pacing estimate.
//!
//! ## Firmware Versions
//!
//! The command set changed across firmware releases. Callers report their
//! unit's version (printed on the self-test page, e.g. 2.68 → `268`) to
//! [`Printer::begin`](crate::printer::Printer::begin), and every gated
//! encoding choice is derived once into a [`Capabilities`] table.

/// Hardware characteristics of a printer model.
#[derive(Debug, Clone, Copy)]
pub struct PrinterConfig {
    /// Model name
    pub name: &'static str,

    /// Print head width in dots
    pub head_width_dots: u16,

    /// Internal receive buffer size in bytes
    pub buffer_bytes: u16,

    /// Factory serial rate in bits per second
    pub baud: u32,
}

impl PrinterConfig {
    /// Adafruit Mini Thermal Printer (CSN-A2 mechanism), 19200 baud.
    pub const MINI: Self = Self {
        name: "Adafruit Mini Thermal",
        head_width_dots: 384,
        buffer_bytes: 256,
        baud: 19200,
    };

    /// DFRobot GY-EH402, 9600 baud only.
    pub const GY_EH402: Self = Self {
        name: "DFRobot GY-EH402",
        head_width_dots: 384,
        buffer_bytes: 256,
        baud: 9600,
    };

    /// Raster row width in bytes (head width / 8).
    #[inline]
    pub fn row_bytes(&self) -> u8 {
        (self.head_width_dots / 8) as u8
    }

    /// Microseconds to issue one byte at this port speed. 11 bit times
    /// (not 8) to accommodate idle, start and stop bits.
    #[inline]
    pub fn byte_time_micros(&self) -> u32 {
        (11 * 1_000_000 + self.baud / 2) / self.baud
    }
}

/// Command encodings supported by a firmware version.
///
/// One comparison per concern, computed once at `begin`, so the gating is
/// auditable here instead of scattered through the encoder.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Reported firmware version (e.g. 268 for 2.68)
    pub firmware: u16,

    /// `GS B` inverse command (else the print-mode bit)
    pub direct_inverse: bool,

    /// `ESC {` upside-down command (else the print-mode bit)
    pub direct_upside_down: bool,

    /// Two-byte sleep timer (else a single byte, max 255 s)
    pub wide_sleep_timer: bool,

    /// Sleep must be explicitly cancelled after the wake byte
    pub sleep_cancel_on_wake: bool,

    /// Symbology codes offset by +65 and length-prefixed payloads
    /// (else legacy codes and NUL-terminated payloads)
    pub modern_barcode: bool,

    /// `ESC d` multi-line feed (else emulated with raw newlines)
    pub feed_command: bool,

    /// Accepts a tab-stop table after reset
    pub tab_stops: bool,
}

impl Capabilities {
    /// Derive the capability set for a reported firmware version.
    pub fn for_firmware(version: u16) -> Self {
        Self {
            firmware: version,
            direct_inverse: version >= 268,
            direct_upside_down: version >= 268,
            wide_sleep_timer: version >= 264,
            sleep_cancel_on_wake: version >= 264,
            modern_barcode: version >= 264,
            feed_command: version >= 264,
            tab_stops: version >= 264,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_time() {
        // 11 bit times, rounded: 573 µs at 19200, 1146 µs at 9600.
        assert_eq!(PrinterConfig::MINI.byte_time_micros(), 573);
        assert_eq!(PrinterConfig::GY_EH402.byte_time_micros(), 1146);
    }

    #[test]
    fn test_row_bytes() {
        assert_eq!(PrinterConfig::MINI.row_bytes(), 48);
    }

    #[test]
    fn test_capability_thresholds() {
        let old = Capabilities::for_firmware(263);
        assert!(!old.feed_command && !old.modern_barcode && !old.tab_stops);
        assert!(!old.direct_inverse);

        let mid = Capabilities::for_firmware(264);
        assert!(mid.feed_command && mid.modern_barcode && mid.wide_sleep_timer);
        assert!(!mid.direct_inverse && !mid.direct_upside_down);

        let new = Capabilities::for_firmware(268);
        assert!(new.direct_inverse && new.direct_upside_down);
    }
}
