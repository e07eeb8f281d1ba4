//! # Barcode Symbologies
//!
//! The printer renders barcodes in firmware from a text payload; the host
//! only selects the symbology (`GS k n`) and streams the payload. No
//! rasterization happens driver-side.
//!
//! ## Firmware Offset
//!
//! Firmware ≥ 2.64 renumbered the symbology codes by +65 and switched the
//! payload from NUL-terminated to length-prefixed. The driver applies both
//! automatically based on the session's capabilities.

/// Barcode symbology for `GS k`.
///
/// Payload constraints (digit counts, checksums) are enforced by the
/// printer firmware, not the driver; an invalid payload prints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Barcode {
    /// UPC-A: 11-12 digits
    UpcA = 0,
    /// UPC-E: 11-12 digits
    UpcE = 1,
    /// EAN-13: 12-13 digits
    Ean13 = 2,
    /// EAN-8: 7-8 digits
    Ean8 = 3,
    /// Code 39: alphanumeric plus `- . $ / + %` and space
    Code39 = 4,
    /// Interleaved 2 of 5: even number of digits
    Itf = 5,
    /// Codabar: digits plus `A-D` start/stop
    Codabar = 6,
    /// Code 93: full ASCII
    Code93 = 7,
    /// Code 128: full ASCII, densest
    Code128 = 8,
}

impl Barcode {
    /// The `GS k` type byte. `offset` is true for firmware ≥ 2.64, which
    /// renumbered the table by +65.
    #[inline]
    pub fn wire_code(self, offset: bool) -> u8 {
        let base = self as u8;
        if offset { base + 65 } else { base }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_codes() {
        assert_eq!(Barcode::UpcA.wire_code(false), 0);
        assert_eq!(Barcode::Code128.wire_code(false), 8);
    }

    #[test]
    fn test_offset_codes() {
        assert_eq!(Barcode::UpcA.wire_code(true), 65);
        assert_eq!(Barcode::Code39.wire_code(true), 69);
        assert_eq!(Barcode::Code128.wire_code(true), 73);
    }
}
