//! # Printer Control Commands
//!
//! Fixed-form command builders for the ESC/POS-style command set spoken by
//! serial mini thermal printers (Adafruit Mini / CSN-A2, DFRobot GY-EH402).
//!
//! ## Command Structure
//!
//! Every command is a short byte sequence keyed by a leading control byte:
//!
//! - Single byte: `LF`, `FF`, `HT`, the wake byte
//! - Two bytes: `ESC @`, `FS .`
//! - Multi-byte with parameters: `ESC ! n`, `GS k n`, `DC2 * h w`
//!
//! The builders here return the exact bytes to put on the wire; they carry
//! no printer state and perform no pacing. State tracking and timing live
//! in [`crate::printer::Printer`].
//!
//! ## The Terminator Byte
//!
//! The GY-EH402 firmware (S1.06) does not execute the font-select and
//! character-size commands until a terminator byte (12) follows them, so
//! [`select_font`] and [`char_size`] append [`TERM`]. This is a quirk of
//! this firmware line, not part of standard ESC/POS.
//!
//! ## Byte Order
//!
//! Multi-byte integers are **little-endian**: the two-byte sleep timer for
//! 300 seconds is sent as `[44, 1]`.

// ============================================================================
// CONTROL BYTES
// ============================================================================

/// HT (Horizontal Tab) - advance to the next tab stop
pub const TAB: u8 = 9;

/// LF (Line Feed) - print the line buffer and feed one line
pub const LF: u8 = 10;

/// FF (Form Feed) - print the line buffer without feeding
pub const FF: u8 = 12;

/// CR (Carriage Return) - never transmitted; stripped by the text path
pub const CR: u8 = 13;

/// DLE (Data Link Escape) - prefix for real-time status requests
pub const DLE: u8 = 0x10;

/// DC2 (Device Control 2) - prefix for bitmap, density and test commands
pub const DC2: u8 = 18;

/// ESC (Escape) - prefix for most configuration commands
pub const ESC: u8 = 27;

/// FS (Field Separator) - prefix for Kanji-mode commands
pub const FS: u8 = 28;

/// GS (Group Separator) - prefix for barcode and extended commands
pub const GS: u8 = 29;

/// Command terminator required by the GY-EH402 font/size commands.
/// Without it the firmware silently queues the command and never runs it.
pub const TERM: u8 = 12;

/// Wake byte. Any byte wakes the printer, 255 is the conventional choice.
pub const WAKE: u8 = 255;

/// No-op byte, interspersed after wake on old firmware.
pub const NUL: u8 = 0;

// ============================================================================
// INITIALIZATION AND SESSION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state: clears the line
/// buffer, disables all text styling, and restores default line spacing.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// Does NOT reset heat configuration, user-defined characters, or the
/// sleep timer.
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Configure Tab Stops (ESC D n1...nk NUL)
///
/// Sets a tab stop every 4 columns (4, 8, ... 28). The trailing 0 marks
/// end-of-list. Only understood by firmware ≥ 2.64.
#[inline]
pub fn tab_stops() -> Vec<u8> {
    vec![ESC, b'D', 4, 8, 12, 16, 20, 24, 28, 0]
}

/// # Printer Online / Offline (ESC = n)
///
/// While offline, the printer ignores everything except a subsequent
/// online command.
#[inline]
pub fn set_online(online: bool) -> Vec<u8> {
    vec![ESC, b'=', online as u8]
}

/// # Sleep After Delay, two-byte timer (ESC 8 nL nH)
///
/// Enters a low-energy state after `seconds` of inactivity. The two-byte
/// little-endian form is understood by firmware ≥ 2.64 and allows delays
/// beyond 255 seconds. Zero cancels a pending sleep.
#[inline]
pub fn sleep_after(seconds: u16) -> Vec<u8> {
    vec![ESC, b'8', seconds as u8, (seconds >> 8) as u8]
}

/// Sleep-after with the single-byte timer accepted by old firmware.
#[inline]
pub fn sleep_after_short(seconds: u8) -> Vec<u8> {
    vec![ESC, b'8', seconds]
}

/// # Real-Time Status Request (DLE EOT n)
///
/// Asks the printer to report one status byte. Unlike every other command
/// this is handled out-of-band by the firmware, so it may be issued while
/// the printer is busy or the cover is open.
///
/// | Page | Reports |
/// |------|---------|
/// | 1 | printer status (online/offline) |
/// | 2 | offline cause (cover open) |
/// | 3 | error cause (heat/voltage range) |
/// | 4 | paper roll sensor |
#[inline]
pub fn status_request(page: u8) -> Vec<u8> {
    vec![DLE, 4, page]
}

/// # Enable DTR Handshake (GS a n)
///
/// Asks the printer to drive its DTR line low when ready for data. Only
/// issued when the host has wired that line to a digital input; bit 5
/// selects the DTR function.
#[inline]
pub fn dtr_handshake() -> Vec<u8> {
    vec![GS, b'a', 1 << 5]
}

/// # Cancel Kanji Mode (FS .)
///
/// The GY-EH402 ships with Kanji mode on, which renders the extended
/// character range (128-255) as Chinese glyphs. This disables it so the
/// selected code page applies instead.
#[inline]
pub fn cancel_kanji() -> Vec<u8> {
    vec![FS, b'.']
}

/// Print the firmware's built-in test page (DC2 T).
#[inline]
pub fn test_page() -> Vec<u8> {
    vec![DC2, b'T']
}

// ============================================================================
// TEXT STYLING
// ============================================================================

/// # Set Print Mode (ESC ! n)
///
/// Applies the whole style bitmask in one command; see
/// [`PrintMode`](crate::protocol::PrintMode) for the bit layout.
#[inline]
pub fn print_mode(mask: u8) -> Vec<u8> {
    vec![ESC, b'!', mask]
}

/// # Select Font (ESC M n TERM)
///
/// | n | Font | Size |
/// |---|------|------|
/// | 0 | A | 12×24 |
/// | 1 | B | 9×24 |
/// | 2 | C | 9×17 |
/// | 3 | D | 8×16 |
/// | 4 | E | 16×16 |
///
/// Fonts C-E are undocumented extras of the S1.06 firmware and only carry
/// usable glyphs for characters 0-127.
#[inline]
pub fn select_font(font: u8) -> Vec<u8> {
    vec![ESC, b'M', font, TERM]
}

/// # Set Character Size (GS ! n TERM)
///
/// High nibble = width magnification, low nibble = height magnification
/// (0 = normal, 1 = double).
#[inline]
pub fn char_size(n: u8) -> Vec<u8> {
    vec![GS, b'!', n, TERM]
}

/// # Set Line Height (ESC 3 n)
///
/// Total dot rows advanced per line feed. The printer does not add the
/// current character height, so this is closer to "line pitch" than
/// "inter-line spacing". Default is 30 (24-dot text plus 6 dots).
#[inline]
pub fn line_height(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// Set justification (ESC a n): 0 = left, 1 = center, 2 = right.
#[inline]
pub fn justify(n: u8) -> Vec<u8> {
    vec![ESC, b'a', n]
}

/// Set underline weight (ESC - n): 0 = off, 1 = normal, 2 = thick.
#[inline]
pub fn underline(weight: u8) -> Vec<u8> {
    vec![ESC, b'-', weight]
}

/// Select character set for ASCII 0x23-0x7E (ESC R n).
#[inline]
pub fn charset(n: u8) -> Vec<u8> {
    vec![ESC, b'R', n]
}

/// Select code page for the upper range 0x80-0xFF (ESC t n).
#[inline]
pub fn code_page(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

/// Set inter-character spacing in dots (ESC SP n).
#[inline]
pub fn char_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b' ', n]
}

/// Direct inverse command for firmware ≥ 2.68 (GS B n).
/// Older firmware takes the inverse bit of [`print_mode`] instead.
#[inline]
pub fn inverse(on: bool) -> Vec<u8> {
    vec![GS, b'B', on as u8]
}

/// Direct upside-down command for firmware ≥ 2.68 (ESC { n).
#[inline]
pub fn upside_down(on: bool) -> Vec<u8> {
    vec![ESC, b'{', on as u8]
}

// ============================================================================
// PAPER MOVEMENT
// ============================================================================

/// Feed `n` text lines (ESC d n). Firmware ≥ 2.64; older firmware feeds
/// excess lines and must be driven with raw newlines instead.
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// Feed `n` individual dot rows (ESC J n).
#[inline]
pub fn feed_rows(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

// ============================================================================
// HEAT AND DENSITY
// ============================================================================

/// # Heat Configuration (ESC 7 n1 n2 n3)
///
/// | Param | Meaning | Units |
/// |-------|---------|-------|
/// | n1 | max simultaneous heating dots | 8 dots, minus 1 |
/// | n2 | heating time | 10 µs |
/// | n3 | heating interval | 10 µs |
///
/// More heating dots means more peak current but faster printing; more
/// heating time means darker print but slower printing and possible paper
/// stiction; more interval means clearer print but slower printing.
#[inline]
pub fn heat_config(dots: u8, time: u8, interval: u8) -> Vec<u8> {
    vec![ESC, b'7', dots, time, interval]
}

/// # Print Density (DC2 # n)
///
/// Density steps 5% up from a 50% base, break time steps 250 µs. The
/// argument packs `(density << 5) | break_time`; density values above 7
/// wrap, as the hardware only honors the low byte.
#[inline]
pub fn print_density(density: u8, break_time: u8) -> Vec<u8> {
    vec![DC2, b'#', (density << 5) | break_time]
}

// ============================================================================
// BITMAPS
// ============================================================================

/// # Bitmap Chunk Header (DC2 * h w)
///
/// Announces `rows` rows of `row_bytes` bytes of 1-bpp raster data to
/// follow, MSB = leftmost dot. `row_bytes` may not exceed 48 (384 dots).
#[inline]
pub fn bitmap_chunk(rows: u8, row_bytes: u8) -> Vec<u8> {
    vec![DC2, b'*', rows, row_bytes]
}

// ============================================================================
// BARCODES
// ============================================================================

/// Set barcode height in dots (GS h n).
#[inline]
pub fn barcode_height(n: u8) -> Vec<u8> {
    vec![GS, b'h', n]
}

/// Set barcode label position (GS H n): 2 prints the text below the bars.
#[inline]
pub fn barcode_label_position(n: u8) -> Vec<u8> {
    vec![GS, b'H', n]
}

/// Set barcode module width (GS w n): 3 gives 0.375 mm thin / 1.0 mm thick.
#[inline]
pub fn barcode_width(n: u8) -> Vec<u8> {
    vec![GS, b'w', n]
}

/// Select barcode symbology (GS k n). The payload follows, either
/// length-prefixed (new firmware) or NUL-terminated (old firmware).
#[inline]
pub fn barcode_type(code: u8) -> Vec<u8> {
    vec![GS, b'k', code]
}

// ============================================================================
// USER-DEFINED CHARACTERS
// ============================================================================

/// # Define User Characters Header (ESC & 3 from to)
///
/// Declares glyph definitions for code points `from..=to`. Each glyph in
/// the payload that follows is its own width byte plus `width × 3` bytes
/// of column-major pixel data (24-dot glyph height = 3 vertical bytes).
#[inline]
pub fn define_user_chars(from: u8, to: u8) -> Vec<u8> {
    vec![ESC, b'&', 3, from, to]
}

/// Clear one user-defined code point, reverting it to the built-in font
/// (ESC ? n).
#[inline]
pub fn clear_user_char(code: u8) -> Vec<u8> {
    vec![ESC, b'?', code]
}

/// Switch rendering between the user-defined table and the built-in font
/// (ESC % n). Does not alter any stored glyph data.
#[inline]
pub fn user_char_set(on: bool) -> Vec<u8> {
    vec![ESC, b'%', on as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_tab_stops() {
        assert_eq!(tab_stops(), vec![0x1B, 0x44, 4, 8, 12, 16, 20, 24, 28, 0]);
    }

    #[test]
    fn test_online_offline() {
        assert_eq!(set_online(true), vec![0x1B, 0x3D, 1]);
        assert_eq!(set_online(false), vec![0x1B, 0x3D, 0]);
    }

    #[test]
    fn test_sleep_after_splits_le() {
        assert_eq!(sleep_after(300), vec![0x1B, 0x38, 44, 1]);
        assert_eq!(sleep_after_short(5), vec![0x1B, 0x38, 5]);
    }

    #[test]
    fn test_status_request() {
        assert_eq!(status_request(4), vec![0x10, 0x04, 4]);
    }

    #[test]
    fn test_print_mode() {
        assert_eq!(print_mode(0b0000_1000), vec![0x1B, 0x21, 8]);
    }

    #[test]
    fn test_font_and_size_carry_terminator() {
        assert_eq!(select_font(1), vec![0x1B, 0x4D, 1, 12]);
        assert_eq!(char_size(0x11), vec![0x1D, 0x21, 0x11, 12]);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(line_height(30), vec![0x1B, 0x33, 30]);
    }

    #[test]
    fn test_justify() {
        assert_eq!(justify(1), vec![0x1B, 0x61, 1]);
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline(2), vec![0x1B, 0x2D, 2]);
    }

    #[test]
    fn test_inverse_and_upside_down() {
        assert_eq!(inverse(true), vec![0x1D, 0x42, 1]);
        assert_eq!(upside_down(false), vec![0x1B, 0x7B, 0]);
    }

    #[test]
    fn test_feeds() {
        assert_eq!(feed_lines(2), vec![0x1B, 0x64, 2]);
        assert_eq!(feed_rows(10), vec![0x1B, 0x4A, 10]);
    }

    #[test]
    fn test_heat_config() {
        assert_eq!(heat_config(11, 120, 40), vec![0x1B, 0x37, 11, 120, 40]);
    }

    #[test]
    fn test_print_density_packs_bits() {
        assert_eq!(print_density(10, 2), vec![0x12, 0x23, (10 << 5) | 2]);
    }

    #[test]
    fn test_bitmap_chunk() {
        assert_eq!(bitmap_chunk(5, 48), vec![0x12, 0x2A, 5, 48]);
    }

    #[test]
    fn test_barcode_commands() {
        assert_eq!(barcode_height(50), vec![0x1D, 0x68, 50]);
        assert_eq!(barcode_label_position(2), vec![0x1D, 0x48, 2]);
        assert_eq!(barcode_width(3), vec![0x1D, 0x77, 3]);
        assert_eq!(barcode_type(73), vec![0x1D, 0x6B, 73]);
    }

    #[test]
    fn test_user_chars() {
        assert_eq!(define_user_chars(32, 35), vec![0x1B, 0x26, 3, 32, 35]);
        assert_eq!(clear_user_char(64), vec![0x1B, 0x3F, 64]);
        assert_eq!(user_char_set(true), vec![0x1B, 0x25, 1]);
    }

    #[test]
    fn test_dtr_handshake() {
        assert_eq!(dtr_handshake(), vec![0x1D, 0x61, 0x20]);
    }

    #[test]
    fn test_misc() {
        assert_eq!(cancel_kanji(), vec![0x1C, 0x2E]);
        assert_eq!(test_page(), vec![0x12, 0x54]);
        assert_eq!(charset(15), vec![0x1B, 0x52, 15]);
        assert_eq!(code_page(47), vec![0x1B, 0x74, 47]);
        assert_eq!(char_spacing(4), vec![0x1B, 0x20, 4]);
    }
}
