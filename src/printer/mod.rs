//! # Printer Session
//!
//! [`Printer`] owns the transport for the lifetime of a session with one
//! physical printer and is the only component allowed to write to it.
//! Every operation goes through the same discipline:
//!
//! 1. wait until the pacer says the device can take more bytes,
//! 2. transmit the command bytes,
//! 3. hand the pacer an estimate of how long the operation will occupy
//!    the mechanism.
//!
//! The session also tracks the state the byte protocol leaves implicit:
//! the style bitmask, the active font and its cell size, the text cursor
//! column (for wrap timing), and the previously written byte (blank lines
//! feed faster than printed ones).
//!
//! Sessions are single-owner: state is plain mutable data, not
//! synchronized, and one `Printer` must not be driven from two tasks at
//! once. Multiple printers are simply multiple sessions.
//!
//! ## Bring-up
//!
//! ```no_run
//! use brasa::printer::{Printer, PrinterConfig};
//! use brasa::transport::SerialTransport;
//!
//! # async fn run() -> Result<(), brasa::BrasaError> {
//! let transport = SerialTransport::open("/dev/ttyUSB0", 19200)?;
//! let mut printer = Printer::new(transport, PrinterConfig::MINI);
//! printer.begin(268).await?; // firmware version from the self-test page
//! printer.set_default().await?;
//! printer.println("ready.").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::{Capabilities, PrinterConfig};

use std::io::Read;
use std::time::Duration;

use crate::error::BrasaError;
use crate::pacing::{Clock, Pacer, ReadyLine};
use crate::protocol::commands::{self, LF, NUL, WAKE};
use crate::protocol::{Alignment, Barcode, Font, PrintMode, TextSize};
use crate::transport::Transport;

/// Default time for the paper to advance one dot row while printing, µs.
/// Empirical; see [`Printer::set_times`].
const DOT_PRINT_TIME: u32 = 30_000;

/// Default time for the paper to advance one dot row while feeding, µs.
const DOT_FEED_TIME: u32 = 2_100;

/// Status reads poll up to this many times before giving up.
const STATUS_RETRIES: u32 = 10;

/// Delay between status read attempts.
const STATUS_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Settle delay after the wake byte on firmware that needs an explicit
/// sleep cancel.
const WAKE_SETTLE: Duration = Duration::from_millis(50);

/// Thermal head heating parameters, applied with `ESC 7`.
///
/// Defaults raise the simultaneous-dot ceiling to a quarter of the head
/// (faster) and stretch heating time slightly to compensate, with the
/// interval throttled back for a 2 A supply.
#[derive(Debug, Clone, Copy)]
pub struct HeatConfig {
    /// Max simultaneous heating dots, in units of 8 dots minus 1
    pub dots: u8,
    /// Heating time in 10 µs units; longer = darker but slower
    pub time: u8,
    /// Recovery interval in 10 µs units; longer = clearer but slower
    pub interval: u8,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            dots: 11,
            time: 120,
            interval: 40,
        }
    }
}

/// Selector for the real-time status request (`DLE EOT n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPage {
    /// Online/offline indicator
    Printer = 1,
    /// Offline cause (cover open)
    OfflineCause = 2,
    /// Error cause (heat/voltage out of range)
    ErrorCause = 3,
    /// Paper roll sensor
    PaperSensor = 4,
}

/// Page-4 bits that are both set when the paper roll is out.
const PAPER_OUT_BITS: u8 = 0b0110_0000;

/// Session with one physical printer.
pub struct Printer<T: Transport> {
    transport: T,
    config: PrinterConfig,
    pacer: Pacer,
    /// Parked here until `begin` confirms the handshake with the printer.
    pending_ready_line: Option<Box<dyn ReadyLine>>,
    caps: Capabilities,
    byte_time: u32,

    print_mode: PrintMode,
    font: Font,
    char_width: u8,
    char_height: u8,
    column: u8,
    max_column: u8,
    prev_byte: u8,
    line_spacing: u8,
    auto_line_height: bool,
    barcode_height: u8,
    dot_print_time: u32,
    dot_feed_time: u32,
    max_chunk_height: u8,
}

impl<T: Transport> Printer<T> {
    /// New session paced by completion-time estimates.
    pub fn new(transport: T, config: PrinterConfig) -> Self {
        Self::with_pacer(transport, config, Pacer::new())
    }

    /// New session with a caller-supplied clock behind the pacer.
    pub fn with_clock(transport: T, config: PrinterConfig, clock: Box<dyn Clock>) -> Self {
        Self::with_pacer(transport, config, Pacer::with_clock(clock))
    }

    fn with_pacer(transport: T, config: PrinterConfig, pacer: Pacer) -> Self {
        Self {
            transport,
            byte_time: config.byte_time_micros(),
            config,
            pacer,
            pending_ready_line: None,
            caps: Capabilities::for_firmware(268),
            print_mode: PrintMode::empty(),
            font: Font::A,
            char_width: 12,
            char_height: 24,
            column: 0,
            max_column: 32,
            prev_byte: LF,
            line_spacing: 6,
            auto_line_height: true,
            barcode_height: 50,
            dot_print_time: DOT_PRINT_TIME,
            dot_feed_time: DOT_FEED_TIME,
            max_chunk_height: 255,
        }
    }

    /// Wire up the printer's DTR ready/busy line. Takes effect at
    /// [`begin`](Self::begin), which tells the printer to drive the line;
    /// from then on pacing follows the hardware instead of estimates.
    pub fn ready_line(mut self, line: Box<dyn ReadyLine>) -> Self {
        self.pending_ready_line = Some(line);
        self
    }

    // === Session lifecycle ===

    /// Wake and initialize the printer. `firmware` is the version from
    /// the self-test page with the dot removed (2.68 → 268); it selects
    /// the command encodings for the whole session.
    pub async fn begin(&mut self, firmware: u16) -> Result<(), BrasaError> {
        self.caps = Capabilities::for_firmware(firmware);

        // The printer can't receive data immediately on power-up; allow
        // half a second of cold-boot time before the first bytes.
        self.pacer.set_busy_for(500_000);

        self.wake().await?;
        self.reset().await?;
        self.set_heat_config(HeatConfig::default()).await?;

        if let Some(line) = self.pending_ready_line.take() {
            self.write_cmd(&commands::dtr_handshake()).await?;
            self.pacer.attach_ready_line(line);
        }

        self.dot_print_time = DOT_PRINT_TIME;
        self.dot_feed_time = DOT_FEED_TIME;
        self.max_chunk_height = 255;

        tracing::debug!(
            firmware,
            ready_line = self.pacer.uses_ready_line(),
            model = self.config.name,
            "printer session started"
        );
        Ok(())
    }

    /// Reset the printer to firmware defaults and re-seed the driver's
    /// cursor and spacing state to match.
    pub async fn reset(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::init()).await?;
        self.prev_byte = LF; // as if the prior line were blank
        self.column = 0;
        self.max_column = 32;
        self.char_height = 24;
        self.line_spacing = 6;
        self.barcode_height = 50;

        if self.caps.tab_stops {
            self.write_cmd(&commands::tab_stops()).await?;
        }
        Ok(())
    }

    /// Restore default formatting without re-waking the hardware.
    pub async fn set_default(&mut self) -> Result<(), BrasaError> {
        self.online().await?;
        self.justify(Alignment::Left).await?;
        self.inverse_off().await?;
        self.double_height_off().await?;
        self.set_line_height(30).await?;
        self.bold_off().await?;
        self.underline_off().await?;
        self.auto_line_height = true;
        self.set_barcode_height(50).await?;
        self.font = Font::A;
        self.set_size(TextSize::Small).await?;
        self.set_charset(0).await?;
        self.set_code_page(0).await?;
        self.cancel_kanji_mode().await?;
        Ok(())
    }

    /// Take the printer offline; everything but a subsequent
    /// [`online`](Self::online) is ignored until then.
    pub async fn offline(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::set_online(false)).await
    }

    /// Take the printer back online.
    pub async fn online(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::set_online(true)).await
    }

    /// Low-energy state, effectively immediately.
    pub async fn sleep(&mut self) -> Result<(), BrasaError> {
        self.sleep_after(1).await // 0 means "don't sleep"
    }

    /// Low-energy state after `seconds` of inactivity. Old firmware only
    /// takes a one-byte timer; larger values clamp to 255 there.
    pub async fn sleep_after(&mut self, seconds: u16) -> Result<(), BrasaError> {
        if self.caps.wide_sleep_timer {
            self.write_cmd(&commands::sleep_after(seconds)).await
        } else {
            self.write_cmd(&commands::sleep_after_short(seconds.min(255) as u8))
                .await
        }
    }

    /// Wake from the low-energy state.
    pub async fn wake(&mut self) -> Result<(), BrasaError> {
        self.pacer.clear(); // sleep invalidates any pending estimate
        self.write_cmd(&[WAKE]).await?;

        if self.caps.sleep_cancel_on_wake {
            // Omitting the explicit cancel leaves the device asleep.
            tokio::time::sleep(WAKE_SETTLE).await;
            self.write_cmd(&commands::sleep_after(0)).await?;
        } else {
            // The datasheet's 50 ms settle alone is not sufficient on old
            // firmware; a burst of no-ops with short pacing gaps is.
            for _ in 0..10 {
                self.write_cmd(&[NUL]).await?;
                self.pacer.set_busy_for(10_000);
            }
        }
        tracing::debug!("printer awake");
        Ok(())
    }

    // === Text ===

    /// Emit one logical text byte through the paced wrap-tracking path.
    ///
    /// Carriage returns are dropped without touching the wire or the
    /// pacing state. A newline, or a printable byte that fills the line,
    /// charges the estimate for the physical line feed: a blank line
    /// (newline after newline) only feeds, a printed line pays head time
    /// for the glyph rows plus feed time for the spacing rows.
    pub async fn write_byte(&mut self, byte: u8) -> Result<(), BrasaError> {
        if byte == commands::CR {
            return Ok(());
        }

        self.pacer.wait_ready().await;
        self.transport.write_all(&[byte]).await?;

        let mut duration = self.byte_time;
        let mut effective = byte;

        let wrapped = if byte == LF {
            true
        } else {
            self.column += 1;
            self.column >= self.max_column
        };

        if wrapped {
            duration += if self.prev_byte == LF {
                (self.char_height as u32 + self.line_spacing as u32) * self.dot_feed_time
            } else {
                self.char_height as u32 * self.dot_print_time
                    + self.line_spacing as u32 * self.dot_feed_time
            };
            self.column = 0;
            effective = LF; // a wrap behaves like a newline on the next byte
        }

        self.pacer.set_busy_for(duration);
        self.prev_byte = effective;
        Ok(())
    }

    /// Print a string (no trailing newline).
    pub async fn print(&mut self, text: &str) -> Result<(), BrasaError> {
        for byte in text.bytes() {
            self.write_byte(byte).await?;
        }
        Ok(())
    }

    /// Print a string followed by a newline.
    pub async fn println(&mut self, text: &str) -> Result<(), BrasaError> {
        self.print(text).await?;
        self.write_byte(LF).await
    }

    /// Advance to the next tab stop.
    pub async fn tab(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&[commands::TAB]).await?;
        self.column = (self.column + 4) & !3;
        if self.column >= self.max_column {
            self.column = 0;
        }
        Ok(())
    }

    /// Print whatever is in the line buffer without feeding.
    pub async fn flush(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&[commands::FF]).await
    }

    // === Paper movement ===

    /// Feed `lines` text lines. Old firmware has no feed command and
    /// overshoots when given one, so it is driven with raw newlines.
    pub async fn feed(&mut self, lines: u8) -> Result<(), BrasaError> {
        if self.caps.feed_command {
            self.write_cmd(&commands::feed_lines(lines)).await?;
            self.pacer
                .set_busy_for(self.dot_feed_time * self.char_height as u32);
            self.prev_byte = LF;
            self.column = 0;
        } else {
            for _ in 0..lines {
                self.write_byte(LF).await?;
            }
        }
        Ok(())
    }

    /// Feed by individual dot rows.
    pub async fn feed_rows(&mut self, rows: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::feed_rows(rows)).await?;
        self.pacer.set_busy_for(rows as u32 * self.dot_feed_time);
        self.prev_byte = LF;
        self.column = 0;
        Ok(())
    }

    // === Style toggles ===

    pub async fn bold_on(&mut self) -> Result<(), BrasaError> {
        self.set_print_mode(PrintMode::BOLD).await
    }

    pub async fn bold_off(&mut self) -> Result<(), BrasaError> {
        self.unset_print_mode(PrintMode::BOLD).await
    }

    pub async fn double_height_on(&mut self) -> Result<(), BrasaError> {
        self.set_print_mode(PrintMode::DOUBLE_HEIGHT).await
    }

    pub async fn double_height_off(&mut self) -> Result<(), BrasaError> {
        self.unset_print_mode(PrintMode::DOUBLE_HEIGHT).await
    }

    pub async fn double_width_on(&mut self) -> Result<(), BrasaError> {
        self.set_print_mode(PrintMode::DOUBLE_WIDTH).await
    }

    pub async fn double_width_off(&mut self) -> Result<(), BrasaError> {
        self.unset_print_mode(PrintMode::DOUBLE_WIDTH).await
    }

    pub async fn strike_on(&mut self) -> Result<(), BrasaError> {
        self.set_print_mode(PrintMode::STRIKE).await
    }

    pub async fn strike_off(&mut self) -> Result<(), BrasaError> {
        self.unset_print_mode(PrintMode::STRIKE).await
    }

    /// White-on-black printing. Firmware ≥ 2.68 dropped the print-mode
    /// bit in favor of a direct command.
    pub async fn inverse_on(&mut self) -> Result<(), BrasaError> {
        if self.caps.direct_inverse {
            self.write_cmd(&commands::inverse(true)).await
        } else {
            self.set_print_mode(PrintMode::INVERSE).await
        }
    }

    pub async fn inverse_off(&mut self) -> Result<(), BrasaError> {
        if self.caps.direct_inverse {
            self.write_cmd(&commands::inverse(false)).await
        } else {
            self.unset_print_mode(PrintMode::INVERSE).await
        }
    }

    pub async fn upside_down_on(&mut self) -> Result<(), BrasaError> {
        if self.caps.direct_upside_down {
            self.write_cmd(&commands::upside_down(true)).await
        } else {
            self.set_print_mode(PrintMode::UPSIDE_DOWN).await
        }
    }

    pub async fn upside_down_off(&mut self) -> Result<(), BrasaError> {
        if self.caps.direct_upside_down {
            self.write_cmd(&commands::upside_down(false)).await
        } else {
            self.unset_print_mode(PrintMode::UPSIDE_DOWN).await
        }
    }

    /// Underline weight: 0 = off, 1 = normal, 2 = thick. Larger values
    /// clamp to 2.
    pub async fn underline_on(&mut self, weight: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::underline(weight.min(2))).await
    }

    pub async fn underline_off(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::underline(0)).await
    }

    /// Clear the whole style mask in one command.
    pub async fn normal(&mut self) -> Result<(), BrasaError> {
        self.print_mode = PrintMode::empty();
        self.write_print_mode().await?;
        self.adjust_char_values().await
    }

    /// Select the character font.
    pub async fn set_font(&mut self, font: Font) -> Result<(), BrasaError> {
        self.font = font;
        self.adjust_char_values().await
    }

    /// Convenience sizes via the double-height/width bits.
    pub async fn set_size(&mut self, size: TextSize) -> Result<(), BrasaError> {
        match size {
            TextSize::Small => {
                self.double_width_off().await?;
                self.double_height_off().await?;
            }
            TextSize::Medium => {
                self.double_height_on().await?;
                self.double_width_off().await?;
            }
            TextSize::Large => {
                self.double_height_on().await?;
                self.double_width_on().await?;
            }
        }
        Ok(())
    }

    pub async fn justify(&mut self, alignment: Alignment) -> Result<(), BrasaError> {
        self.write_cmd(&commands::justify(alignment as u8)).await
    }

    /// Set the total dot rows advanced per line feed. Values below 20
    /// clamp up; this also turns automatic line-height tracking off, so
    /// an explicit height survives later font changes.
    pub async fn set_line_height(&mut self, height: u8) -> Result<(), BrasaError> {
        self.auto_line_height_off().await?;
        let height = height.max(20);
        self.line_spacing = height - 20;
        self.write_cmd(&commands::line_height(height)).await
    }

    /// Re-derive line height from the font on every font/size change.
    pub async fn auto_line_height_on(&mut self) -> Result<(), BrasaError> {
        self.auto_line_height = true;
        self.adjust_char_values().await
    }

    pub async fn auto_line_height_off(&mut self) -> Result<(), BrasaError> {
        self.auto_line_height = false;
        self.adjust_char_values().await
    }

    /// Inter-character spacing in dots.
    pub async fn set_char_spacing(&mut self, spacing: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::char_spacing(spacing)).await
    }

    /// Character set for the ASCII range; indices above 15 clamp.
    pub async fn set_charset(&mut self, charset: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::charset(charset.min(15))).await
    }

    /// Code page for the upper range; indices above 47 clamp.
    pub async fn set_code_page(&mut self, page: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::code_page(page.min(47))).await
    }

    /// Disable Kanji rendering of the extended character range.
    pub async fn cancel_kanji_mode(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::cancel_kanji()).await
    }

    // === Bitmaps ===

    /// Print a 1-bpp row-major bitmap from memory. Rows are padded to
    /// byte boundaries; anything beyond the head's 48-byte row width is
    /// consumed but not transmitted.
    pub async fn print_bitmap(
        &mut self,
        width: u16,
        height: u16,
        data: &[u8],
    ) -> Result<(), BrasaError> {
        if width == 0 || height == 0 {
            return Ok(()); // nothing to print, nothing to pace
        }
        let row_bytes = (width as usize).div_ceil(8);
        let clipped = row_bytes.min(self.config.row_bytes() as usize);
        let limit = self.chunk_height_limit(clipped);

        debug_assert!(
            data.len() >= row_bytes * height as usize,
            "bitmap data too short: expected {} ({} bytes × {} rows), got {}",
            row_bytes * height as usize,
            row_bytes,
            height,
            data.len()
        );

        let mut index = 0;
        let mut row_start = 0;
        while row_start < height as usize {
            let chunk = (height as usize - row_start).min(limit);
            self.write_cmd(&commands::bitmap_chunk(chunk as u8, clipped as u8))
                .await?;

            for _ in 0..chunk {
                for _ in 0..clipped {
                    self.pacer.wait_ready().await;
                    self.transport.write_all(&[data[index]]).await?;
                    index += 1;
                }
                index += row_bytes - clipped;
            }
            self.pacer.set_busy_for(chunk as u32 * self.dot_print_time);
            row_start += chunk;

            tracing::trace!(rows = chunk, remaining = height as usize - row_start, "bitmap chunk sent");
        }
        self.prev_byte = LF;
        Ok(())
    }

    /// Print a bitmap streamed from a reader, for rasters too large to
    /// hold in memory. Trailing bytes of over-wide rows are drained from
    /// the reader to stay in sync, but not transmitted.
    pub async fn print_bitmap_from(
        &mut self,
        width: u16,
        height: u16,
        source: &mut impl Read,
    ) -> Result<(), BrasaError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let row_bytes = (width as usize).div_ceil(8);
        let clipped = row_bytes.min(self.config.row_bytes() as usize);
        let limit = self.chunk_height_limit(clipped);

        let mut byte = [0u8; 1];
        let mut row_start = 0;
        while row_start < height as usize {
            let chunk = (height as usize - row_start).min(limit);
            self.write_cmd(&commands::bitmap_chunk(chunk as u8, clipped as u8))
                .await?;

            for _ in 0..chunk {
                for _ in 0..clipped {
                    source.read_exact(&mut byte)?;
                    self.pacer.wait_ready().await;
                    self.transport.write_all(&byte).await?;
                }
                for _ in 0..row_bytes - clipped {
                    source.read_exact(&mut byte)?;
                }
            }
            self.pacer.set_busy_for(chunk as u32 * self.dot_print_time);
            row_start += chunk;
        }
        self.prev_byte = LF;
        Ok(())
    }

    /// Print a self-describing bitmap stream: a 4-byte header (width then
    /// height, little-endian u16 each) followed by row-major 1-bpp data.
    pub async fn print_bitmap_stream(&mut self, source: &mut impl Read) -> Result<(), BrasaError> {
        let mut header = [0u8; 4];
        source.read_exact(&mut header)?;
        let width = u16::from_le_bytes([header[0], header[1]]);
        let height = u16::from_le_bytes([header[2], header[3]]);
        self.print_bitmap_from(width, height, source).await
    }

    /// Rows per bitmap chunk: bounded by what fits in the printer's
    /// receive buffer, unless the ready line supplies ground truth.
    fn chunk_height_limit(&self, clipped_row_bytes: usize) -> usize {
        if self.pacer.uses_ready_line() {
            255 // buffer doesn't matter, handshake!
        } else {
            (self.config.buffer_bytes as usize / clipped_row_bytes)
                .min(self.max_chunk_height as usize)
                .max(1)
        }
    }

    /// Cap on rows per bitmap chunk, for tuning against units with
    /// shallower buffers than the stock 256 bytes.
    pub fn set_max_chunk_height(&mut self, rows: u8) {
        self.max_chunk_height = rows;
    }

    // === Barcodes ===

    /// Persisted bar height in dots for subsequent barcodes; minimum 1.
    pub async fn set_barcode_height(&mut self, height: u8) -> Result<(), BrasaError> {
        let height = height.max(1);
        self.barcode_height = height;
        self.write_cmd(&commands::barcode_height(height)).await
    }

    /// Print a firmware-rendered barcode with its label below. New
    /// firmware takes a length-prefixed payload (truncated to 255
    /// bytes), old firmware a NUL-terminated one.
    pub async fn print_barcode(&mut self, text: &str, kind: Barcode) -> Result<(), BrasaError> {
        self.feed(1).await?; // recent firmware can't print one without

        self.write_cmd(&commands::barcode_label_position(2)).await?;
        self.write_cmd(&commands::barcode_width(3)).await?;
        self.write_cmd(&commands::barcode_type(
            kind.wire_code(self.caps.modern_barcode),
        ))
        .await?;

        if self.caps.modern_barcode {
            let payload = &text.as_bytes()[..text.len().min(255)];
            self.write_cmd(&[payload.len() as u8]).await?;
            for &byte in payload {
                self.write_cmd(&[byte]).await?;
            }
        } else {
            for &byte in text.as_bytes() {
                self.write_cmd(&[byte]).await?;
            }
            self.write_cmd(&[0]).await?;
        }

        self.pacer
            .set_busy_for((self.barcode_height as u32 + 40) * self.dot_print_time);
        self.prev_byte = LF;
        Ok(())
    }

    // === User-defined characters ===

    /// Upload glyph definitions for code points `from..=to`. `data` is
    /// the raw payload: per glyph, a width byte followed by `width × 3`
    /// bytes of column-major pixels (glyphs are 24 dots tall). The caller
    /// is responsible for the payload matching the declared range.
    pub async fn define_user_characters(
        &mut self,
        from: u8,
        to: u8,
        data: &[u8],
    ) -> Result<(), BrasaError> {
        self.write_cmd(&commands::define_user_chars(from, to))
            .await?;
        for &byte in data {
            self.pacer.wait_ready().await;
            self.transport.write_all(&[byte]).await?;
        }
        Ok(())
    }

    /// Revert one code point to the built-in font.
    pub async fn clear_user_character(&mut self, code: u8) -> Result<(), BrasaError> {
        self.write_cmd(&commands::clear_user_char(code)).await
    }

    /// Render text from the user-defined table. Stored glyph data is
    /// untouched either way; only the lookup table changes.
    pub async fn user_character_set_on(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::user_char_set(true)).await
    }

    pub async fn user_character_set_off(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::user_char_set(false)).await
    }

    // === Status ===

    /// Request one status byte. Returns `None` when the printer does not
    /// answer within the retry budget: "cannot determine", which is not
    /// the same as any real status value.
    pub async fn status(&mut self, page: StatusPage) -> Result<Option<u8>, BrasaError> {
        // Sent without waiting on the pacing gate: with the cover open
        // and a ready line wired, the gate would never clear, and status
        // is exactly what one asks in that state. The estimate update
        // still happens.
        self.write_cmd_unpaced(&commands::status_request(page as u8))
            .await?;

        for attempt in 0..STATUS_RETRIES {
            if let Some(byte) = self.transport.read_byte().await? {
                tracing::trace!(?page, byte, attempt, "status response");
                return Ok(Some(byte));
            }
            tokio::time::sleep(STATUS_RETRY_DELAY).await;
        }
        tracing::debug!(?page, "no status response");
        Ok(None)
    }

    /// Whether the paper roll is present, from the page-4 sensor bits.
    /// An unanswered request reads as "no paper", the same answer the
    /// sensor gives with the cover open.
    pub async fn has_paper(&mut self) -> Result<bool, BrasaError> {
        let status = self
            .status(StatusPage::PaperSensor)
            .await?
            .unwrap_or(0xFF);
        Ok(status & PAPER_OUT_BITS != PAPER_OUT_BITS)
    }

    // === Tuning ===

    /// Heating parameters; see [`HeatConfig`].
    pub async fn set_heat_config(&mut self, heat: HeatConfig) -> Result<(), BrasaError> {
        self.write_cmd(&commands::heat_config(heat.dots, heat.time, heat.interval))
            .await
    }

    /// Print density and break time; see
    /// [`commands::print_density`].
    pub async fn set_print_density(
        &mut self,
        density: u8,
        break_time: u8,
    ) -> Result<(), BrasaError> {
        self.write_cmd(&commands::print_density(density, break_time))
            .await
    }

    /// Override the empirical per-dot-row print and feed times (µs).
    /// Supply voltage, paper stock and unit-to-unit variation all move
    /// these; tune to avoid excess delay without overrunning the buffer.
    pub fn set_times(&mut self, dot_print_micros: u32, dot_feed_micros: u32) {
        self.dot_print_time = dot_print_micros;
        self.dot_feed_time = dot_feed_micros;
    }

    /// Print the firmware's built-in test page.
    pub async fn test_page(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::test_page()).await?;
        // 26 text lines, each 24 dots printed and 6 fed, plus a blank.
        self.pacer.set_busy_for(
            self.dot_print_time * 24 * 26 + self.dot_feed_time * (6 * 26 + 30),
        );
        Ok(())
    }

    /// Quick host-side smoke test.
    pub async fn print_test(&mut self) -> Result<(), BrasaError> {
        self.println("Hello World!").await?;
        self.feed(2).await
    }

    // === Introspection ===

    /// Column capacity for the current font and size.
    pub fn max_column(&self) -> u8 {
        self.max_column
    }

    /// Current text cursor column.
    pub fn column(&self) -> u8 {
        self.column
    }

    /// Current character cell in dots, after size magnification.
    pub fn char_size(&self) -> (u8, u8) {
        (self.char_width, self.char_height)
    }

    /// Capabilities of the firmware reported to [`begin`](Self::begin).
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// The pacing controller (read-only).
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// The underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport, ending the session.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // === Internals ===

    /// Paced command write: wait for the gate, transmit, account for the
    /// serial time of the bytes themselves.
    async fn write_cmd(&mut self, bytes: &[u8]) -> Result<(), BrasaError> {
        self.pacer.wait_ready().await;
        self.transport.write_all(bytes).await?;
        self.pacer.set_busy_for(self.byte_time * bytes.len() as u32);
        Ok(())
    }

    /// Like [`write_cmd`](Self::write_cmd) but skipping the wait, for the
    /// status request only. Never use this for anything that prints.
    async fn write_cmd_unpaced(&mut self, bytes: &[u8]) -> Result<(), BrasaError> {
        self.transport.write_all(bytes).await?;
        self.pacer.set_busy_for(self.byte_time * bytes.len() as u32);
        Ok(())
    }

    async fn set_print_mode(&mut self, mask: PrintMode) -> Result<(), BrasaError> {
        self.print_mode |= mask;
        self.write_print_mode().await?;
        self.adjust_char_values().await
    }

    async fn unset_print_mode(&mut self, mask: PrintMode) -> Result<(), BrasaError> {
        self.print_mode &= !mask;
        self.write_print_mode().await?;
        self.adjust_char_values().await
    }

    async fn write_print_mode(&mut self) -> Result<(), BrasaError> {
        self.write_cmd(&commands::print_mode(self.print_mode.bits()))
            .await
    }

    /// Recompute character geometry and column capacity after any font
    /// or size change, and push the font/size selection to the device.
    /// Single source of truth for `max_column`.
    async fn adjust_char_values(&mut self) -> Result<(), BrasaError> {
        let (mut width, mut height) = self.font.metrics();
        if self.print_mode.contains(PrintMode::DOUBLE_WIDTH) {
            width *= 2;
        }
        if self.print_mode.contains(PrintMode::DOUBLE_HEIGHT) {
            height *= 2;
        }
        self.char_width = width;
        self.char_height = height;
        self.max_column = (self.config.head_width_dots / width as u16) as u8;

        self.write_cmd(&commands::select_font(self.font as u8))
            .await?;
        self.write_cmd(&commands::char_size(self.print_mode.size_byte()))
            .await?;

        if self.auto_line_height {
            let height = self.char_height.saturating_add(self.line_spacing);
            self.write_cmd(&commands::line_height(height)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Clock that leaps far forward on every read, so deadline waits
    /// always pass on the first poll.
    struct LeapClock(Arc<AtomicU32>);

    impl Clock for LeapClock {
        fn micros(&self) -> u32 {
            self.0.fetch_add(10_000_000, Ordering::SeqCst)
        }
    }

    fn test_printer() -> Printer<MockTransport> {
        Printer::with_clock(
            MockTransport::new(),
            PrinterConfig::MINI,
            Box::new(LeapClock(Arc::new(AtomicU32::new(0)))),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn chunk_height_limit_honors_buffer_and_ceiling() {
        let mut printer = test_printer();
        printer.begin(268).await.unwrap();

        // 256-byte buffer over 48-byte rows allows 5 rows per chunk.
        assert_eq!(printer.chunk_height_limit(48), 5);
        assert_eq!(printer.chunk_height_limit(1), 255);

        printer.set_max_chunk_height(3);
        assert_eq!(printer.chunk_height_limit(48), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn adjust_char_values_keeps_column_capacity_consistent() {
        let mut printer = test_printer();
        printer.begin(268).await.unwrap();

        printer.set_font(Font::B).await.unwrap();
        assert_eq!(printer.char_size(), (9, 24));
        assert_eq!(printer.max_column(), 42);

        printer.double_width_on().await.unwrap();
        assert_eq!(printer.char_size(), (18, 24));
        assert_eq!(printer.max_column(), 21);

        printer.double_height_on().await.unwrap();
        assert_eq!(printer.char_size(), (18, 48));
        assert_eq!(printer.max_column(), 21);

        printer.double_width_off().await.unwrap();
        printer.set_font(Font::A).await.unwrap();
        assert_eq!(printer.char_size(), (12, 48));
        assert_eq!(printer.max_column(), 32);
    }

    #[tokio::test(start_paused = true)]
    async fn old_firmware_feed_emulates_with_newlines() {
        let mut printer = test_printer();
        printer.begin(263).await.unwrap();
        printer.transport_mut().take_written();

        printer.feed(3).await.unwrap();
        assert_eq!(printer.transport_mut().take_written(), vec![LF, LF, LF]);
    }

    #[tokio::test(start_paused = true)]
    async fn old_firmware_wake_sends_nop_burst() {
        let mut printer = test_printer();
        printer.begin(263).await.unwrap();
        printer.transport_mut().take_written();

        printer.wake().await.unwrap();
        let written = printer.transport_mut().take_written();
        assert_eq!(written[0], WAKE);
        assert_eq!(&written[1..], &[NUL; 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn new_firmware_wake_cancels_sleep() {
        let mut printer = test_printer();
        printer.begin(268).await.unwrap();
        printer.transport_mut().take_written();

        printer.wake().await.unwrap();
        assert_eq!(
            printer.transport_mut().take_written(),
            vec![WAKE, 0x1B, 0x38, 0, 0]
        );
    }
}
