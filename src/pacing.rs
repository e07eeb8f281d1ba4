//! # Output Pacing
//!
//! There is no flow control between the host and the printer in the
//! common two-wire hookup, so the driver must take care never to overrun
//! the printer's 256-byte receive buffer. Serial output is throttled from
//! an estimate of the device's print and feed rates, which are slow,
//! being bound to moving parts and physical reality.
//!
//! After an operation is issued (say, a bitmap chunk), a deadline is set
//! before which no further bytes will be sent. The wait is cooperative:
//! [`Pacer::wait_ready`] yields to the async runtime on every poll, so the
//! host can keep decoding the next image or serving other tasks while the
//! printer physically catches up.
//!
//! ## Two Strategies
//!
//! - **Deadline** (default): `set_busy_for(d)` stores `now + d`;
//!   `wait_ready` spins (yielding) until the deadline passes. The store
//!   overwrites rather than accumulates: every write path waits for the
//!   previous deadline *before* transmitting, so by the time a new one is
//!   set the old one has necessarily elapsed.
//! - **Ready line**: printers wired with their DTR line to a host input
//!   report busy/ready directly. `set_busy_for` becomes a no-op and
//!   `wait_ready` polls the line, which is ground truth.
//!
//! The strategy is fixed when [`crate::printer::Printer::begin`] runs and
//! never changes afterwards; the encoder above is oblivious to which one
//! is active.
//!
//! ## Clock Rollover
//!
//! Deadlines live in a wrapping 32-bit microsecond counter (about 71
//! minutes per lap). The busy test is `now.wrapping_sub(deadline)` cast
//! to `i32`, which stays correct across the wrap as long as estimates are
//! under half a lap; the longest real operation is a few seconds.

use std::time::Instant;

use tokio::task::yield_now;

/// Monotonic microsecond counter. Values wrap at `u32::MAX`; consumers
/// must compare with wrapping arithmetic.
pub trait Clock: Send {
    fn micros(&self) -> u32;
}

/// Default clock over [`std::time::Instant`].
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn micros(&self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }
}

/// Digital input carrying the printer's DTR ready/busy level.
///
/// The line idles low ("ready") and is driven high while the printer is
/// occupied. Note the printer side is 5 V on most units.
pub trait ReadyLine: Send {
    fn is_busy(&mut self) -> bool;
}

enum Strategy {
    /// Estimated completion deadline in wrapped clock microseconds.
    Deadline { resume_at: u32 },
    /// Hardware handshake; the line is ground truth.
    ReadyLine(Box<dyn ReadyLine>),
}

/// Gatekeeper for the serial channel: every byte written to the printer
/// is preceded by [`wait_ready`](Pacer::wait_ready) and followed by
/// [`set_busy_for`](Pacer::set_busy_for).
pub struct Pacer {
    clock: Box<dyn Clock>,
    strategy: Strategy,
    last_estimate: u32,
}

impl Pacer {
    /// Deadline-mode pacer over the default monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    /// Deadline-mode pacer over a caller-supplied clock.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let resume_at = clock.micros();
        Self {
            clock,
            strategy: Strategy::Deadline { resume_at },
            last_estimate: 0,
        }
    }

    /// Switch to ready-line pacing. Called once during session bring-up,
    /// after the printer has acknowledged the handshake configuration.
    pub fn attach_ready_line(&mut self, line: Box<dyn ReadyLine>) {
        self.strategy = Strategy::ReadyLine(line);
    }

    /// Whether the hardware handshake is active.
    pub fn uses_ready_line(&self) -> bool {
        matches!(self.strategy, Strategy::ReadyLine(_))
    }

    /// Record that the bytes just issued will occupy the device for
    /// `duration_micros`. Overwrites any previous estimate; no-op in
    /// ready-line mode.
    pub fn set_busy_for(&mut self, duration_micros: u32) {
        self.last_estimate = duration_micros;
        if let Strategy::Deadline { resume_at } = &mut self.strategy {
            *resume_at = self.clock.micros().wrapping_add(duration_micros);
        }
    }

    /// The duration attached to the most recent estimate. Recorded in
    /// both strategies (the ready-line strategy ignores it for pacing);
    /// useful for diagnostics and for asserting timing math in tests.
    pub fn last_estimate_micros(&self) -> u32 {
        self.last_estimate
    }

    /// Drop any pending estimate, treating the device as ready now.
    /// Used on wake, where the sleep state invalidates prior estimates.
    pub fn clear(&mut self) {
        self.set_busy_for(0);
    }

    /// Wait (cooperatively) until the device can accept more bytes.
    pub async fn wait_ready(&mut self) {
        match &mut self.strategy {
            Strategy::ReadyLine(line) => {
                while line.is_busy() {
                    yield_now().await;
                }
            }
            Strategy::Deadline { resume_at } => {
                // The cast makes the comparison rollover-proof.
                while (self.clock.micros().wrapping_sub(*resume_at) as i32) < 0 {
                    yield_now().await;
                }
            }
        }
    }

    /// Microseconds until the current estimate elapses; 0 when ready or
    /// in ready-line mode.
    pub fn busy_micros(&self) -> u32 {
        match &self.strategy {
            Strategy::ReadyLine(_) => 0,
            Strategy::Deadline { resume_at } => {
                let remaining = resume_at.wrapping_sub(self.clock.micros()) as i32;
                remaining.max(0) as u32
            }
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}
