//! Cycle-accurate capture and decoding of the generated waveform.
//!
//! [`WaveformRecorder`] implements [`OutputBus`] by bookkeeping instead of
//! register writes: it advances a cycle clock by the documented cost of
//! every operation and stores each line transition with its completion
//! cycle. The decoder reverses the wire protocol, classifying high pulses
//! against the timing budgets and checking that consecutive bits sit
//! exactly one period apart. That is what makes the timing properties of
//! the engine testable on a host, without hardware or measurements.
//!
//! One recorder is meant to capture one frame.

use heapless::Vec;
use smart_leds_trait::RGB8;
use snafu::prelude::*;

use crate::bus::OutputBus;
use crate::timing::{ClockTiming, WRITE_CYCLES};

/// A recorded line transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Cycle at which the write producing this transition completed.
    pub cycle: u64,
    /// The lane whose line changed.
    pub lane: u8,
    /// New level of the line.
    pub high: bool,
}

/// Errors of [`WaveformRecorder::decode_lane`].
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The recorder ran out of edge capacity; the capture is incomplete.
    Saturated,
    /// A high pulse matches neither the 0- nor the 1-bit duration.
    #[snafu(display("unrecognized pulse of {width} cycles ending at cycle {cycle}"))]
    UnrecognizedPulse {
        /// Cycle of the falling edge.
        cycle: u64,
        /// Measured high duration.
        width: u64,
    },
    /// Two consecutive bits are not exactly one period apart.
    #[snafu(display("bit starting at cycle {cycle} follows its predecessor by {spacing} cycles"))]
    PeriodDrift {
        /// Cycle of the offending rising edge.
        cycle: u64,
        /// Measured rise-to-rise spacing.
        spacing: u64,
    },
    /// The line was still high when the capture ended.
    UnterminatedPulse,
    /// The capture ended in the middle of a color.
    TruncatedColor {
        /// Number of bits decoded.
        bits: usize,
    },
    /// The output buffer cannot hold all decoded colors.
    OutputTooSmall {
        /// Capacity of the buffer passed in.
        capacity: usize,
    },
}

/// An [`OutputBus`] that records the waveform instead of driving pins.
///
/// `LANES` is the number of lines captured, `CAP` the edge capacity.
#[derive(Debug, Clone)]
pub struct WaveformRecorder<const LANES: usize, const CAP: usize> {
    clock: u64,
    level: [bool; LANES],
    edges: Vec<Edge, CAP>,
    saturated: bool,
}

impl<const LANES: usize, const CAP: usize> WaveformRecorder<LANES, CAP> {
    /// Creates a recorder with all lines low at cycle zero.
    pub fn new() -> Self {
        Self {
            clock: 0,
            level: [false; LANES],
            edges: Vec::new(),
            saturated: false,
        }
    }

    /// Total cycles consumed so far.
    pub fn cycles(&self) -> u64 {
        self.clock
    }

    /// All recorded transitions, in order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether transitions were lost to the capacity limit.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Cycles all lines have continuously spent low at the end of the
    /// capture; zero while any line is still high.
    ///
    /// A frame is latched once this reaches the reset budget.
    pub fn trailing_low(&self) -> u64 {
        if self.level.iter().any(|&high| high) {
            return 0;
        }
        let last = self.edges.last().map_or(0, |edge| edge.cycle);
        self.clock - last
    }

    /// Recovers lane `lane`'s colors from the capture.
    ///
    /// Verifies the wire protocol on the way: every high pulse must match
    /// one of clock `C`'s two bit budgets exactly, and consecutive bits
    /// must be exactly one period apart. Returns the number of colors
    /// written to `out`.
    pub fn decode_lane<C: ClockTiming>(
        &self,
        lane: usize,
        out: &mut [RGB8],
    ) -> Result<usize, DecodeError> {
        ensure!(!self.saturated, SaturatedSnafu);

        let budget = C::BUDGET;
        let mut bits = 0;
        let mut byte = 0u8;
        let mut color = [0u8; 3];
        let mut colors = 0;
        let mut rise = None;
        let mut prev_rise = None;

        for edge in self.edges.iter().filter(|e| usize::from(e.lane) == lane) {
            if edge.high {
                if let Some(prev) = prev_rise {
                    let spacing = edge.cycle - prev;
                    ensure!(
                        spacing == u64::from(budget.period),
                        PeriodDriftSnafu {
                            cycle: edge.cycle,
                            spacing,
                        }
                    );
                }
                prev_rise = Some(edge.cycle);
                rise = Some(edge.cycle);
            } else {
                let Some(risen) = rise.take() else { continue };
                let width = edge.cycle - risen;
                let bit = if width == u64::from(budget.zero_high) {
                    0
                } else if width == u64::from(budget.one_high) {
                    1
                } else {
                    return UnrecognizedPulseSnafu {
                        cycle: edge.cycle,
                        width,
                    }
                    .fail();
                };

                byte = (byte << 1) | bit;
                bits += 1;
                if bits % 8 == 0 {
                    color[(bits / 8 - 1) % 3] = byte;
                    byte = 0;
                    if bits % 24 == 0 {
                        ensure!(
                            colors < out.len(),
                            OutputTooSmallSnafu {
                                capacity: out.len(),
                            }
                        );
                        out[colors] = RGB8::new(color[0], color[1], color[2]);
                        colors += 1;
                    }
                }
            }
        }

        ensure!(rise.is_none(), UnterminatedPulseSnafu);
        ensure!(bits % 24 == 0, TruncatedColorSnafu { bits });
        Ok(colors)
    }

    fn record(&mut self, lane: usize, high: bool) {
        self.clock += u64::from(WRITE_CYCLES);
        if self.level[lane] != high {
            self.level[lane] = high;
            let edge = Edge {
                cycle: self.clock,
                lane: lane as u8,
                high,
            };
            if self.edges.push(edge).is_err() {
                self.saturated = true;
            }
        }
    }
}

impl<const LANES: usize, const CAP: usize> Default for WaveformRecorder<LANES, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LANES: usize, const CAP: usize> OutputBus for WaveformRecorder<LANES, CAP> {
    fn drive_high(&mut self, lane: usize) {
        self.record(lane, true);
    }

    fn drive_low(&mut self, lane: usize) {
        self.record(lane, false);
    }

    fn pad(&mut self, cycles: u32) {
        self.clock += u64::from(cycles);
    }
}
