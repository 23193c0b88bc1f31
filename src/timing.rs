//! Per-clock cycle budgets governing bit encoding.
//!
//! Every duration the engine works with is expressed in processor cycles,
//! never in wall-clock units. The budgets are fixed at build time by
//! choosing one of the clock marker types below; a frequency without a
//! marker type simply cannot be named, so an unsupported configuration
//! fails to build instead of producing a malformed waveform.

use paste::paste;

/// Cycle cost of a single output-register write.
///
/// Matches the cost of an atomic bit set/clear instruction on the targets
/// this driver family originated on. Every [`OutputBus`](crate::OutputBus)
/// implementation must make its line writes take this long.
pub const WRITE_CYCLES: u32 = 2;

/// The cycle budgets for one clock frequency.
///
/// `zero_high < one_high < period` always holds, and `period` is the same
/// for 0- and 1-bits, so consecutive bits stay aligned to a fixed grid and
/// independent lanes never drift relative to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBudget {
    /// Cycles the line stays high for a 0-bit.
    pub zero_high: u32,
    /// Cycles the line stays high for a 1-bit.
    pub one_high: u32,
    /// Total cycles of one bit period, independent of the bit value.
    pub period: u32,
    /// Minimum cycles of continuous low that make the strip latch a frame.
    pub reset: u32,
}

/// A supported processor clock frequency.
///
/// Implemented by the marker types [`Mhz8`], [`Mhz16`] and [`Mhz20`].
pub trait ClockTiming {
    /// The clock frequency in Hertz.
    const HZ: u32;

    /// The cycle budgets at this frequency.
    const BUDGET: BitBudget;
}

/// A clock fast enough to interleave 2 or 3 lanes.
///
/// Concurrent lanes raise and drop their lines through one sequential
/// write stream; below 16 MHz the falling-edge writes cannot all be
/// serialized within the 0-bit high budget, so slower clocks do not
/// implement this and multi-lane drivers for them fail to build.
pub trait InterleaveTiming: ClockTiming {}

/// Converts a cycle count at clock `C` into nanoseconds (truncating).
pub const fn cycles_to_nanos<C: ClockTiming>(cycles: u32) -> u32 {
    ((cycles as u64 * 1_000_000_000) / C::HZ as u64) as u32
}

macro_rules! impl_clock {
    ($mhz:literal, $zero:literal, $one:literal, $period:literal, $reset:literal) => {
        paste! {
            #[doc = concat!("Marker type for a ", stringify!($mhz), " MHz processor clock.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct [<Mhz $mhz>];

            impl ClockTiming for [<Mhz $mhz>] {
                const HZ: u32 = $mhz * 1_000_000;
                const BUDGET: BitBudget = BitBudget {
                    zero_high: $zero,
                    one_high: $one,
                    period: $period,
                    reset: $reset,
                };
            }

            const _: () = {
                let b = [<Mhz $mhz>]::BUDGET;
                assert!(b.zero_high >= WRITE_CYCLES);
                assert!(b.zero_high < b.one_high);
                assert!(b.one_high < b.period);
                // The falling write of a 1-bit must complete inside the period.
                assert!(b.one_high + WRITE_CYCLES <= b.period);
                assert!(b.reset > b.period);
            };
        }
    };
}

// 375 ns / 875 ns / 2125 ns
impl_clock!(8, 3, 7, 17, 640);
// 375 ns / 812 ns / 1500 ns
impl_clock!(16, 6, 13, 24, 1280);
// 400 ns / 850 ns / 1300 ns
impl_clock!(20, 8, 17, 26, 1600);

impl InterleaveTiming for Mhz16 {}
impl InterleaveTiming for Mhz20 {}
