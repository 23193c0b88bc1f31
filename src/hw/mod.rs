//! Bit-banging through the i.MX RT GPIO ports.
//!
//! The port's `DR_SET`/`DR_CLEAR` registers set and clear individual data
//! bits in one write, so concurrent lanes on the same port never go through
//! a read-modify-write of each other's bits. Padding is burnt with the
//! core's calibrated delay loop.
//!
//! Timing caveat: the engine's cycle ledger assumes every bus operation
//! costs exactly what [`OutputBus`](crate::OutputBus) documents. On a
//! cached, superscalar core the real cost of a write or delay varies;
//! validate against your strip (or run from TCM with caches primed) before
//! trusting the fast clocks.

mod pins;

pub use pins::Pins;

use imxrt_ral as ral;
use ral::{gpio, Valid};
use snafu::prelude::*;

use crate::bus::OutputBus;

/// Errors of [`GpioBus::init`].
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Two lanes map to the same data bit of the port register.
    #[snafu(display("two lanes share data bit {offset}"))]
    LaneConflict {
        /// The doubly assigned bit offset.
        offset: u32,
    },
    /// A pad maps to a data bit outside the 32-bit port register.
    #[snafu(display("data bit {offset} is outside the port register"))]
    OffsetOutOfRange {
        /// The offending bit offset.
        offset: u32,
    },
}

/// Drives up to three strip data lines from one GPIO port.
pub struct GpioBus<const N: u8, const LANES: usize>
where
    gpio::Instance<N>: Valid,
{
    gpio: gpio::Instance<N>,
    masks: [u32; LANES],
}

impl<const N: u8, const LANES: usize> GpioBus<N, LANES>
where
    gpio::Instance<N>: Valid,
{
    /// Takes ownership of the port and configures every lane's pad as an
    /// output driving low.
    pub fn init<P: Pins<N, LANES>>(gpio: gpio::Instance<N>, mut pins: P) -> Result<Self, BusError> {
        pins.configure();

        let mut masks = [0; LANES];
        let mut all = 0;
        for (lane, &offset) in P::OFFSETS.iter().enumerate() {
            ensure!(offset < 32, OffsetOutOfRangeSnafu { offset });
            let mask = 1u32 << offset;
            ensure!(all & mask == 0, LaneConflictSnafu { offset });
            all |= mask;
            masks[lane] = mask;
        }

        log::debug!("Initializing GPIO{} strip lines.", N);
        log::debug!("    Data bit offsets: {:?}", P::OFFSETS);

        // Outputs driving low before the first frame.
        ral::write_reg!(ral::gpio, gpio, DR_CLEAR, all);
        ral::modify_reg!(ral::gpio, gpio, GDIR, |gdir| gdir | all);

        Ok(Self { gpio, masks })
    }
}

impl<const N: u8, const LANES: usize> OutputBus for GpioBus<N, LANES>
where
    gpio::Instance<N>: Valid,
{
    fn drive_high(&mut self, lane: usize) {
        ral::write_reg!(ral::gpio, self.gpio, DR_SET, self.masks[lane]);
    }

    fn drive_low(&mut self, lane: usize) {
        ral::write_reg!(ral::gpio, self.gpio, DR_CLEAR, self.masks[lane]);
    }

    fn pad(&mut self, cycles: u32) {
        cortex_m::asm::delay(cycles);
    }
}
