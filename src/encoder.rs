//! Single-lane waveform generation.

use crate::bus::OutputBus;
use crate::timing::{BitBudget, WRITE_CYCLES};

/// The one lane a non-interleaved transmission drives.
const LANE: usize = 0;

/// Phases of one bit period.
///
/// The period length is independent of the bit value; only the phase in
/// which the line drops differs. Exiting exactly on the period boundary is
/// what keeps the rising edge of every subsequent bit on the same grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitPhase {
    DriveHigh,
    HoldHigh,
    DropLow,
    HoldLow,
    PeriodEnd,
}

/// Emits the waveform of a single data bit.
///
/// The line rises `WRITE_CYCLES` into the period, stays high for the
/// budget matching the bit value, and the remainder of the period is spent
/// low.
pub(crate) fn shift_bit<B: OutputBus + ?Sized>(bus: &mut B, budget: &BitBudget, bit: bool) {
    let high = if bit { budget.one_high } else { budget.zero_high };

    let mut elapsed = 0;
    let mut phase = BitPhase::DriveHigh;
    loop {
        phase = match phase {
            BitPhase::DriveHigh => {
                bus.drive_high(LANE);
                elapsed += WRITE_CYCLES;
                BitPhase::HoldHigh
            }
            BitPhase::HoldHigh => {
                // Start the falling write so that it completes exactly
                // `high` cycles after the line rose.
                bus.pad(high - WRITE_CYCLES);
                elapsed = high;
                BitPhase::DropLow
            }
            BitPhase::DropLow => {
                bus.drive_low(LANE);
                elapsed += WRITE_CYCLES;
                BitPhase::HoldLow
            }
            BitPhase::HoldLow => {
                bus.pad(budget.period - elapsed);
                elapsed = budget.period;
                BitPhase::PeriodEnd
            }
            BitPhase::PeriodEnd => break,
        };
    }

    debug_assert_eq!(elapsed, budget.period);
}

/// Shifts one byte out, most-significant bit first.
///
/// Rotating instead of masking keeps the per-bit work constant: after the
/// rotate, the bit under test always sits in the least significant
/// position.
pub(crate) fn shift_byte<B: OutputBus + ?Sized>(bus: &mut B, budget: &BitBudget, mut byte: u8) {
    for _ in 0..8 {
        byte = byte.rotate_left(1);
        shift_bit(bus, budget, byte & 1 != 0);
    }
}
