//! Lockstep scheduling of 2–3 concurrent lanes.
//!
//! Concurrent lanes carry independent data, so the exact sequence of
//! register writes differs per combination of current bit values. For each
//! combination this module builds, at compile time, one fixed schedule of
//! writes and padding (a "leaf"), and every leaf is const-asserted to cost
//! exactly one bit period, so whichever leaf runs, all lanes stay locked to
//! the same timing grid. A clock on which the falling edges cannot be
//! serialized in time refuses to build the table at all.
//!
//! At transmission time the engine simply indexes the table with the
//! combined bit values and plays the schedule; there is no per-bit timing
//! arithmetic left to get wrong.

use core::marker::PhantomData;

use crate::bus::OutputBus;
use crate::timing::{BitBudget, InterleaveTiming, WRITE_CYCLES};

/// Most lanes the scheduler supports.
pub(crate) const MAX_LANES: usize = 3;

/// Upper bound of ops in one leaf: one rise and one fall per lane, padding
/// before each fall, and the equalizing tail.
const MAX_OPS: usize = 16;

/// One step of a leaf schedule.
///
/// `High`/`Low` cost [`WRITE_CYCLES`], `Pad` costs its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    High(usize),
    Low(usize),
    Pad(u32),
}

/// A fixed sequence of bus operations with a statically known cycle cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Schedule {
    ops: [Op; MAX_OPS],
    len: usize,
}

impl Schedule {
    const EMPTY: Self = Self {
        ops: [Op::Pad(0); MAX_OPS],
        len: 0,
    };

    /// Total cycle cost, by static accounting over the op list.
    pub(crate) const fn cycles(&self) -> u32 {
        let mut total = 0;
        let mut i = 0;
        while i < self.len {
            total += match self.ops[i] {
                Op::High(_) | Op::Low(_) => WRITE_CYCLES,
                Op::Pad(cycles) => cycles,
            };
            i += 1;
        }
        total
    }

    pub(crate) fn run<B: OutputBus + ?Sized>(&self, bus: &mut B) {
        for op in &self.ops[..self.len] {
            match *op {
                Op::High(lane) => bus.drive_high(lane),
                Op::Low(lane) => bus.drive_low(lane),
                Op::Pad(cycles) => bus.pad(cycles),
            }
        }
    }
}

/// Builds the leaf for one combination of bit values.
///
/// Lane `k`'s bit is `(combo >> k) & 1`. The lines rise back to back, so
/// lane `k` is high from `(k + 1) * WRITE_CYCLES` on; its fall is then due
/// exactly `zero_high` or `one_high` cycles later. Falls are emitted in
/// deadline order with minimal padding in between, and one tail pad brings
/// every leaf to the same period total.
const fn leaf(budget: BitBudget, lanes: usize, combo: usize) -> Schedule {
    assert!(lanes >= 2 && lanes <= MAX_LANES);

    let mut ops = [Op::Pad(0); MAX_OPS];
    let mut len = 0;
    let mut now = 0;

    let mut k = 0;
    while k < lanes {
        ops[len] = Op::High(k);
        len += 1;
        now += WRITE_CYCLES;
        k += 1;
    }

    // Deadline of each falling edge.
    let mut fall = [0u32; MAX_LANES];
    let mut k = 0;
    while k < lanes {
        let rise = (k as u32 + 1) * WRITE_CYCLES;
        let high = if (combo >> k) & 1 == 1 {
            budget.one_high
        } else {
            budget.zero_high
        };
        fall[k] = rise + high;
        k += 1;
    }

    // Lane indices sorted by fall deadline (insertion sort; const fns
    // cannot use the slice sort machinery).
    let mut order = [0usize; MAX_LANES];
    let mut k = 0;
    while k < lanes {
        order[k] = k;
        k += 1;
    }
    let mut i = 1;
    while i < lanes {
        let mut j = i;
        while j > 0 && fall[order[j - 1]] > fall[order[j]] {
            let swapped = order[j - 1];
            order[j - 1] = order[j];
            order[j] = swapped;
            j -= 1;
        }
        i += 1;
    }

    let mut k = 0;
    while k < lanes {
        let lane = order[k];
        let start = fall[lane] - WRITE_CYCLES;
        assert!(
            start >= now,
            "falling edges cannot be serialized at this clock frequency"
        );
        if start > now {
            ops[len] = Op::Pad(start - now);
            len += 1;
            now = start;
        }
        ops[len] = Op::Low(lane);
        len += 1;
        now += WRITE_CYCLES;
        k += 1;
    }

    assert!(now <= budget.period);
    if now < budget.period {
        ops[len] = Op::Pad(budget.period - now);
        len += 1;
    }

    let schedule = Schedule { ops, len };
    assert!(schedule.cycles() == budget.period);
    schedule
}

const fn leaf_table(budget: BitBudget, lanes: usize) -> [Schedule; 1 << MAX_LANES] {
    let mut table = [Schedule::EMPTY; 1 << MAX_LANES];
    let mut combo = 0;
    while combo < (1 << lanes) {
        table[combo] = leaf(budget, lanes, combo);
        combo += 1;
    }
    table
}

/// The dispatch table of one clock/lane-count pairing.
///
/// Indexed by the combined bit values of all lanes at the current bit
/// position; entries past `1 << LANES` are unused.
pub(crate) struct LeafTable<C, const LANES: usize> {
    _clock: PhantomData<C>,
}

impl<C: InterleaveTiming, const LANES: usize> LeafTable<C, LANES> {
    pub(crate) const LEAVES: [Schedule; 1 << MAX_LANES] = leaf_table(C::BUDGET, LANES);
}

/// Shifts one byte per lane out, most-significant bit first, all lanes in
/// lockstep.
pub(crate) fn shift_bytes<C: InterleaveTiming, B: OutputBus + ?Sized, const LANES: usize>(
    bus: &mut B,
    mut bytes: [u8; LANES],
) {
    for _ in 0..8 {
        let mut combo = 0;
        for (lane, byte) in bytes.iter_mut().enumerate() {
            *byte = byte.rotate_left(1);
            combo |= usize::from(*byte & 1) << lane;
        }
        LeafTable::<C, LANES>::LEAVES[combo].run(bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WaveformRecorder;
    use crate::timing::{ClockTiming, Mhz16, Mhz20};

    /// Replays every leaf through the recorder and checks, per lane, the
    /// rise offset and the high duration the combination demands.
    fn verify_leaves<C: InterleaveTiming, const LANES: usize>() {
        let budget = C::BUDGET;
        for combo in 0..(1 << LANES) {
            let schedule = &LeafTable::<C, LANES>::LEAVES[combo];
            assert_eq!(schedule.cycles(), budget.period, "combo {combo:#05b}");

            let mut rec: WaveformRecorder<LANES, MAX_OPS> = WaveformRecorder::new();
            schedule.run(&mut rec);
            assert_eq!(rec.cycles(), u64::from(budget.period));

            for lane in 0..LANES {
                let mut rise = None;
                let mut fall = None;
                for edge in rec.edges().iter().filter(|e| usize::from(e.lane) == lane) {
                    if edge.high {
                        rise = Some(edge.cycle);
                    } else {
                        fall = Some(edge.cycle);
                    }
                }
                let (rise, fall) = (rise.unwrap(), fall.unwrap());

                assert_eq!(rise, u64::from((lane as u32 + 1) * WRITE_CYCLES));
                let want = if (combo >> lane) & 1 == 1 {
                    budget.one_high
                } else {
                    budget.zero_high
                };
                assert_eq!(
                    fall - rise,
                    u64::from(want),
                    "combo {combo:#05b}, lane {lane}"
                );
            }
        }
    }

    #[test]
    fn leaves_hold_deadlines_16mhz() {
        verify_leaves::<Mhz16, 2>();
        verify_leaves::<Mhz16, 3>();
    }

    #[test]
    fn leaves_hold_deadlines_20mhz() {
        verify_leaves::<Mhz20, 2>();
        verify_leaves::<Mhz20, 3>();
    }

    #[test]
    fn all_leaves_cost_one_period() {
        fn check<C: InterleaveTiming, const LANES: usize>() {
            let costs: std::vec::Vec<u32> = (0..1 << LANES)
                .map(|combo| LeafTable::<C, LANES>::LEAVES[combo].cycles())
                .collect();
            assert!(costs.iter().all(|&c| c == C::BUDGET.period), "{costs:?}");
        }
        check::<Mhz16, 2>();
        check::<Mhz16, 3>();
        check::<Mhz20, 2>();
        check::<Mhz20, 3>();
    }

    #[test]
    fn opposite_bits_share_the_grid() {
        // Lane 0 all-zero against lane 1 all-one is the widest spread the
        // scheduler has to reconcile in one leaf.
        let budget = Mhz20::BUDGET;
        let mut rec: WaveformRecorder<2, 64> = WaveformRecorder::new();
        shift_bytes::<Mhz20, _, 2>(&mut rec, [0x00, 0xFF]);

        assert_eq!(rec.cycles(), u64::from(budget.period) * 8);
        for (lane, want) in [(0, budget.zero_high), (1, budget.one_high)] {
            let rises: std::vec::Vec<u64> = rec
                .edges()
                .iter()
                .filter(|e| usize::from(e.lane) == lane && e.high)
                .map(|e| e.cycle)
                .collect();
            let falls: std::vec::Vec<u64> = rec
                .edges()
                .iter()
                .filter(|e| usize::from(e.lane) == lane && !e.high)
                .map(|e| e.cycle)
                .collect();
            assert_eq!(rises.len(), 8);
            for pair in rises.windows(2) {
                assert_eq!(pair[1] - pair[0], u64::from(budget.period));
            }
            for (rise, fall) in rises.iter().zip(&falls) {
                assert_eq!(fall - rise, u64::from(want));
            }
        }
    }
}
