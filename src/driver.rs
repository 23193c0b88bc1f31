//! The frame transmitter.

use core::convert::Infallible;
use core::marker::PhantomData;

use smart_leds_trait::{SmartLedsWrite, RGB8};
use snafu::ensure;

use crate::bus::OutputBus;
use crate::encoder;
use crate::errors::{BufferTooShortSnafu, WriteError};
use crate::interleaver;
use crate::pixel::Pixel;
use crate::timing::{cycles_to_nanos, ClockTiming, InterleaveTiming};

/// Exclusive processor attention for the duration of a frame.
///
/// The strip protocol has no tolerance for added latency mid-frame, so the
/// whole transmission runs with interrupts suspended. Dropping the guard
/// restores the previous interrupt state, which makes the critical section
/// hold on every exit path, including unwinding.
struct SuspendInterrupts {
    restore: critical_section::RestoreState,
}

impl SuspendInterrupts {
    fn enter() -> Self {
        // SAFETY: the token is released exactly once, in `drop`, so
        // acquire/release stay balanced on every exit path.
        let restore = unsafe { critical_section::acquire() };
        Self { restore }
    }
}

impl Drop for SuspendInterrupts {
    fn drop(&mut self) {
        // SAFETY: `restore` is the token returned by the acquire in
        // `enter`, released in reverse order of acquisition.
        unsafe { critical_section::release(self.restore) }
    }
}

/// A bit-banged WS2811 LED strip driver.
///
/// Drives `LANES` strips (1 to 3) through the [`OutputBus`] `B`, with the
/// cycle budgets of clock `C`. Multi-lane drivers additionally require the
/// clock to implement [`InterleaveTiming`]; configurations outside that
/// envelope fail to compile.
pub struct Ws2811Driver<C, B, const LANES: usize> {
    bus: B,
    _clock: PhantomData<C>,
}

impl<C: ClockTiming, B: OutputBus, const LANES: usize> Ws2811Driver<C, B, LANES> {
    const LANE_COUNT_SUPPORTED: () = assert!(
        LANES >= 1 && LANES <= 3,
        "the driver supports 1 to 3 lanes"
    );

    /// Creates a driver over an already configured bus.
    pub fn new(bus: B) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LANE_COUNT_SUPPORTED;

        let budget = C::BUDGET;
        log::debug!("Initializing WS2811 bit-bang driver.");
        log::debug!("    Clock: {} Hz", C::HZ);
        log::debug!("    Lanes: {}", LANES);
        log::debug!(
            "    Bit period: {} cycles ({} ns)",
            budget.period,
            cycles_to_nanos::<C>(budget.period)
        );
        log::debug!(
            "    0-bit high: {} cycles ({} ns)",
            budget.zero_high,
            cycles_to_nanos::<C>(budget.zero_high)
        );
        log::debug!(
            "    1-bit high: {} cycles ({} ns)",
            budget.one_high,
            cycles_to_nanos::<C>(budget.one_high)
        );
        log::debug!(
            "    Reset hold: {} cycles ({} ns)",
            budget.reset,
            cycles_to_nanos::<C>(budget.reset)
        );

        Self {
            bus,
            _clock: PhantomData,
        }
    }

    /// Borrows the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Releases the underlying bus.
    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<C: ClockTiming, B: OutputBus> Ws2811Driver<C, B, 1> {
    /// Sends the first `count` colors of `colors` to the strip.
    ///
    /// Interrupts are suspended for the whole frame; afterwards the line is
    /// held low for the reset duration, making the strip latch. A `count`
    /// of zero still emits the reset hold.
    pub fn write<P: Pixel>(&mut self, colors: &[P], count: usize) -> Result<(), WriteError> {
        ensure!(
            count <= colors.len(),
            BufferTooShortSnafu {
                lane: 0_usize,
                len: colors.len(),
                count,
            }
        );

        log::trace!("Transmitting {} colors on 1 lane.", count);

        let budget = C::BUDGET;
        {
            let _suspended = SuspendInterrupts::enter();
            for color in &colors[..count] {
                for byte in color.get_ws2811_bytes() {
                    encoder::shift_byte(&mut self.bus, &budget, byte);
                }
            }
        }
        self.bus.pad(budget.reset);
        Ok(())
    }
}

impl<C: InterleaveTiming, B: OutputBus> Ws2811Driver<C, B, 2> {
    /// Sends `count` colors per lane, both lanes in lockstep.
    ///
    /// See the single-lane [`write`](Ws2811Driver::write) for the frame
    /// discipline; the reset hold covers both lines.
    pub fn write<P: Pixel>(&mut self, lanes: [&[P]; 2], count: usize) -> Result<(), WriteError> {
        write_interleaved::<C, B, P, 2>(&mut self.bus, lanes, count)
    }
}

impl<C: InterleaveTiming, B: OutputBus> Ws2811Driver<C, B, 3> {
    /// Sends `count` colors per lane, all three lanes in lockstep.
    pub fn write<P: Pixel>(&mut self, lanes: [&[P]; 3], count: usize) -> Result<(), WriteError> {
        write_interleaved::<C, B, P, 3>(&mut self.bus, lanes, count)
    }
}

fn write_interleaved<C: InterleaveTiming, B: OutputBus, P: Pixel, const N: usize>(
    bus: &mut B,
    lanes: [&[P]; N],
    count: usize,
) -> Result<(), WriteError> {
    for (lane, colors) in lanes.iter().enumerate() {
        ensure!(
            count <= colors.len(),
            BufferTooShortSnafu {
                lane,
                len: colors.len(),
                count,
            }
        );
    }

    log::trace!("Transmitting {} colors on {} lanes.", count, N);

    {
        let _suspended = SuspendInterrupts::enter();
        for i in 0..count {
            let mut components = [[0u8; 3]; N];
            for (lane, colors) in lanes.iter().enumerate() {
                components[lane] = colors[i].get_ws2811_bytes();
            }
            for c in 0..3 {
                let mut bytes = [0u8; N];
                for lane in 0..N {
                    bytes[lane] = components[lane][c];
                }
                interleaver::shift_bytes::<C, B, N>(bus, bytes);
            }
        }
    }
    bus.pad(C::BUDGET.reset);
    Ok(())
}

/// `smart-leds` interface for the single-lane driver.
///
/// The iterator is polled inside the critical section; in the cycle model
/// that work is free, but on hardware it should stay cheap.
impl<C: ClockTiming, B: OutputBus> SmartLedsWrite for Ws2811Driver<C, B, 1> {
    type Error = Infallible;
    type Color = RGB8;

    /// Write all the items of an iterator to the strip.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let budget = C::BUDGET;
        {
            let _suspended = SuspendInterrupts::enter();
            for item in iterator {
                let color: RGB8 = item.into();
                for byte in [color.r, color.g, color.b] {
                    encoder::shift_byte(&mut self.bus, &budget, byte);
                }
            }
        }
        self.bus.pad(budget.reset);
        Ok(())
    }
}
