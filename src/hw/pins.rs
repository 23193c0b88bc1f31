use imxrt_iomuxc as iomuxc;

use iomuxc::gpio::Pin;

use paste::paste;

/// The pads used as strip data lines.
pub trait Pins<const N: u8, const L: usize> {
    /// The amount of data lines this object contains.
    const PIN_COUNT: u32;

    /// Configures the pads.
    ///
    /// This is not intended to be called by the user;
    /// it will be used inside of the driver.
    fn configure(&mut self);

    /// The data bit offsets within the GPIO port register.
    const OFFSETS: &'static [u32];
}

macro_rules! count {
    () => (0u32);
    ( $x:tt $($xs:tt)* ) => (1u32 + count!($($xs)*));
}

macro_rules! impl_pins {
    ($($n:literal)+) => {
        paste! {
            impl<const N: u8, $([<P $n>]: Pin<N>),+> Pins<N, {count!($($n)+) as usize}> for ($([<P $n>]),+,) {
                fn configure(&mut self) {
                    $(
                        iomuxc::gpio::prepare(&mut self.$n);
                    )+
                }

                const PIN_COUNT: u32 = count!($($n)+);

                const OFFSETS: &'static [u32] = &[$(
                    [<P $n>]::OFFSET as u32
                ),+];
            }
        }
    };
}

impl_pins!(0);
impl_pins!(0 1);
impl_pins!(0 1 2);
