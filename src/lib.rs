#![no_std]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(test)]
extern crate std;

/// GPIO backend for NXP i.MX RT targets.
#[cfg(feature = "imxrt")]
#[cfg_attr(docsrs, doc(cfg(feature = "imxrt")))]
pub mod hw;

pub mod sim;

mod bus;
mod driver;
mod encoder;
mod errors;
mod interleaver;
mod pixel;
mod timing;

pub use bus::OutputBus;
pub use driver::Ws2811Driver;
pub use errors::WriteError;
pub use pixel::Pixel;
pub use timing::{
    cycles_to_nanos, BitBudget, ClockTiming, InterleaveTiming, Mhz16, Mhz20, Mhz8, WRITE_CYCLES,
};

pub use smart_leds_trait::{SmartLedsWrite, RGB8};
