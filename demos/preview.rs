//! Host-side preview: renders a rainbow frame, plays it into the
//! cycle-accurate simulator and prints what a strip would latch.
//!
//! Pattern generation and frame pacing live out here, with the caller;
//! the driver only ever sees finished color buffers.

use palette::{Hsv, IntoColor, Srgb};
use ws2811_bitbang::sim::WaveformRecorder;
use ws2811_bitbang::{cycles_to_nanos, Mhz20, Ws2811Driver, RGB8};

const LED_COUNT: usize = 8;

fn rainbow(t: u32, pixels: &mut [RGB8]) {
    let t = (t as f32) / 500.0;

    for (pixel_pos, pixel) in pixels.iter_mut().enumerate() {
        let offset = (t + (pixel_pos as f32) / (LED_COUNT as f32)) % 1.0;

        let color: Srgb<f32> = Hsv::new_srgb(360.0 * offset, 1.0, 1.0).into_color();
        let color = color.into_format::<u8>();
        *pixel = RGB8::new(color.red, color.green, color.blue);
    }
}

fn main() {
    let mut colors = [RGB8::default(); LED_COUNT];
    rainbow(250, &mut colors);

    let mut driver = Ws2811Driver::<Mhz20, _, 1>::new(WaveformRecorder::<1, 1024>::new());
    driver.write(&colors, LED_COUNT).unwrap();

    let bus = driver.into_bus();
    let mut decoded = [RGB8::default(); LED_COUNT];
    let count = bus.decode_lane::<Mhz20>(0, &mut decoded).unwrap();

    println!(
        "frame: {} colors, {} edges, {} cycles ({} us at 20 MHz)",
        count,
        bus.edges().len(),
        bus.cycles(),
        cycles_to_nanos::<Mhz20>(bus.cycles() as u32) / 1_000,
    );
    for (i, c) in decoded[..count].iter().enumerate() {
        println!("  led {i}: #{:02x}{:02x}{:02x}", c.r, c.g, c.b);
    }
}
