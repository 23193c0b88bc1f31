//! Whole-frame properties across lane counts.

mod common;

use common::XorShift32;
use ws2811_bitbang::sim::WaveformRecorder;
use ws2811_bitbang::{ClockTiming, Mhz16, Mhz20, Ws2811Driver, RGB8};

#[test]
fn frame_length_is_data_independent() {
    let mut rng = XorShift32(0xF00D);
    let budget = Mhz20::BUDGET;

    for len in [1, 2, 9] {
        let colors = rng.colors(len);
        let mut driver = Ws2811Driver::<Mhz20, _, 1>::new(WaveformRecorder::<1, 2048>::new());
        driver.write(&colors, len).unwrap();
        let rec = driver.into_bus();

        let bits = (len * 24) as u64;
        assert_eq!(
            rec.cycles(),
            bits * u64::from(budget.period) + u64::from(budget.reset)
        );
    }
}

#[test]
fn three_lane_frame_roundtrips_and_latches() {
    let mut rng = XorShift32(0xABCD);
    let a = rng.colors(4);
    let b = rng.colors(4);
    let c = rng.colors(4);

    let mut driver = Ws2811Driver::<Mhz16, _, 3>::new(WaveformRecorder::<3, 2048>::new());
    driver.write([&a[..], &b[..], &c[..]], 4).unwrap();
    let rec = driver.into_bus();

    for (lane, want) in [&a, &b, &c].into_iter().enumerate() {
        let mut out = vec![RGB8::default(); 5];
        let decoded = rec.decode_lane::<Mhz16>(lane, &mut out).unwrap();
        assert_eq!(decoded, 4);
        assert_eq!(&out[..4], &want[..]);
    }

    assert!(rec.trailing_low() >= u64::from(Mhz16::BUDGET.reset));
    assert_eq!(
        rec.cycles(),
        96 * u64::from(Mhz16::BUDGET.period) + u64::from(Mhz16::BUDGET.reset)
    );
}

#[test]
fn empty_multi_lane_frame_still_latches() {
    let mut driver = Ws2811Driver::<Mhz20, _, 2>::new(WaveformRecorder::<2, 64>::new());
    driver.write([&[] as &[RGB8], &[]], 0).unwrap();
    let rec = driver.into_bus();

    assert!(rec.edges().is_empty());
    assert_eq!(rec.trailing_low(), u64::from(Mhz20::BUDGET.reset));
}
