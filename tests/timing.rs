use ws2811_bitbang::{cycles_to_nanos, ClockTiming, Mhz16, Mhz20, Mhz8, WRITE_CYCLES};

fn check_budget<C: ClockTiming>() {
    let b = C::BUDGET;
    assert!(b.zero_high < b.one_high);
    assert!(b.one_high < b.period);
    assert!(b.zero_high >= WRITE_CYCLES);
    assert!(b.one_high + WRITE_CYCLES <= b.period);
    assert!(b.reset > b.period);
    // Even the shortest documented latch threshold of the strip family is
    // well below the configured hold.
    assert!(cycles_to_nanos::<C>(b.reset) >= 50_000);
}

#[test]
fn budgets_are_ordered_at_all_clocks() {
    check_budget::<Mhz8>();
    check_budget::<Mhz16>();
    check_budget::<Mhz20>();
}

#[test]
fn budgets_match_documented_nanoseconds() {
    assert_eq!(cycles_to_nanos::<Mhz20>(Mhz20::BUDGET.zero_high), 400);
    assert_eq!(cycles_to_nanos::<Mhz20>(Mhz20::BUDGET.one_high), 850);
    assert_eq!(cycles_to_nanos::<Mhz20>(Mhz20::BUDGET.period), 1300);

    assert_eq!(cycles_to_nanos::<Mhz16>(Mhz16::BUDGET.zero_high), 375);
    assert_eq!(cycles_to_nanos::<Mhz16>(Mhz16::BUDGET.one_high), 812);
    assert_eq!(cycles_to_nanos::<Mhz16>(Mhz16::BUDGET.period), 1500);

    assert_eq!(cycles_to_nanos::<Mhz8>(Mhz8::BUDGET.zero_high), 375);
    assert_eq!(cycles_to_nanos::<Mhz8>(Mhz8::BUDGET.one_high), 875);
    assert_eq!(cycles_to_nanos::<Mhz8>(Mhz8::BUDGET.period), 2125);

    for reset in [
        cycles_to_nanos::<Mhz8>(Mhz8::BUDGET.reset),
        cycles_to_nanos::<Mhz16>(Mhz16::BUDGET.reset),
        cycles_to_nanos::<Mhz20>(Mhz20::BUDGET.reset),
    ] {
        assert_eq!(reset, 80_000);
    }
}
