use nanograph::system::snapshot::rate_mbs;
use proptest::prelude::*;

const MB: f64 = 1024.0 * 1024.0;

proptest! {
    // Computed MB/s must equal delta / delay / 1024^2 within the
    // two-decimal rounding tolerance.
    #[test]
    fn rate_matches_reference(delta in 0u64..=(1u64 << 40), delay in 0.01f64..3600.0) {
        let computed = rate_mbs(0, delta, delay);
        let reference = delta as f64 / delay / MB;
        prop_assert!((computed - reference).abs() <= 0.005 + 1e-9);
    }

    // Only the counter delta matters, not the absolute baseline.
    #[test]
    fn baseline_offset_is_irrelevant(
        base in 0u64..=(1u64 << 30),
        delta in 0u64..=(1u64 << 30),
        delay in 0.01f64..600.0,
    ) {
        prop_assert_eq!(rate_mbs(base, base + delta, delay), rate_mbs(0, delta, delay));
    }

    #[test]
    fn non_positive_elapsed_never_panics(delta in 0u64..=u64::MAX, delay in -10.0f64..=0.0) {
        prop_assert_eq!(rate_mbs(0, delta, delay), 0.0);
    }
}

#[test]
fn consecutive_intervals_chain_through_the_baseline() {
    // Two snapshot intervals over one counter: 4 MB in 2 s, then
    // 1 MB in 0.5 s. Each interval is measured against the previous
    // interval's end point.
    let first_end = 4 * 1024 * 1024;
    let second_end = first_end + 1024 * 1024;
    assert_eq!(rate_mbs(0, first_end, 2.0), 2.0);
    assert_eq!(rate_mbs(first_end, second_end, 0.5), 2.0);
}
