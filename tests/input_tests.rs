// Host-side tests for scroll and timer conversions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn scroll_fraction_spans_zero_to_one() {
    assert_eq!(scroll_fraction(0.0, 5000.0, 1000.0), 0.0);
    assert_eq!(scroll_fraction(2000.0, 5000.0, 1000.0), 0.5);
    assert_eq!(scroll_fraction(4000.0, 5000.0, 1000.0), 1.0);
}

#[test]
fn scroll_fraction_clamps_overscroll() {
    // elastic scrolling can report offsets outside the track
    assert_eq!(scroll_fraction(-120.0, 5000.0, 1000.0), 0.0);
    assert_eq!(scroll_fraction(4300.0, 5000.0, 1000.0), 1.0);
}

#[test]
fn unscrollable_page_reports_zero() {
    assert_eq!(scroll_fraction(0.0, 800.0, 800.0), 0.0);
    assert_eq!(scroll_fraction(10.0, 600.0, 800.0), 0.0);
    assert_eq!(scroll_fraction(f64::NAN, 5000.0, 1000.0), 0.0);
}

#[test]
fn step_clamp_bounds_timer_gaps() {
    assert_eq!(clamp_step_ms(50.0, 250.0), 50.0);
    assert_eq!(clamp_step_ms(4000.0, 250.0), 250.0);
    assert_eq!(clamp_step_ms(-3.0, 250.0), 0.0);
    assert_eq!(clamp_step_ms(f32::INFINITY, 250.0), 0.0);
}
