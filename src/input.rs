// Pure conversions from raw browser measurements.

/// Convert a scroll offset into the 0..1 fraction the timeline consumes.
///
/// A page too short to scroll reports 0.
pub fn scroll_fraction(scroll_top: f64, scroll_height: f64, client_height: f64) -> f32 {
    let range = scroll_height - client_height;
    if !range.is_finite() || range <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0) as f32
}

/// Clamp a measured interval so a suspended tab does not jump every fade to its end.
pub fn clamp_step_ms(elapsed_ms: f32, max_ms: f32) -> f32 {
    if elapsed_ms.is_finite() {
        elapsed_ms.clamp(0.0, max_ms)
    } else {
        0.0
    }
}
