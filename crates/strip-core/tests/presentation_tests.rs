mod common;

use common::*;
use strip_core::*;

// Alpha close to 1 so the smoothed position follows the scroll within a frame
// or two; the smoothing itself is covered in timeline_tests.
fn snappy() -> PresentationConfig {
    let mut cfg = PresentationConfig::music_strip();
    cfg.tuning.smooth_factor = 0.999_999;
    cfg
}

fn scroll_to(p: &mut Presentation<TestChannel>, position: f32) -> FrameReport {
    let len = p.config().sequence_length;
    let mut report = p.frame(position / len);
    for _ in 0..3 {
        let r = p.frame(position / len);
        report.transitions.extend(r.transitions);
        report.position = r.position;
    }
    report
}

#[test]
fn music_strip_config_is_valid_without_warnings() {
    let cfg = PresentationConfig::music_strip();
    let warnings = cfg.validate().unwrap();
    assert!(warnings.is_empty(), "unexpected overlap: {warnings:?}");
    assert_eq!(cfg.ambients.len(), 7);
}

#[test]
fn first_frame_reports_initially_visible_meshes_and_caption() {
    let (mut p, _) = presentation(PresentationConfig::music_strip());
    let report = p.frame(0.0);
    let mut entered: Vec<&str> = report
        .transitions
        .iter()
        .filter(|t| t.edge == Edge::Enter)
        .map(|t| p.windows().name(t.signal))
        .collect();
    entered.sort_unstable();
    assert_eq!(entered, vec!["P1", "P5", "S1", "caption-0"]);
    assert!(p.frame(0.0).transitions.is_empty());
}

#[test]
fn cubbon_scenario_drives_channel_play_and_pause() {
    let (mut p, probes) = presentation(snappy());
    scroll_to(&mut p, 9.8);
    assert!(!probes["cubbon"].playing());

    let enter = scroll_to(&mut p, 10.2);
    assert!(enter.transitions.iter().any(|t| t.kind == SignalKind::Ambient
        && t.edge == Edge::Enter
        && p.windows().name(t.signal) == "cubbon"));
    assert!(probes["cubbon"].playing(), "paused -> playing on enter");
    assert!(p.is_active(SignalKind::Ambient, "cubbon"));

    for _ in 0..20 {
        p.fade_tick();
    }
    let exit = scroll_to(&mut p, 15.2);
    assert!(exit.transitions.iter().any(|t| t.edge == Edge::Exit
        && p.windows().name(t.signal) == "cubbon"));
    assert!(probes["cubbon"].playing(), "still fading out");
    for _ in 0..(AMBIENT_FADE_OUT_MS / FADE_TICK_MS) {
        p.fade_tick();
    }
    assert!(!probes["cubbon"].playing(), "playing -> paused after the fade");
    assert!(probes["street"].playing(), "next neighbourhood took over");
}

#[test]
fn at_most_one_ambient_sounds_after_crossing_a_boundary() {
    let (mut p, probes) = presentation(snappy());
    scroll_to(&mut p, 17.8);
    assert!(probes["metro"].playing());
    scroll_to(&mut p, 18.5);
    for _ in 0..(AMBIENT_FADE_OUT_MS / FADE_TICK_MS) {
        p.fade_tick();
    }
    let playing: Vec<&str> = p
        .registry()
        .ambients()
        .iter()
        .filter(|c| c.is_playing())
        .map(|c| c.name())
        .collect();
    assert_eq!(playing, vec!["churchStreet"]);
}

#[test]
fn background_starts_after_delay() {
    let (mut p, probes) = presentation(PresentationConfig::music_strip());
    p.advance(BACKGROUND_START_DELAY_MS as f32 - 1.0);
    assert!(!probes["background"].playing());
    p.advance(1.0);
    assert!(probes["background"].playing());
    for _ in 0..(BACKGROUND_INTRO_FADE_MS / FADE_TICK_MS) {
        p.fade_tick();
    }
    assert!(approx(probes["background"].volume(), BACKGROUND_LEVEL_BEFORE));
}

#[test]
fn startup_clock_stops_once_background_is_requested() {
    let (mut p, _) = presentation(PresentationConfig::music_strip());
    p.advance(BACKGROUND_START_DELAY_MS as f32);
    let at_start = p.startup_elapsed_ms();
    assert_eq!(at_start, BACKGROUND_START_DELAY_MS as f32);
    for _ in 0..1000 {
        p.fade_tick();
    }
    assert_eq!(p.startup_elapsed_ms(), at_start);

    p.shutdown();
    assert_eq!(p.startup_elapsed_ms(), 0.0);
}

#[test]
fn interaction_before_delayed_start_does_nothing() {
    let (mut p, probes) = presentation(PresentationConfig::music_strip());
    probes["background"].set_reject(true);
    assert_eq!(p.user_interaction(), 0);
    p.advance(BACKGROUND_START_DELAY_MS as f32);
    assert!(!probes["background"].playing());
    probes["background"].set_reject(false);
    assert_eq!(p.user_interaction(), 1);
    assert!(probes["background"].playing());
}

#[test]
fn pointer_hit_on_nested_node_opens_overlay() {
    let (mut p, _) = presentation(PresentationConfig::music_strip());
    assert_eq!(p.pointer_down(["Cube.004", "Frame", "Scene"]), None);
    assert_eq!(
        p.pointer_down(["Cube.004", "P05", "Scene"]),
        Some(OverlayChange::Opened(5))
    );
    assert!(p.overlay().is_open());
    assert!(p.registry().is_ducked());
    assert_eq!(p.close_overlay(), Some(OverlayChange::Closed));
    assert_eq!(p.close_overlay(), None);
}

#[test]
fn overlay_restore_reflects_scrolling_during_the_interrupt() {
    let (mut p, probes) = presentation(snappy());
    p.advance(BACKGROUND_START_DELAY_MS as f32);
    for _ in 0..(BACKGROUND_INTRO_FADE_MS / FADE_TICK_MS) {
        p.fade_tick();
    }
    p.open_overlay(4);
    scroll_to(&mut p, 11.0);
    for _ in 0..40 {
        p.fade_tick();
    }
    assert!(approx(probes["cubbon"].volume(), DUCK_FLOOR), "entered while ducked");

    p.close_overlay();
    for _ in 0..(RESTORE_FADE_MS / FADE_TICK_MS) {
        p.fade_tick();
    }
    assert!(approx(probes["background"].volume(), BACKGROUND_LEVEL_AFTER));
    assert!(approx(probes["cubbon"].volume(), AMBIENT_BASE_VOLUME));
}

#[test]
fn overlapping_config_logs_warning_but_runs() {
    let mut cfg = snappy();
    let ambient = cfg
        .tables
        .iter_mut()
        .find(|t| t.kind == SignalKind::Ambient)
        .unwrap();
    ambient.windows = vec![Window::new("first", 5.0, 10.0), Window::new("2nd", 8.0, 12.0)];
    let (mut p, probes) = presentation(cfg);
    assert_eq!(p.warnings().len(), 1);
    scroll_to(&mut p, 9.0);
    assert!(probes["2nd"].playing());
    assert!(!probes["first"].playing());
}

#[test]
fn mute_toggle_and_shutdown() {
    let (mut p, probes) = presentation(snappy());
    p.advance(BACKGROUND_START_DELAY_MS as f32);
    assert!(p.toggle_mute());
    for _ in 0..40 {
        p.fade_tick();
    }
    assert_eq!(probes["background"].volume(), 0.0);
    assert!(probes["background"].playing());

    p.shutdown();
    assert!(!probes["background"].playing());
    assert!(!p.overlay().is_open());
    // membership was forgotten, so the next frame re-reports what is visible
    assert!(!p.frame(0.0).transitions.is_empty());
}
