use serde::Deserialize;
use vizij_scroll_core::{
    config::Config,
    geometry::{Point, Rect},
    ids::ElementId,
    parallax::{OverlayConfig, ParallaxBinding, ParallaxEngine, BACKGROUND_OVERSCALE},
    scroll::{ScrollDirection, ScrollState},
    typewriter::Typewriter,
    widgets::{AnimatedCounter, ArcKind, MagneticButton, ProgressRing, RippleButton},
};

#[derive(Deserialize)]
struct ParallaxCases {
    cases: Vec<ParallaxCase>,
}

#[derive(Deserialize)]
struct ParallaxCase {
    offset: f32,
    speed_factor: f32,
    velocity: f32,
    translate_y: f32,
    blur_px: f32,
}

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn parallax_offsets_from_fixture() {
    let fixture: ParallaxCases =
        vizij_test_fixtures::scenarios::load("parallax-offsets").expect("load parallax-offsets");
    let engine = ParallaxEngine::new(&Config::default());
    for case in fixture.cases {
        let binding = ParallaxBinding {
            element: ElementId(0),
            speed_factor: case.speed_factor,
            overlay: OverlayConfig {
                color: Some("#000".into()),
                opacity: 0.4,
            },
        };
        let state = ScrollState {
            offset: case.offset,
            direction: ScrollDirection::Down,
            velocity: case.velocity,
            is_active: true,
            progress: 0.0,
        };
        let t = engine.compute(&binding, &state, false, true);
        approx(t.translate_y, case.translate_y, 1e-3);
        approx(t.blur_px, case.blur_px, 1e-3);
        assert_eq!(t.scale, BACKGROUND_OVERSCALE);
        assert_eq!(t.overlay_opacity, 0.4);

        let calm = engine.compute(&binding, &state, true, true);
        assert_eq!(calm.translate_y, 0.0);
        assert_eq!(calm.blur_px, 0.0);
        assert_eq!(calm.overlay_opacity, 0.4);
    }
}

#[test]
fn ripple_expires_within_one_frame_of_decay() {
    const FRAME: f64 = 1000.0 / 60.0;
    let mut button = RippleButton::new(&Config::default());
    let bounds = Rect::new(100.0, 100.0, 120.0, 40.0);
    let id = button
        .press(Point::new(110.0, 120.0), bounds, 0.0, false)
        .unwrap();

    let mut now = 0.0;
    let mut gone_at = None;
    while now < 1_000.0 {
        now += FRAME;
        if button.prune(now).contains(&id) {
            gone_at = Some(now);
            break;
        }
        assert!(button.active().iter().any(|r| r.id == id));
    }
    let gone_at = gone_at.expect("ripple never expired");
    assert!(gone_at >= 600.0 && gone_at <= 600.0 + FRAME);
    assert!(button.active().is_empty());
}

#[test]
fn overlapping_ripples_expire_independently() {
    let mut button = RippleButton::with_decay(600.0);
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    let a = button.press(Point::new(10.0, 10.0), bounds, 0.0, false).unwrap();
    let b = button.press(Point::new(90.0, 90.0), bounds, 200.0, false).unwrap();
    assert_eq!(button.prune(600.0), vec![a]);
    assert_eq!(button.active().len(), 1);
    assert_eq!(button.prune(800.0), vec![b]);
    assert!(button.press(Point::new(5.0, 5.0), bounds, 900.0, true).is_none());
}

#[test]
fn counter_lands_exactly_on_target() {
    for target in [0_i64, 1, 7, 99, 1234, -250] {
        let mut counter = AnimatedCounter::new(target, 2_000.0);
        counter.start(0.0);
        let mut last = 0;
        let mut t = 0.0;
        while t < 2_100.0 {
            let v = counter.sample(t, false);
            assert!(v >= 0_i64.min(target) && v <= 0_i64.max(target));
            if target >= 0 {
                assert!(v >= last, "counter went backwards at {t}");
            }
            last = v;
            t += 16.0;
        }
        assert_eq!(counter.sample(2_000.0, false), target);
        assert!(counter.is_done(2_000.0));
    }
}

#[test]
fn typewriter_ok_scenario() {
    let mut tw = Typewriter::new("OK", 50.0).unwrap();
    tw.start(0.0);
    let mut states = Vec::new();
    let mut t = 0.0;
    while t <= 400.0 {
        if let Some(text) = tw.poll(t, false) {
            states.push((t, text.to_string()));
        }
        t += 10.0;
    }
    assert_eq!(
        states,
        vec![(50.0, "O".to_string()), (100.0, "OK".to_string())]
    );
    assert!(tw.is_finished());
    assert!(!tw.is_typing());
}

#[test]
fn progress_ring_closes_ten_percent_per_tick() {
    let mut ring = ProgressRing::new(ArcKind::Ring, &Config::default());
    ring.set_target(100.0);
    approx(ring.tick(false), 10.0, 1e-4);
    approx(ring.tick(false), 19.0, 1e-4);
    let budget = ring.frames_to_settle(100.0);
    let mut frames = 2;
    while !ring.is_settled() {
        ring.tick(false);
        frames += 1;
        assert!(frames <= budget, "ring did not settle within {budget} frames");
    }
    assert_eq!(ring.value(), 100.0);
    assert_eq!(ring.sweep_degrees(), 360.0);

    let mut gauge = ProgressRing::new(ArcKind::Speedometer, &Config::default());
    gauge.set_target(50.0);
    gauge.tick(true);
    assert_eq!(gauge.sweep_degrees(), 135.0);
    approx(gauge.dash_offset(200.0), 100.0, 1e-4);
}

#[test]
fn magnetic_button_follows_pointer_and_releases() {
    let mut button = MagneticButton::new(Config::default().magnetic_strength);
    let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
    let off = button.pointer_move(Point::new(100.0, 25.0), bounds, false);
    approx(off.x, 15.0, 1e-4);
    approx(off.y, 0.0, 1e-4);
    assert_eq!(button.pointer_leave(), Point::ZERO);
    assert_eq!(
        button.pointer_move(Point::new(0.0, 0.0), bounds, true),
        Point::ZERO
    );
}
