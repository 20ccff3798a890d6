use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_scroll_core::{
    config::Config,
    engine::ScrollFx,
    geometry::Rect,
    parallax::ParallaxBinding,
    preset::Preset,
    reveal::RevealTrigger,
    scroll::ScrollMetrics,
    visibility::ObservationMode,
};

/// A long page: 200 cards in five staggered groups plus a parallax hero.
fn build_page() -> ScrollFx {
    let mut fx = ScrollFx::new(Config::default(), false).expect("default config is valid");
    let hero = fx
        .observe(
            Box::new(Rect::new(0.0, 0.0, 1280.0, 720.0)),
            ObservationMode::Repeating,
            None,
        )
        .unwrap();
    fx.add_parallax(ParallaxBinding {
        element: hero,
        speed_factor: 0.4,
        overlay: Default::default(),
    })
    .unwrap();

    let presets = [
        Preset::FadeUp,
        Preset::FadeLeft,
        Preset::ScaleIn,
        Preset::BlurIn,
        Preset::RotateIn,
    ];
    for (g, preset) in presets.iter().enumerate() {
        let group = fx
            .add_reveal_group(&(*preset).into(), ObservationMode::Once)
            .unwrap();
        for i in 0..40 {
            let y = 800.0 + (g * 40 + i) as f32 * 180.0;
            let el = fx
                .observe(
                    Box::new(Rect::new(0.0, y, 300.0, 160.0)),
                    ObservationMode::Once,
                    None,
                )
                .unwrap();
            fx.add_reveal_child(group, el, RevealTrigger::Element(el))
                .unwrap();
        }
    }
    fx
}

fn bench_frames(c: &mut Criterion) {
    c.bench_function("scroll_frame_200_cards", |b| {
        let mut fx = build_page();
        let mut now = 0.0;
        let mut offset = 0.0_f32;
        b.iter(|| {
            now += 16.0;
            offset = (offset + 24.0) % 36_000.0;
            fx.on_scroll(now, &ScrollMetrics::at(offset));
            let viewport = Some(Rect::new(0.0, offset, 1280.0, 720.0));
            let out = fx.frame(now, viewport);
            black_box(out.changes.len() + out.parallax.len());
        })
    });
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
