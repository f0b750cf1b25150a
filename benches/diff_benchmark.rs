//! Diffing engine benchmark: Measure row diff and flush performance.
//!
//! Target: < 200µs for a 200×50 frame with one changed lane

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swimrace::buffer::diff::{diff_full, diff_rows, render_full};
use swimrace::hud::Scene;
use swimrace::terminal::OutputBuffer;
use swimrace::{Action, FrameBuffer, KeyMap, Race, RaceConfig, Renderer, Swimmer, Symbol};

/// Create a frame with distinct content per row.
fn create_test_frame(width: u16, height: u16, seed: u16) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for y in 0..height {
        let text: String = (0..width)
            .map(|x| char::from(b'A' + ((x + y + seed) % 26) as u8))
            .collect();
        frame.set_row(y, &text);
    }
    frame
}

fn diff_identical_frames(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);
    let frame_clone = frame.clone();

    c.bench_function("diff_200x50_identical", |b| {
        b.iter(|| diff_full(black_box(&frame), black_box(&frame_clone)));
    });
}

fn diff_single_row_change(c: &mut Criterion) {
    let frame_a = create_test_frame(200, 50, 0);
    let mut frame_b = frame_a.clone();
    frame_b.set_row(25, "≈≈≈≈≈≈≈≈🏊≈≈≈≈≈≈≈≈");

    c.bench_function("diff_200x50_single_row", |b| {
        b.iter(|| diff_rows(black_box(&frame_a), black_box(&frame_b), [25u16]));
    });
}

fn full_render(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);

    c.bench_function("render_full_200x50", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(65536);
            render_full(black_box(&frame), &mut output);
            output.len()
        });
    });
}

fn race_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("race_frame");
    let scene = Scene::default();

    for (width, height) in [(96, 30), (160, 40), (240, 60)] {
        group.bench_with_input(
            BenchmarkId::new("tick_compose_flush", format!("{width}x{height}")),
            &(width, height),
            |b, &(width, height)| {
                let swimmers = vec![
                    Swimmer::new("Player 1", 0, KeyMap::PLAYER_ONE),
                    Swimmer::new("Player 2", 1, KeyMap::PLAYER_TWO),
                ];
                let mut race = Race::new(swimmers, RaceConfig::default()).unwrap();
                let mut renderer = Renderer::new(width, height);
                let mut sink = Vec::with_capacity(65536);
                let mut now = 0.0;
                b.iter(|| {
                    now += 1.0 / 60.0;
                    race.step([Action::new(0, Symbol::Kick, now)], 1.0 / 60.0);
                    scene.compose(&race, &mut renderer, now);
                    sink.clear();
                    renderer.flush_to(&mut sink).unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    diff_identical_frames,
    diff_single_row_change,
    full_render,
    race_frame,
);
criterion_main!(benches);
