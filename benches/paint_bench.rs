//! Benchmark für den Paint-Pfad pro Frame.
//!
//! Misst Geometrie + Zeichenaufrufe aller Demo-Envelopes gegen den
//! RecordingCanvas sowie einen vollständigen Drag-Zyklus.

use criterion::{criterion_group, criterion_main, Criterion};
use envelope_engine::{DragToken, WidgetId};
use glam::Vec2;
use patch_envelope_editor::{presets, EnvelopeViewOptions, EnvelopeWidget, RecordingCanvas};
use std::hint::black_box;

fn build_widgets() -> Vec<EnvelopeWidget> {
    presets::all()
        .expect("Demo-Presets ungültig")
        .into_iter()
        .enumerate()
        .map(|(i, p)| EnvelopeWidget::new(WidgetId(i as u64), p.spec, p.variant, 24))
        .collect()
}

fn bench_paint_frame(c: &mut Criterion) {
    let store = presets::demo_store();
    let options = EnvelopeViewOptions::default();
    let mut widgets = build_widgets();
    let mut canvas = RecordingCanvas::new();

    c.bench_function("paint_demo_frame", |b| {
        b.iter(|| {
            canvas.clear();
            for widget in &mut widgets {
                widget.paint(
                    &mut canvas,
                    &store,
                    Vec2::ZERO,
                    black_box(Vec2::new(640.0, 140.0)),
                    &options,
                );
            }
            black_box(canvas.calls.len())
        })
    });
}

fn bench_drag_cycle(c: &mut Criterion) {
    let mut store = presets::demo_store();
    let options = EnvelopeViewOptions::default();
    let mut widget = build_widgets().remove(0);
    let mut canvas = RecordingCanvas::new();
    let mut token = DragToken::new();
    widget.paint(&mut canvas, &store, Vec2::ZERO, Vec2::new(640.0, 140.0), &options);

    c.bench_function("drag_cycle_32_moves", |b| {
        b.iter(|| {
            let start = Vec2::new(20.0, 70.0);
            widget.pointer_pressed(start, &mut token);
            for step in 0..32 {
                let pos = start + Vec2::new(step as f32 * 2.0, 0.0);
                black_box(widget.pointer_moved(black_box(pos), &mut store));
            }
            widget.pointer_released(&mut token)
        })
    });
}

criterion_group!(paint_benches, bench_paint_frame, bench_drag_cycle);
criterion_main!(paint_benches);
