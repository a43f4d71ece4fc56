use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use envelope_engine::{
    CurveSource, DisplayFrame, EnvelopeArrays, EnvelopeGeometryEngine, EnvelopeSpec, HitTester,
    LevelEnvelope, ParamBounds, ParameterStore, TimeEnvelope,
};
use glam::Vec2;
use std::hint::black_box;

/// Multi-Level-Envelope mit `points` Breakpoints, jedes Segment gekrümmt.
fn build_level_envelope(points: usize) -> (EnvelopeSpec, ParameterStore) {
    let mut store = ParameterStore::new();
    let mut arrays = EnvelopeArrays::default();
    let mut curves = Vec::with_capacity(points);

    for i in 0..points {
        let level = format!("level{i}");
        let curve = format!("curve{i}");
        store.declare_with_value(&level, ParamBounds::int_range(0, 127), (i * 37 % 128) as f32);
        store.declare_with_value(&curve, ParamBounds::int_range(0, 127), (i * 11 % 128) as f32);

        arrays.x_refs.push(None);
        arrays.y_refs.push(Some(level));
        arrays
            .x_scales
            .push(if i == 0 { 0.0 } else { 1.0 / (points - 1) as f32 });
        arrays.y_scales.push(1.0 / 127.0);
        curves.push((i > 0).then(|| CurveSource::new(curve, 0.0, 127.0)));
    }
    arrays.curves = Some(curves);

    let spec = EnvelopeSpec::new(arrays).expect("Benchmark-Envelope ungültig");
    (spec, store)
}

fn bench_compute_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_geometry");
    let frame = DisplayFrame::new(Vec2::ZERO, Vec2::new(480.0, 160.0));
    let engine = EnvelopeGeometryEngine::default();

    for &points in &[5usize, 32usize, 256usize] {
        let (spec, store) = build_level_envelope(points);

        group.bench_with_input(BenchmarkId::new("curved", points), &spec, |b, spec| {
            b.iter(|| {
                let rendered =
                    engine.compute_geometry(black_box(spec), &store, &LevelEnvelope, frame);
                black_box(rendered.fill_polygon.len())
            })
        });

        let stepped = spec.clone().with_stepping(true);
        group.bench_with_input(BenchmarkId::new("stepping", points), &stepped, |b, spec| {
            b.iter(|| {
                let rendered =
                    engine.compute_geometry(black_box(spec), &store, &TimeEnvelope, frame);
                black_box(rendered.segments.len())
            })
        });
    }

    group.finish();
}

fn bench_index_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_at");
    let frame = DisplayFrame::new(Vec2::ZERO, Vec2::new(480.0, 160.0));

    for &points in &[32usize, 256usize] {
        let (spec, store) = build_level_envelope(points);
        let rendered =
            EnvelopeGeometryEngine::default().compute_geometry(&spec, &store, &LevelEnvelope, frame);
        let queries: Vec<Vec2> = (0..1024)
            .map(|i| Vec2::new((i % 97) as f32 / 97.0, (i * 7 % 31) as f32 / 31.0))
            .collect();

        group.bench_with_input(BenchmarkId::new("nearest_batch", points), &rendered, |b, r| {
            let tester = HitTester::new(&spec, r, &LevelEnvelope);
            b.iter(|| {
                let mut hits = 0usize;
                for q in &queries {
                    if tester.index_at(black_box(q.x), black_box(q.y), false).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

criterion_group!(geometry_benches, bench_compute_geometry, bench_index_at);
criterion_main!(geometry_benches);
