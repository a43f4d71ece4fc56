use super::*;
use crate::geometry::{DisplayFrame, EnvelopeGeometryEngine};
use crate::model::{ParamBounds, ParameterStore};
use crate::spec::{EnvelopeArrays, TIME};
use crate::variant::{LevelEnvelope, PlainEnvelope, TimeEnvelope};
use approx::assert_abs_diff_eq;
use glam::Vec2;

fn frame() -> DisplayFrame {
    DisplayFrame::new(Vec2::ZERO, Vec2::new(100.0, 50.0))
}

fn render(
    spec: &EnvelopeSpec,
    store: &ParameterStore,
    variant: &dyn EnvelopeVariant,
) -> RenderedEnvelope {
    EnvelopeGeometryEngine::default().compute_geometry(spec, store, variant, frame())
}

/// Drei Level-Punkte auf y = 0, gleichmäßig über die Breite verteilt.
fn level_spec() -> EnvelopeSpec {
    EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![None, None, None],
        y_refs: vec![Some("l0".into()), Some("l1".into()), Some("l2".into())],
        x_scales: vec![0.0, 0.5, 0.5],
        y_scales: vec![1.0, 1.0, 1.0],
        angles: None,
        curves: None,
    })
    .expect("gültig")
}

fn adsr_spec() -> EnvelopeSpec {
    EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![
            None,
            Some("attack".into()),
            Some("decay".into()),
            None,
            Some("release".into()),
        ],
        y_refs: vec![
            None,
            None,
            Some("sustain".into()),
            Some("sustain".into()),
            None,
        ],
        x_scales: vec![0.0, 0.25 / 99.0, 0.25 / 99.0, 0.25, 0.25 / 99.0],
        y_scales: vec![0.0, 1.0, 1.0 / 99.0, 1.0 / 99.0, 0.0],
        angles: None,
        curves: None,
    })
    .expect("gültig")
}

fn adsr_store() -> ParameterStore {
    let mut store = ParameterStore::new();
    for key in ["attack", "decay", "sustain", "release"] {
        store.declare_with_value(key, ParamBounds::int_range(0, 99), 99.0);
    }
    store
}

// ── index_at ──

#[test]
fn test_ohne_policy_keine_auswahl() {
    let spec = level_spec();
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &PlainEnvelope);
    let tester = HitTester::new(&spec, &rendered, &PlainEnvelope);

    assert_eq!(tester.index_at(0.5, 0.0, false), None);
}

#[test]
fn test_nearest_by_x_ueberspringt_fixe_indizes() {
    let spec = adsr_spec();
    let store = adsr_store();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    // Index 0 hat keine Keys → nicht wählbar
    assert_eq!(tester.index_at(0.0, 0.0, false), Some(1));
    assert_eq!(tester.index_at(0.3, 1.0, false), Some(1));
    assert_eq!(tester.index_at(0.7, 0.0, false), Some(3));
    assert_eq!(tester.index_at(0.95, 0.5, false), Some(4));
}

#[test]
fn test_gleichstand_waehlt_kleinsten_index() {
    let spec = level_spec();
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &LevelEnvelope);
    let tester = HitTester::new(&spec, &rendered, &LevelEnvelope);

    assert_eq!(tester.index_at(0.25, 0.0, false), Some(0));
    assert_eq!(tester.index_at(0.75, 0.0, false), Some(1));
}

#[test]
fn test_nearest_by_distance_beruecksichtigt_hoehe() {
    let spec = level_spec();
    let mut store = ParameterStore::new();
    store.set("l1", 1.0);
    let rendered = render(&spec, &store, &LevelEnvelope);
    let tester = HitTester::new(&spec, &rendered, &LevelEnvelope);

    // x liegt näher an Index 1, y aber auf Höhe von Index 2
    assert_eq!(tester.index_at(0.6, 0.0, false), Some(2));
    assert_eq!(tester.index_at(0.6, 0.9, false), Some(1));
}

#[test]
fn test_index_at_ist_stabil() {
    let spec = adsr_spec();
    let store = adsr_store();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope).with_active(Some(4));

    let first = tester.index_at(0.4, 0.2, false);
    let second = tester.index_at(0.4, 0.2, false);
    assert_eq!(first, second);
    assert_eq!(first, Some(2));
}

#[test]
fn test_continuation_behaelt_aktiven_index() {
    let spec = level_spec();
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &LevelEnvelope);
    let tester = HitTester::new(&spec, &rendered, &LevelEnvelope).with_active(Some(2));

    assert_eq!(tester.index_at(0.1, 0.0, true), Some(2));
    assert_eq!(tester.index_at(0.1, 0.0, false), Some(0));
}

#[test]
fn test_continuation_ohne_aktiven_index_sucht_neu() {
    let spec = level_spec();
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &LevelEnvelope);
    let tester = HitTester::new(&spec, &rendered, &LevelEnvelope).with_active(Some(9));

    assert_eq!(tester.index_at(0.9, 0.0, true), Some(2));
}

// ── value_for_drag ──

#[test]
fn test_drag_y_unipolar_und_bipolar() {
    let spec = level_spec();
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &LevelEnvelope);
    let tester = HitTester::new(&spec, &rendered, &LevelEnvelope);

    let update = tester.value_for_drag(0.5, 0.75, 1, false).expect("editierbar");
    assert_eq!(update.key, "l1");
    assert_eq!(update.axis, EditAxis::Y);
    assert_eq!(update.value, 0.75);
    assert!(!update.continuation);

    let signed = level_spec().with_signed(true);
    let rendered = render(&signed, &store, &LevelEnvelope);
    let tester = HitTester::new(&signed, &rendered, &LevelEnvelope);
    let update = tester.value_for_drag(0.5, 0.75, 1, true).expect("editierbar");
    assert_eq!(update.value, 0.5);
    assert!(update.continuation);
}

#[test]
fn test_drag_y_skaliert_auf_rohwert() {
    let spec = adsr_spec();
    let store = adsr_store();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    let update = tester.value_for_drag(0.75, 0.5, 3, true).expect("Sustain editierbar");
    assert_eq!(update.key, "sustain");
    assert_abs_diff_eq!(update.value, 49.5, epsilon = 1e-3);
}

#[test]
fn test_drag_x_relativ_zum_vorgaenger() {
    let spec = adsr_spec();
    let store = adsr_store();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    let update = tester.value_for_drag(0.375, 0.0, 2, true).expect("Decay editierbar");
    assert_eq!(update.key, "decay");
    assert_eq!(update.axis, EditAxis::X);
    assert_abs_diff_eq!(update.value, 49.5, epsilon = 1e-3);

    // links vom Vorgänger → negativer Rohwert, Klemmen übernimmt das Model
    let update = tester.value_for_drag(0.1, 0.0, 2, true).expect("Decay editierbar");
    assert!(update.value < 0.0);
}

#[test]
fn test_fixer_index_liefert_keinen_wert() {
    let spec = adsr_spec();
    let store = adsr_store();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    assert_eq!(tester.value_for_drag(0.0, 0.0, 0, false), None);
    assert_eq!(tester.value_for_drag(0.5, 0.5, 17, false), None);
}

fn angle_spec(y_scales: Vec<f32>) -> EnvelopeSpec {
    EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![None, Some("rate".into()), None],
        y_refs: vec![None, None, None],
        x_scales: vec![0.0, 1.0, 0.5],
        y_scales,
        angles: Some(vec![TIME, 1.0, TIME]),
        curves: None,
    })
    .expect("gültig")
}

#[test]
fn test_drag_im_winkel_modus_invertiert_steigung() {
    let spec = angle_spec(vec![0.0, 1.0, 0.5]);
    let mut store = ParameterStore::new();
    store.set("rate", 0.5);
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    let at_marker = rendered.logical[1].x;
    let update = tester.value_for_drag(at_marker, 1.0, 1, true).expect("Rate editierbar");
    assert_abs_diff_eq!(update.value, 0.5, epsilon = 1e-4);

    // Maus vor dem Vorgänger → Winkel 0
    let update = tester.value_for_drag(0.0, 1.0, 1, true).expect("Rate editierbar");
    assert_eq!(update.value, 0.0);
}

#[test]
fn test_winkel_ohne_steigung_ist_nicht_umkehrbar() {
    let spec = angle_spec(vec![1.0, 1.0, 0.5]);
    let store = ParameterStore::new();
    let rendered = render(&spec, &store, &TimeEnvelope);
    let tester = HitTester::new(&spec, &rendered, &TimeEnvelope);

    assert_eq!(tester.value_for_drag(0.5, 1.0, 1, true), None);
}

struct ScaledLevel;

impl EnvelopeVariant for ScaledLevel {
    fn preprocess_y(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value / 127.0
    }

    fn unprocess_y(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value * 127.0
    }

    fn hit_policy(&self) -> HitPolicy {
        HitPolicy::NearestByDistance
    }

    fn editable_axis(&self, _index: usize, _spec: &EnvelopeSpec) -> Option<EditAxis> {
        Some(EditAxis::Y)
    }
}

#[test]
fn test_drag_nutzt_unprocess_hook() {
    let spec = level_spec();
    let mut store = ParameterStore::new();
    store.set("l2", 127.0);
    let rendered = render(&spec, &store, &ScaledLevel);
    assert_eq!(rendered.logical[2].y, 1.0);

    let tester = HitTester::new(&spec, &rendered, &ScaledLevel);
    let update = tester.value_for_drag(1.0, 0.5, 2, false).expect("editierbar");
    assert_abs_diff_eq!(update.value, 63.5, epsilon = 1e-4);
}
