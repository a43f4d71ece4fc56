//! Beispiel-Envelopes eines kleinen Synth-Patches.
//!
//! Drei typische Formen, alle an denselben [`ParameterStore`] gebunden:
//! - ADSR mit Kurven-Controllern und Sustain-Hilfslinie
//! - Rate/Level-Envelope im Winkel-Modus
//! - bipolarer Step-Sequencer mit Treppen-Darstellung

use anyhow::Context;
use envelope_engine::{
    CurveSource, EditAxis, EnvelopeArrays, EnvelopeSpec, EnvelopeVariant, HitPolicy,
    LevelEnvelope, ParamBounds, ParameterStore, StageGuides, StageRef, TIME, TimeEnvelope,
};
use std::f32::consts::FRAC_PI_2;

/// Höchster Rate-Wert; Rate 99 = schnellster Übergang.
pub const RATE_MAX: f32 = 99.0;
/// Winkel pro Rate-Schritt; die langsamste Rate bleibt unter π/2.
pub const RATE_ANGLE: f32 = 0.9 * FRAC_PI_2 / RATE_MAX;
/// Anzahl der Sequencer-Schritte.
pub const SEQUENCER_STEPS: usize = 8;

/// Eine benannte Envelope mit ihrer Variante.
pub struct Preset {
    pub title: &'static str,
    pub spec: EnvelopeSpec,
    pub variant: Box<dyn EnvelopeVariant>,
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("title", &self.title)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Rate/Level-Envelope: hohe Raten ergeben kurze Segmente.
///
/// Der Winkel-Modus liefert für größere Werte längere Laufweiten, daher wird
/// die Rate vor der Skalierung gespiegelt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateEnvelope;

impl EnvelopeVariant for RateEnvelope {
    fn preprocess_x(&self, _index: usize, _key: &str, value: f32) -> f32 {
        RATE_MAX - value
    }

    fn unprocess_x(&self, _index: usize, _key: &str, value: f32) -> f32 {
        RATE_MAX - value
    }

    fn hit_policy(&self) -> HitPolicy {
        HitPolicy::NearestByX
    }

    fn editable_axis(&self, index: usize, spec: &EnvelopeSpec) -> Option<EditAxis> {
        TimeEnvelope.editable_axis(index, spec)
    }
}

/// Klassische ADSR mit Kurven pro Stage.
pub fn adsr() -> anyhow::Result<Preset> {
    let stage = 0.25 / 99.0;
    let curve = |key: &str| Some(CurveSource::new(key, 0.0, 127.0));
    let spec = EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![
            None,
            Some("env1attack".into()),
            Some("env1decay".into()),
            None,
            Some("env1release".into()),
        ],
        y_refs: vec![
            None,
            None,
            Some("env1sustain".into()),
            Some("env1sustain".into()),
            None,
        ],
        x_scales: vec![0.0, stage, stage, 0.25, stage],
        y_scales: vec![0.0, 1.0, 1.0 / 99.0, 1.0 / 99.0, 0.0],
        angles: None,
        curves: Some(vec![
            None,
            curve("env1attackcurve"),
            curve("env1decaycurve"),
            None,
            curve("env1releasecurve"),
        ]),
    })
    .context("ADSR-Envelope")?
    .with_stages(StageGuides {
        sustain: Some(StageRef::Fixed(3)),
        ..StageGuides::default()
    })
    .context("ADSR-Sustain")?;

    Ok(Preset {
        title: "Amp Envelope (ADSR)",
        spec,
        variant: Box::new(TimeEnvelope),
    })
}

/// Rate/Level-Envelope im Winkel-Modus: Laufweite folgt aus Steigung und Rate.
pub fn rate_level() -> anyhow::Result<Preset> {
    let spec = EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![
            None,
            Some("eg2rate1".into()),
            Some("eg2rate2".into()),
            Some("eg2rate3".into()),
        ],
        y_refs: vec![
            None,
            Some("eg2level1".into()),
            Some("eg2level2".into()),
            None,
        ],
        x_scales: vec![0.0, 0.25, 0.25, 0.25],
        y_scales: vec![0.0, 1.0 / 99.0, 1.0 / 99.0, 0.0],
        angles: Some(vec![TIME, RATE_ANGLE, RATE_ANGLE, RATE_ANGLE]),
        curves: None,
    })
    .context("Rate/Level-Envelope")?;

    Ok(Preset {
        title: "Pitch EG (Rate/Level)",
        spec,
        variant: Box::new(RateEnvelope),
    })
}

/// Bipolarer Step-Sequencer; die Loop-Länge steht im Model.
pub fn step_sequencer() -> anyhow::Result<Preset> {
    let steps = SEQUENCER_STEPS;
    let spec = EnvelopeSpec::new(EnvelopeArrays {
        x_refs: vec![None; steps],
        y_refs: (1..=steps).map(|i| Some(format!("seqstep{i}"))).collect(),
        x_scales: (0..steps)
            .map(|i| if i == 0 { 0.0 } else { 1.0 / steps as f32 })
            .collect(),
        y_scales: vec![1.0 / 63.0; steps],
        angles: None,
        curves: None,
    })
    .context("Step-Sequencer")?
    .with_signed(true)
    .with_stepping(true)
    .with_axis(0.5)
    .context("Step-Sequencer-Achse")?
    .with_stages(StageGuides {
        loop_end: Some(StageRef::Key {
            key: "seqlength".into(),
            offset: -1,
        }),
        ..StageGuides::default()
    })
    .context("Step-Sequencer-Loop")?;

    Ok(Preset {
        title: "Step Sequencer",
        spec,
        variant: Box::new(LevelEnvelope),
    })
}

/// Alle Beispiel-Envelopes in Anzeige-Reihenfolge.
pub fn all() -> anyhow::Result<Vec<Preset>> {
    Ok(vec![adsr()?, rate_level()?, step_sequencer()?])
}

/// Parameter-Store mit Grenzen und Startwerten für alle Beispiel-Keys.
pub fn demo_store() -> ParameterStore {
    let mut store = ParameterStore::new();
    let time = ParamBounds::int_range(0, 99);
    let curve = ParamBounds::int_range(0, 127);

    store
        .declare_with_value("env1attack", time, 20.0)
        .declare_with_value("env1decay", time, 45.0)
        .declare_with_value("env1sustain", time, 70.0)
        .declare_with_value("env1release", time, 60.0)
        .declare_with_value("env1attackcurve", curve, 64.0)
        .declare_with_value("env1decaycurve", curve, 20.0)
        .declare_with_value("env1releasecurve", curve, 30.0);

    for (key, value) in [
        ("eg2rate1", 50.0),
        ("eg2rate2", 40.0),
        ("eg2rate3", 30.0),
        ("eg2level1", 99.0),
        ("eg2level2", 40.0),
    ] {
        store.declare_with_value(key, time, value);
    }

    let pattern = [40.0, -20.0, 63.0, 0.0, -63.0, 25.0, -40.0, 10.0];
    for (i, value) in pattern.iter().enumerate() {
        store.declare_with_value(
            &format!("seqstep{}", i + 1),
            ParamBounds::int_range(-63, 63),
            *value,
        );
    }
    store.declare_with_value(
        "seqlength",
        ParamBounds::int_range(1, SEQUENCER_STEPS as i32),
        SEQUENCER_STEPS as f32,
    );

    store
}
