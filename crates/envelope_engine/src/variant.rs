//! Hooks konkreter Envelope-Typen.
//!
//! Die Basis-Engine ist variantenneutral. Synth-spezifische Envelopes
//! passen über [`EnvelopeVariant`] das Preprocessing der Model-Werte, die
//! Hit-Policy und die editierbare Achse pro Index an.

use crate::hit_test::{EditAxis, HitPolicy};
use crate::model::ParameterModel;
use crate::spec::{BreakpointSpec, EnvelopeSpec};

/// Anpassungspunkte einer konkreten Envelope-Variante.
///
/// Alle Methoden haben neutrale Defaults: Identität beim Preprocessing,
/// keine Hervorhebung, keine editierbaren Achsen.
pub trait EnvelopeVariant {
    /// Rohwert des x-Keys vor der Skalierung umrechnen.
    fn preprocess_x(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value
    }

    /// Rohwert des y-Keys vor der Skalierung umrechnen.
    fn preprocess_y(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value
    }

    /// Umkehrung von [`preprocess_x`](Self::preprocess_x) für Drag-Werte.
    fn unprocess_x(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value
    }

    /// Umkehrung von [`preprocess_y`](Self::preprocess_y) für Drag-Werte.
    fn unprocess_y(&self, _index: usize, _key: &str, value: f32) -> f32 {
        value
    }

    /// Nachbearbeitung der aufgelösten x/y-Arrays vor dem Layout.
    fn post_process(&self, _xs: &mut [f32], _ys: &mut [f32]) {}

    /// Kurven-Anteil in `[-1, 1]` für das eingehende Segment von `index`.
    fn curve_amount(
        &self,
        _index: usize,
        breakpoint: &BreakpointSpec,
        model: &dyn ParameterModel,
    ) -> Option<f32> {
        breakpoint.curve.as_ref().map(|curve| curve.amount(model))
    }

    /// Abstandsmaß für Hover/Drag-Auswahl.
    fn hit_policy(&self) -> HitPolicy {
        HitPolicy::NoHighlight
    }

    /// Welche Achse eines Index per Drag editiert wird (`None` = fix).
    fn editable_axis(&self, _index: usize, _spec: &EnvelopeSpec) -> Option<EditAxis> {
        None
    }
}

/// Reine Anzeige ohne Interaktion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEnvelope;

impl EnvelopeVariant for PlainEnvelope {}

/// Zeitbasierte Envelope (ADSR, DX-Style Rates): Auswahl nach nächstem x.
///
/// Editiert wird die Zeit-Achse, sofern der Index einen x-Key hat,
/// sonst der Level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeEnvelope;

impl EnvelopeVariant for TimeEnvelope {
    fn hit_policy(&self) -> HitPolicy {
        HitPolicy::NearestByX
    }

    fn editable_axis(&self, index: usize, spec: &EnvelopeSpec) -> Option<EditAxis> {
        let bp = spec.breakpoints().get(index)?;
        if index > 0 && bp.x_ref.is_some() {
            Some(EditAxis::X)
        } else if bp.y_ref.is_some() {
            Some(EditAxis::Y)
        } else {
            None
        }
    }
}

/// Level-Envelope (z.B. Step-Sequencer, Multi-Level-Shapes): Auswahl nach
/// euklidischem Abstand, editiert wird nur y.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelEnvelope;

impl EnvelopeVariant for LevelEnvelope {
    fn hit_policy(&self) -> HitPolicy {
        HitPolicy::NearestByDistance
    }

    fn editable_axis(&self, index: usize, spec: &EnvelopeSpec) -> Option<EditAxis> {
        spec.breakpoints()
            .get(index)
            .and_then(|bp| bp.y_ref.as_ref())
            .map(|_| EditAxis::Y)
    }
}
