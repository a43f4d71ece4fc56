//! Envelope-Engine: reine Geometrie- und Interaktionslogik für Envelope-Anzeigen.
//!
//! Toolkit-neutral: kennt weder egui noch einen anderen Renderer.
//! Der Host liest Werte aus einem [`ParameterModel`], lässt sich per
//! [`EnvelopeGeometryEngine`] einen [`RenderedEnvelope`] berechnen und
//! übergibt ihn an seine Zeichenprimitive. Maus-Events laufen über
//! [`HitTester`] und [`DragState`] zurück ins Model.
//!
//! Module:
//! - `spec`     — Breakpoint-Konfiguration inkl. Validierung
//! - `model`    — Model-Schnittstelle + In-Memory-Store mit Listenern
//! - `variant`  — Hooks konkreter Envelope-Typen (Preprocessing, Hit-Policy)
//! - `curve`    — Bézier-Steuerpunkte aus Kurven-Anteil
//! - `geometry` — Vorwärts-Abbildung Werte → Pfad/Fill/Marker
//! - `hit_test` — Rückwärts-Abbildung Maus → Index/Wert
//! - `drag`     — Drag-Zustandsmaschine und Drag-Token

pub mod curve;
pub mod drag;
mod error;
pub mod geometry;
pub mod model;
pub mod spec;
pub mod variant;

pub use curve::{CURVE_RATIO, control_points, cubic_bezier};
pub use drag::{DragPhase, DragState, DragToken, WidgetId};
pub use error::ConfigurationError;
pub use geometry::{
    DisplayFrame, EnvelopeGeometryEngine, Guide, GuideKind, RenderedEnvelope, Segment,
    SegmentKind,
};
pub use hit_test::{DragUpdate, EditAxis, HitPolicy, HitTester};
pub use model::{ListenerId, ObservableModel, ParamBounds, ParameterModel, ParameterStore};
pub use spec::{BreakpointSpec, CurveSource, EnvelopeArrays, EnvelopeSpec, StageGuides, StageRef, TIME};
pub use variant::{EnvelopeVariant, LevelEnvelope, PlainEnvelope, TimeEnvelope};
