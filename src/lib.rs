//! Patch Envelope Editor Library.
//! Host-Seite der Envelope-Anzeigen: Optionen, Zeichen-Backends, Widget und Beispiel-Patches.

pub mod presets;
pub mod shared;
pub mod ui;

pub use envelope_engine;
pub use presets::{Preset, RateEnvelope};
pub use shared::EnvelopeViewOptions;
pub use ui::{Canvas, DrawCall, EguiCanvas, EnvelopeWidget, RecordingCanvas};
