//! UI-Layer: Zeichenprimitive, Envelope-Widget und egui-Anbindung.
//!
//! - `canvas` — `Canvas`-Trait mit egui- und Aufzeichnungs-Backend
//! - `envelope_widget` — toolkit-neutrales View-Model (Paint + Pointer-Events)
//! - `envelope_panel` — egui-Input → Widget, Zeichnen im Layout

pub mod canvas;
mod envelope_panel;
pub mod envelope_widget;

pub use canvas::{Canvas, DrawCall, EguiCanvas, RecordingCanvas};
pub use envelope_panel::{handle_envelope_input, show_envelope};
pub use envelope_widget::EnvelopeWidget;
