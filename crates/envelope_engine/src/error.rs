//! Fehler der Envelope-Konfiguration.

use thiserror::Error;

/// Fehlerhafte Breakpoint-Konfiguration.
///
/// Wird ausschließlich beim Bau eines [`EnvelopeSpec`](crate::EnvelopeSpec)
/// erkannt. Nach erfolgreicher Konstruktion ist kein Render- oder
/// Drag-Pfad mehr fehlbar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Weniger als zwei Breakpoints (Start- und Endpunkt sind Pflicht)
    #[error("Envelope braucht mindestens 2 Breakpoints, erhalten: {0}")]
    TooFewBreakpoints(usize),
    /// Parallele Arrays mit unterschiedlicher Länge
    #[error("Array `{field}` hat Länge {actual}, erwartet {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Winkel weder `TIME` noch in [0, π/2)
    #[error("Winkel an Index {index} außerhalb von [0, π/2): {angle}")]
    InvalidAngle { index: usize, angle: f32 },
    /// Achse außerhalb von [0, 1)
    #[error("Achse muss in [0, 1) liegen, erhalten: {0}")]
    InvalidAxis(f32),
    /// Fester Stage-Index jenseits des letzten Breakpoints
    #[error("Stage `{stage}` verweist auf Index {index}, Envelope hat nur {len} Breakpoints")]
    StageOutOfRange {
        stage: &'static str,
        index: usize,
        len: usize,
    },
}
