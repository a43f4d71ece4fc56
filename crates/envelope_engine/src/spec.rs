//! Breakpoint-Konfiguration einer Envelope-Anzeige.
//!
//! Wird einmal beim Aufbau des Widgets erzeugt und validiert; Längen
//! sind danach fix. Alle Render-Pfade verlassen sich auf die hier
//! geprüften Invarianten.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::error::ConfigurationError;
use crate::model::ParameterModel;

/// Sentinel im Winkel-Array: dieser Index nutzt direkte x-Skalierung.
pub const TIME: f32 = -1.0;

/// Model-Key, der die Krümmung des eingehenden Segments steuert.
///
/// Der Rohwert aus `[min, max]` wird linear auf einen Kurven-Anteil in
/// `[-1, 1]` abgebildet; ungesetzte Keys liegen in der Mitte (gerade Linie).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSource {
    pub key: String,
    pub min: f32,
    pub max: f32,
}

impl CurveSource {
    pub fn new(key: impl Into<String>, min: f32, max: f32) -> Self {
        Self {
            key: key.into(),
            min,
            max,
        }
    }

    /// Kurven-Anteil in `[-1, 1]` für den aktuellen Model-Wert.
    pub fn amount(&self, model: &dyn ParameterModel) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f32::EPSILON {
            return 0.0;
        }
        let center = self.min + span * 0.5;
        let raw = model.get(&self.key, center);
        (((raw - self.min) / span) * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// Ein Vertex der Envelope (inkl. Start- und Endpunkt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointSpec {
    /// Model-Key für den x-Anteil; `None` = Faktor 1
    pub x_ref: Option<String>,
    /// Model-Key für den y-Anteil; `None` = Faktor 1
    pub y_ref: Option<String>,
    pub x_scale: f32,
    pub y_scale: f32,
    /// Winkel in [0, π/2) oder [`TIME`]; nur im Winkel-Modus belegt
    pub angle: Option<f32>,
    /// Krümmung des eingehenden Segments
    pub curve: Option<CurveSource>,
}

impl BreakpointSpec {
    /// True wenn dieser Index seine Laufweite aus dem Winkel ableitet.
    pub fn uses_angle(&self) -> bool {
        matches!(self.angle, Some(a) if a != TIME)
    }
}

/// Verweis auf einen Stage-Index (Sustain, Loop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageRef {
    /// Fester Breakpoint-Index
    Fixed(usize),
    /// Index aus Model-Wert + Offset (z.B. Sustain-Stage 0..3 → Breakpoint 1..4)
    Key { key: String, offset: i32 },
}

impl StageRef {
    /// Löst den Verweis auf. `None` wenn ungesetzt oder außerhalb von `0..len`.
    pub fn resolve(&self, model: &dyn ParameterModel, len: usize) -> Option<usize> {
        let index = match self {
            StageRef::Fixed(index) => *index as i64,
            StageRef::Key { key, offset } => {
                let raw = model.get(key, f32::NAN);
                if raw.is_nan() {
                    return None;
                }
                raw.round() as i64 + *offset as i64
            }
        };
        (index >= 0 && (index as usize) < len).then_some(index as usize)
    }
}

/// Optionale Stage-Markierungen als vertikale Hilfslinien.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageGuides {
    pub sustain: Option<StageRef>,
    pub loop_start: Option<StageRef>,
    pub loop_end: Option<StageRef>,
}

/// Parallele Arrays im Stil der Widget-Konfiguration.
///
/// `angles` und `curves` sind optional; wenn gesetzt, müssen sie dieselbe
/// Länge haben wie die übrigen Arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvelopeArrays {
    pub x_refs: Vec<Option<String>>,
    pub y_refs: Vec<Option<String>>,
    pub x_scales: Vec<f32>,
    pub y_scales: Vec<f32>,
    #[serde(default)]
    pub angles: Option<Vec<f32>>,
    #[serde(default)]
    pub curves: Option<Vec<Option<CurveSource>>>,
}

/// Validierte Envelope-Konfiguration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSpec {
    breakpoints: Vec<BreakpointSpec>,
    angle_mode: bool,
    signed: bool,
    stepping: bool,
    filled: bool,
    axis: f32,
    y_offset: f32,
    stages: StageGuides,
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), ConfigurationError> {
    if expected != actual {
        return Err(ConfigurationError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

impl EnvelopeSpec {
    /// Baut und validiert eine Envelope aus parallelen Arrays.
    pub fn new(arrays: EnvelopeArrays) -> Result<Self, ConfigurationError> {
        let EnvelopeArrays {
            x_refs,
            y_refs,
            x_scales,
            y_scales,
            angles,
            curves,
        } = arrays;

        let len = x_refs.len();
        check_len("y_refs", len, y_refs.len())?;
        check_len("x_scales", len, x_scales.len())?;
        check_len("y_scales", len, y_scales.len())?;
        if let Some(angles) = &angles {
            check_len("angles", len, angles.len())?;
        }
        if let Some(curves) = &curves {
            check_len("curves", len, curves.len())?;
        }
        if len < 2 {
            return Err(ConfigurationError::TooFewBreakpoints(len));
        }

        if let Some(angles) = &angles {
            for (index, &angle) in angles.iter().enumerate() {
                let valid = angle == TIME || (0.0..FRAC_PI_2).contains(&angle);
                if !valid {
                    return Err(ConfigurationError::InvalidAngle { index, angle });
                }
            }
        }

        let angle_mode = angles.is_some();
        let mut curves = curves.map(Vec::into_iter);
        let breakpoints = x_refs
            .into_iter()
            .zip(y_refs)
            .zip(x_scales.into_iter().zip(y_scales))
            .enumerate()
            .map(|(i, ((x_ref, y_ref), (x_scale, y_scale)))| BreakpointSpec {
                x_ref,
                y_ref,
                x_scale,
                y_scale,
                angle: angles.as_ref().map(|a| a[i]),
                curve: curves.as_mut().and_then(Iterator::next).flatten(),
            })
            .collect();

        Ok(Self {
            breakpoints,
            angle_mode,
            signed: false,
            stepping: false,
            filled: true,
            axis: 0.0,
            y_offset: 0.0,
            stages: StageGuides::default(),
        })
    }

    /// Bipolare Darstellung: y aus [-1, 1] wird auf [0, 1] abgebildet.
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Treppen-Darstellung (überschreibt Kurven).
    pub fn with_stepping(mut self, stepping: bool) -> Self {
        self.stepping = stepping;
        self
    }

    pub fn with_filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    pub fn with_y_offset(mut self, y_offset: f32) -> Self {
        self.y_offset = y_offset;
        self
    }

    /// Fill-Basislinie in [0, 1) (0 = unterer Rand).
    pub fn with_axis(mut self, axis: f32) -> Result<Self, ConfigurationError> {
        if !(0.0..1.0).contains(&axis) {
            return Err(ConfigurationError::InvalidAxis(axis));
        }
        self.axis = axis;
        Ok(self)
    }

    /// Stage-Hilfslinien; feste Indizes werden gegen die Länge geprüft.
    pub fn with_stages(mut self, stages: StageGuides) -> Result<Self, ConfigurationError> {
        let len = self.breakpoints.len();
        for (stage, reference) in [
            ("sustain", &stages.sustain),
            ("loop_start", &stages.loop_start),
            ("loop_end", &stages.loop_end),
        ] {
            if let Some(StageRef::Fixed(index)) = reference {
                if *index >= len {
                    return Err(ConfigurationError::StageOutOfRange {
                        stage,
                        index: *index,
                        len,
                    });
                }
            }
        }
        self.stages = stages;
        Ok(self)
    }

    pub fn breakpoints(&self) -> &[BreakpointSpec] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Immer `false` für validierte Specs.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn is_angle_mode(&self) -> bool {
        self.angle_mode
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    pub fn stepping(&self) -> bool {
        self.stepping
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn axis(&self) -> f32 {
        self.axis
    }

    pub fn y_offset(&self) -> f32 {
        self.y_offset
    }

    pub fn stages(&self) -> &StageGuides {
        &self.stages
    }

    /// Alle Model-Keys, von denen die Darstellung abhängt (für Listener-Registrierung).
    pub fn referenced_keys(&self) -> IndexSet<String> {
        let mut keys = IndexSet::new();
        for bp in &self.breakpoints {
            keys.extend(bp.x_ref.iter().cloned());
            keys.extend(bp.y_ref.iter().cloned());
            keys.extend(bp.curve.iter().map(|curve| curve.key.clone()));
        }
        for reference in [
            &self.stages.sustain,
            &self.stages.loop_start,
            &self.stages.loop_end,
        ]
        .into_iter()
        .flatten()
        {
            if let StageRef::Key { key, .. } = reference {
                keys.insert(key.clone());
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests;
