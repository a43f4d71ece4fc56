//! Vorwärts-Abbildung: Model-Werte → Envelope-Pfad in Screen-Koordinaten.
//!
//! Ablauf pro Render-Pass:
//! 1. y pro Index auflösen (`y_ref`-Wert · `y_scale` + `y_offset`)
//! 2. x pro Index auflösen (direkt skaliert oder aus Winkel + Steigung)
//! 3. Varianten-Nachbearbeitung der Arrays
//! 4. x-Deltas zu absoluten Positionen kumulieren (ohne Clamping)
//! 5. bipolare Werte auf [0, 1] abbilden
//! 6. Segmente (Linie/Bézier) bzw. Treppe bei `stepping`
//! 7. Fill-Polygon bis zur Achsen-Basislinie, Marker, Stage-Hilfslinien
//!
//! Das Ergebnis ist eine reine Funktion der Eingaben und wird pro Frame
//! neu berechnet.

use glam::Vec2;

use crate::curve::{control_points, flatten_cubic};
use crate::model::ParameterModel;
use crate::spec::EnvelopeSpec;
use crate::variant::EnvelopeVariant;

/// Standard-Abtastung gekrümmter Segmente für das Fill-Polygon.
pub const DEFAULT_CURVE_SAMPLES: usize = 24;

/// Zeichenfläche der Envelope in Screen-Koordinaten (y wächst nach unten).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    /// Obere linke Ecke der (bereits eingerückten) Zeichenfläche
    pub origin: Vec2,
    /// Breite und Höhe der Zeichenfläche
    pub size: Vec2,
    /// Rahmenstärke, um die die Fläche eingerückt wurde
    pub border: f32,
}

impl DisplayFrame {
    /// Zeichenfläche ohne Rahmen.
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            border: 0.0,
        }
    }

    /// Zeichenfläche innerhalb eines Widget-Rechtecks, um `border` eingerückt.
    pub fn inset(outer_min: Vec2, outer_size: Vec2, border: f32) -> Self {
        Self {
            origin: outer_min + Vec2::splat(border),
            size: (outer_size - Vec2::splat(2.0 * border)).max(Vec2::ZERO),
            border,
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Absolutes x (relativ zur linken Kante) und normalisiertes y → Screen.
    pub fn to_screen(&self, x_abs: f32, y_norm: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + x_abs,
            self.origin.y + self.height() - y_norm * self.height(),
        )
    }

    /// Screen-x → normalisiertes x in der Zeichenfläche.
    pub fn mouse_to_x(&self, px: f32) -> f32 {
        if self.width() <= 0.0 {
            return 0.0;
        }
        (px - self.origin.x) / self.width()
    }

    /// Screen-y → normalisiertes y (0 = unten, 1 = oben).
    ///
    /// Der Rahmen wird hier ein zweites Mal abgezogen, obwohl `origin` bereits
    /// eingerückt ist. Sieht im Editor korrekter aus; nicht ohne Neuherleitung
    /// aus [`to_screen`](Self::to_screen) ändern.
    pub fn mouse_to_y(&self, py: f32) -> f32 {
        if self.height() <= 0.0 {
            return 0.0;
        }
        1.0 - (py - self.origin.y - self.border) / self.height()
    }

    /// Screen-Position → normalisierte Position.
    pub fn mouse_to_logical(&self, pos: Vec2) -> Vec2 {
        Vec2::new(self.mouse_to_x(pos.x), self.mouse_to_y(pos.y))
    }
}

/// Art eines Pfad-Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    Line,
    /// Kubische Bézier mit zwei Steuerpunkten (Screen-Koordinaten)
    Cubic { c1: Vec2, c2: Vec2 },
}

/// Ein Segment des Envelope-Pfads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn line(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            kind: SegmentKind::Line,
        }
    }

    /// Polylinie des Segments inkl. beider Endpunkte.
    pub fn flatten(&self, samples: usize) -> Vec<Vec2> {
        match self.kind {
            SegmentKind::Line => vec![self.from, self.to],
            SegmentKind::Cubic { c1, c2 } => flatten_cubic(self.from, c1, c2, self.to, samples),
        }
    }
}

/// Art einer Stage-Hilfslinie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    Sustain,
    LoopStart,
    LoopEnd,
}

/// Vertikale Hilfslinie an einem Breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub kind: GuideKind,
    pub index: usize,
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Ergebnis eines Render-Passes. Wird nie persistiert.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEnvelope {
    pub frame: DisplayFrame,
    /// Aufgelöste x-Deltas nach Nachbearbeitung (logisch, vor Layout)
    pub resolved_x: Vec<f32>,
    /// Aufgelöste y-Werte nach Nachbearbeitung (vor bipolarer Abbildung)
    pub resolved_y: Vec<f32>,
    /// Normalisierte Positionen: kumuliertes x, y in [0, 1]
    pub logical: Vec<Vec2>,
    /// Breakpoints in Screen-Koordinaten
    pub points: Vec<Vec2>,
    pub segments: Vec<Segment>,
    /// Geschlossenes Polygon: Basislinie → Pfad → Basislinie
    pub fill_polygon: Vec<Vec2>,
    /// Marker-Mittelpunkte, ein Eintrag pro Breakpoint
    pub markers: Vec<Vec2>,
    pub guides: Vec<Guide>,
    /// Horizontale Achse bei bipolaren Envelopes (`axis > 0`)
    pub axis_line: Option<[Vec2; 2]>,
    /// Screen-y der Fill-Basislinie
    pub baseline_y: f32,
    pub filled: bool,
}

impl RenderedEnvelope {
    /// Summe der absoluten x-Deltas (Screen-Breite des Pfads bis zum letzten Breakpoint).
    pub fn total_width(&self) -> f32 {
        self.points
            .last()
            .map_or(0.0, |last| last.x - self.frame.origin.x)
    }

    /// Pfad als Polylinie (Kurven mit `samples` abgetastet).
    pub fn outline(&self, samples: usize) -> Vec<Vec2> {
        flatten_path(&self.segments, &self.points, samples)
    }
}

/// Berechnet Envelope-Geometrie aus Spec + Model.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeGeometryEngine {
    curve_samples: usize,
}

impl Default for EnvelopeGeometryEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CURVE_SAMPLES)
    }
}

impl EnvelopeGeometryEngine {
    /// `curve_samples`: Abtastung gekrümmter Segmente für das Fill-Polygon.
    pub fn new(curve_samples: usize) -> Self {
        Self {
            curve_samples: curve_samples.max(1),
        }
    }

    pub fn curve_samples(&self) -> usize {
        self.curve_samples
    }

    /// Berechnet Pfad, Fill-Polygon, Marker und Hilfslinien für einen Frame.
    pub fn compute_geometry(
        &self,
        spec: &EnvelopeSpec,
        model: &dyn ParameterModel,
        variant: &dyn EnvelopeVariant,
        frame: DisplayFrame,
    ) -> RenderedEnvelope {
        let (xs, ys) = resolve_values(spec, model, variant);
        let width = frame.width();
        let height = frame.height();

        // Kumulieren: Segmentbreiten proportional zu den Deltas, kein Clamping
        let mut x_abs = Vec::with_capacity(xs.len());
        let mut x_logical = Vec::with_capacity(xs.len());
        for (i, &dx) in xs.iter().enumerate() {
            if i == 0 {
                x_abs.push(dx * width);
                x_logical.push(dx);
            } else {
                x_abs.push(x_abs[i - 1] + dx * width);
                x_logical.push(x_logical[i - 1] + dx);
            }
        }

        let y_norm: Vec<f32> = ys
            .iter()
            .map(|&y| if spec.signed() { y / 2.0 + 0.5 } else { y })
            .collect();

        let logical: Vec<Vec2> = x_logical
            .iter()
            .zip(&y_norm)
            .map(|(&x, &y)| Vec2::new(x, y))
            .collect();
        let points: Vec<Vec2> = x_abs
            .iter()
            .zip(&y_norm)
            .map(|(&x, &y)| frame.to_screen(x, y))
            .collect();

        let segments = if spec.stepping() {
            step_segments(&points, &frame)
        } else {
            curve_segments(spec, model, variant, &points)
        };

        let baseline_y = frame.origin.y + height * (1.0 - spec.axis());
        let fill_polygon = build_fill_polygon(&segments, &points, baseline_y, self.curve_samples);

        let axis_line = (spec.axis() > 0.0).then(|| {
            [
                Vec2::new(frame.origin.x, baseline_y),
                Vec2::new(frame.origin.x + width, baseline_y),
            ]
        });

        let guides = build_guides(spec, model, &points, &frame);

        RenderedEnvelope {
            frame,
            resolved_x: xs,
            resolved_y: ys,
            logical,
            markers: points.clone(),
            points,
            segments,
            fill_polygon,
            guides,
            axis_line,
            baseline_y,
            filled: spec.filled(),
        }
    }
}

/// Löst x-Deltas und y-Werte aller Breakpoints auf (Schritte 1–3).
pub fn resolve_values(
    spec: &EnvelopeSpec,
    model: &dyn ParameterModel,
    variant: &dyn EnvelopeVariant,
) -> (Vec<f32>, Vec<f32>) {
    let breakpoints = spec.breakpoints();

    let mut ys: Vec<f32> = breakpoints
        .iter()
        .enumerate()
        .map(|(i, bp)| {
            let value = match &bp.y_ref {
                Some(key) => variant.preprocess_y(i, key, model.get(key, 0.0)),
                None => 1.0,
            };
            value * bp.y_scale + spec.y_offset()
        })
        .collect();

    let mut xs: Vec<f32> = breakpoints
        .iter()
        .enumerate()
        .map(|(i, bp)| {
            let value = match &bp.x_ref {
                Some(key) => variant.preprocess_x(i, key, model.get(key, 0.0)),
                None => 1.0,
            };
            match bp.angle {
                Some(angle) if i > 0 && spec.is_angle_mode() && bp.uses_angle() => {
                    let rise = (ys[i] - ys[i - 1]).abs() as f64;
                    let slope = (std::f64::consts::FRAC_PI_2 - (angle * value) as f64).tan();
                    (rise / slope) as f32 * bp.x_scale
                }
                _ => value * bp.x_scale,
            }
        })
        .collect();

    variant.post_process(&mut xs, &mut ys);
    (xs, ys)
}

fn curve_segments(
    spec: &EnvelopeSpec,
    model: &dyn ParameterModel,
    variant: &dyn EnvelopeVariant,
    points: &[Vec2],
) -> Vec<Segment> {
    let breakpoints = spec.breakpoints();
    (1..points.len())
        .map(|i| {
            let (from, to) = (points[i - 1], points[i]);
            match variant.curve_amount(i, &breakpoints[i], model) {
                Some(amount) => {
                    let (c1, c2) = control_points(from, to, amount);
                    Segment {
                        from,
                        to,
                        kind: SegmentKind::Cubic { c1, c2 },
                    }
                }
                None => Segment::line(from, to),
            }
        })
        .collect()
}

/// Treppe: pro Breakpoint waagerecht auf altem Level, dann senkrecht auf
/// den neuen; der letzte Level wird bis zum rechten Rand gehalten.
fn step_segments(points: &[Vec2], frame: &DisplayFrame) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        let corner = Vec2::new(pair[1].x, pair[0].y);
        segments.push(Segment::line(pair[0], corner));
        segments.push(Segment::line(corner, pair[1]));
    }
    if let Some(&last) = points.last() {
        let hold = Vec2::new(frame.origin.x + frame.width(), last.y);
        segments.push(Segment::line(last, hold));
    }
    segments
}

fn flatten_path(segments: &[Segment], points: &[Vec2], samples: usize) -> Vec<Vec2> {
    let Some(first) = segments.first() else {
        return points.to_vec();
    };
    let mut outline = vec![first.from];
    for segment in segments {
        outline.extend(segment.flatten(samples).into_iter().skip(1));
    }
    outline
}

fn build_fill_polygon(
    segments: &[Segment],
    points: &[Vec2],
    baseline_y: f32,
    samples: usize,
) -> Vec<Vec2> {
    let outline = flatten_path(segments, points, samples);
    let (Some(first), Some(last)) = (outline.first().copied(), outline.last().copied()) else {
        return Vec::new();
    };

    let mut polygon = Vec::with_capacity(outline.len() + 2);
    polygon.push(Vec2::new(first.x, baseline_y));
    polygon.extend(outline);
    polygon.push(Vec2::new(last.x, baseline_y));
    polygon
}

fn build_guides(
    spec: &EnvelopeSpec,
    model: &dyn ParameterModel,
    points: &[Vec2],
    frame: &DisplayFrame,
) -> Vec<Guide> {
    let stages = spec.stages();
    [
        (GuideKind::Sustain, &stages.sustain),
        (GuideKind::LoopStart, &stages.loop_start),
        (GuideKind::LoopEnd, &stages.loop_end),
    ]
    .into_iter()
    .filter_map(|(kind, reference)| {
        let index = reference.as_ref()?.resolve(model, points.len())?;
        Some(Guide {
            kind,
            index,
            x: points[index].x,
            top: frame.origin.y,
            bottom: frame.origin.y + frame.height(),
        })
    })
    .collect()
}
