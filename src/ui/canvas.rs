//! Zeichenprimitive für Envelope-Anzeigen.
//!
//! Das Widget zeichnet ausschließlich über [`Canvas`]. [`EguiCanvas`] setzt
//! die Aufrufe auf einen `egui::Painter` um, [`RecordingCanvas`] protokolliert
//! sie für Tests.

use glam::Vec2;

/// RGBA-Farbe mit Komponenten in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Zeichenfähigkeiten, die eine Envelope-Anzeige braucht.
pub trait Canvas {
    /// Gefülltes Rechteck (Hintergrund).
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);

    /// Offene Polylinie.
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba);

    /// Kubische Bézier von `from` nach `to`.
    fn stroke_cubic(&mut self, from: Vec2, c1: Vec2, c2: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fläche zwischen einer Polylinie und der Horizontalen `baseline_y`.
    ///
    /// Die Polylinie darf konkav sein und die Basislinie kreuzen.
    fn fill_area(&mut self, outline: &[Vec2], baseline_y: f32, color: Rgba);

    /// Gefüllter Kreis.
    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Gestrichelte vertikale Linie.
    fn dashed_vline(&mut self, x: f32, top: f32, bottom: f32, dash: f32, color: Rgba);
}

/// Zerlegt die Fläche zwischen `outline` und `baseline_y` in Dreiecke.
///
/// Pro Segment ein Trapez aus zwei Dreiecken. Kreuzt ein Segment die
/// Basislinie, wird es am Schnittpunkt geteilt und ergibt je ein Dreieck
/// oberhalb und unterhalb. Senkrechte Segmente haben keine Fläche.
pub fn area_triangles(outline: &[Vec2], baseline_y: f32) -> Vec<[Vec2; 3]> {
    let mut triangles = Vec::with_capacity(outline.len().saturating_sub(1) * 2);
    for pair in outline.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.x == b.x {
            continue;
        }
        let a_base = Vec2::new(a.x, baseline_y);
        let b_base = Vec2::new(b.x, baseline_y);
        let (da, db) = (a.y - baseline_y, b.y - baseline_y);

        if da * db < 0.0 {
            let t = da / (da - db);
            let cross = Vec2::new(a.x + (b.x - a.x) * t, baseline_y);
            triangles.push([a, cross, a_base]);
            triangles.push([cross, b, b_base]);
        } else {
            triangles.push([a, b, b_base]);
            triangles.push([a, b_base, a_base]);
        }
    }
    triangles
}

// ── egui ────────────────────────────────────────────────────────────

/// Canvas über einem `egui::Painter`.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self { painter }
    }
}

fn to_pos(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn to_color(c: Rgba) -> egui::Color32 {
    egui::Rgba::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]).into()
}

impl Canvas for EguiCanvas<'_> {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let rect = egui::Rect::from_min_size(to_pos(min), egui::vec2(size.x, size.y));
        self.painter.rect_filled(rect, 0.0, to_color(color));
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().copied().map(to_pos).collect();
        self.painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(width, to_color(color)),
        ));
    }

    fn stroke_cubic(&mut self, from: Vec2, c1: Vec2, c2: Vec2, to: Vec2, width: f32, color: Rgba) {
        let shape = egui::epaint::CubicBezierShape::from_points_stroke(
            [to_pos(from), to_pos(c1), to_pos(c2), to_pos(to)],
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(width, to_color(color)),
        );
        self.painter.add(shape);
    }

    fn fill_area(&mut self, outline: &[Vec2], baseline_y: f32, color: Rgba) {
        // convex_polygon füllt keine konkaven Flächen → Dreiecke als Mesh
        let color = to_color(color);
        let mut mesh = egui::Mesh::default();
        for triangle in area_triangles(outline, baseline_y) {
            let base = mesh.vertices.len() as u32;
            for corner in triangle {
                mesh.colored_vertex(to_pos(corner), color);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        if !mesh.is_empty() {
            self.painter.add(egui::Shape::mesh(mesh));
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(to_pos(center), radius, to_color(color));
    }

    fn dashed_vline(&mut self, x: f32, top: f32, bottom: f32, dash: f32, color: Rgba) {
        let stroke = egui::Stroke::new(1.0, to_color(color));
        self.painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(x, top), egui::pos2(x, bottom)],
            stroke,
            dash,
            dash,
        ));
    }
}

// ── Protokoll ───────────────────────────────────────────────────────

/// Ein aufgezeichneter Zeichenaufruf.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rect {
        min: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: Rgba,
    },
    Cubic {
        from: Vec2,
        c1: Vec2,
        c2: Vec2,
        to: Vec2,
    },
    Area {
        outline: Vec<Vec2>,
        baseline_y: f32,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Guide {
        x: f32,
        top: f32,
        bottom: f32,
    },
}

/// Canvas ohne Ausgabe, das alle Aufrufe in Reihenfolge speichert.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Alle gezeichneten Kreise als `(Mittelpunkt, Radius)`.
    pub fn circles(&self) -> Vec<(Vec2, f32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Rect { min, size, color });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn stroke_cubic(&mut self, from: Vec2, c1: Vec2, c2: Vec2, to: Vec2, _width: f32, _color: Rgba) {
        self.calls.push(DrawCall::Cubic { from, c1, c2, to });
    }

    fn fill_area(&mut self, outline: &[Vec2], baseline_y: f32, color: Rgba) {
        self.calls.push(DrawCall::Area {
            outline: outline.to_vec(),
            baseline_y,
            color,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn dashed_vline(&mut self, x: f32, top: f32, bottom: f32, _dash: f32, _color: Rgba) {
        self.calls.push(DrawCall::Guide { x, top, bottom });
    }
}
