//! Bézier-Steuerpunkte für gekrümmte Envelope-Segmente.
//!
//! Ein Segment von `start` nach `end` wird über einen Kurven-Anteil in
//! `[-1, 1]` gebogen. Beide Steuerpunkte wandern dabei von ihrem eigenen
//! Endpunkt aus auf einen gemeinsamen Drittelpunkt zu:
//!
//! - negativ → Startseite `(x1·(1-r) + x2·r, y1)`
//! - positiv → Endseite `(x1·r + x2·(1-r), y2)` (punktsymmetrisch zur Mitte)
//!
//! mit `r = CURVE_RATIO`. Anteil 0 legt beide Steuerpunkte exakt auf die
//! Endpunkte, das Segment bleibt gerade.

use glam::Vec2;

/// Abstand des Drittelpunkts vom jeweiligen Ende (relativ zur Segmentbreite).
pub const CURVE_RATIO: f32 = 1.0 / 3.0;

/// Berechnet `(c1, c2)` für ein Segment; `amount` wird auf `[-1, 1]` geklemmt.
pub fn control_points(start: Vec2, end: Vec2, amount: f32) -> (Vec2, Vec2) {
    let amount = amount.clamp(-1.0, 1.0);
    if amount == 0.0 {
        return (start, end);
    }

    let target = if amount < 0.0 {
        Vec2::new(start.x * (1.0 - CURVE_RATIO) + end.x * CURVE_RATIO, start.y)
    } else {
        Vec2::new(start.x * CURVE_RATIO + end.x * (1.0 - CURVE_RATIO), end.y)
    };

    let blend = amount.abs();
    (start.lerp(target, blend), end.lerp(target, blend))
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Tastet eine kubische Kurve in `samples` gleich große t-Schritte ab
/// (inkl. Start- und Endpunkt, also `samples + 1` Punkte).
pub fn flatten_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, samples: usize) -> Vec<Vec2> {
    let samples = samples.max(1);
    let mut result = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        let t = i as f32 / samples as f32;
        result.push(cubic_bezier(p0, p1, p2, p3, t));
    }
    // Endpunkt exakt übernehmen (Rundung bei t = 1)
    result[samples] = p3;
    result
}
