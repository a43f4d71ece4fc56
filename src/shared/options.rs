//! Darstellungs-Optionen der Envelope-Anzeigen.
//!
//! `EnvelopeViewOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Rahmen & Linien ─────────────────────────────────────────────────

/// Rahmenstärke um die Zeichenfläche in Pixeln.
pub const BORDER_PX: f32 = 2.0;
/// Linienstärke des Envelope-Pfads in Pixeln.
pub const STROKE_WIDTH_PX: f32 = 1.5;
/// Strichlänge der Stage-Hilfslinien in Pixeln.
pub const GUIDE_DASH_PX: f32 = 4.0;

// ── Marker ──────────────────────────────────────────────────────────

/// Marker-Radius in Pixeln.
pub const MARKER_RADIUS_PX: f32 = 3.0;
/// Marker-Radius des hervorgehobenen Breakpoints.
pub const MARKER_HIGHLIGHT_RADIUS_PX: f32 = 5.0;

// ── Geometrie ───────────────────────────────────────────────────────

/// Abtastung gekrümmter Segmente für Fill-Polygone.
pub const CURVE_SAMPLES: usize = 24;
/// Höhe einer Envelope-Anzeige in der Demo.
pub const WIDGET_HEIGHT_PX: f32 = 140.0;

// ── Farben (RGBA) ───────────────────────────────────────────────────

/// Hintergrund der Zeichenfläche (Dunkelgrau).
pub const BACKGROUND_COLOR: [f32; 4] = [0.12, 0.12, 0.14, 1.0];
/// Envelope-Pfad (Hellblau).
pub const STROKE_COLOR: [f32; 4] = [0.35, 0.75, 1.0, 1.0];
/// Fläche unter dem Pfad (Blau, halbtransparent).
pub const FILL_COLOR: [f32; 4] = [0.2, 0.5, 0.9, 0.35];
/// Marker (Weiß).
pub const MARKER_COLOR: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
/// Hervorgehobener Marker (Orange).
pub const MARKER_HIGHLIGHT_COLOR: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
/// Nulllinie bipolarer Envelopes (Grau).
pub const AXIS_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.8];
/// Stage-Hilfslinien (Gelb).
pub const GUIDE_COLOR: [f32; 4] = [0.9, 0.8, 0.2, 0.8];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Darstellungs-Optionen.
/// Wird als `patch_envelope_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeViewOptions {
    // ── Rahmen & Linien ─────────────────────────────────────────
    /// Rahmenstärke in Pixeln
    pub border_px: f32,
    /// Linienstärke des Pfads in Pixeln
    pub stroke_width_px: f32,
    /// Strichlänge der Stage-Hilfslinien
    #[serde(default = "default_guide_dash_px")]
    pub guide_dash_px: f32,

    // ── Marker ──────────────────────────────────────────────────
    /// Marker-Radius in Pixeln
    pub marker_radius_px: f32,
    /// Radius des hervorgehobenen Markers
    pub marker_highlight_radius_px: f32,

    // ── Geometrie ───────────────────────────────────────────────
    /// Abtastung gekrümmter Segmente
    #[serde(default = "default_curve_samples")]
    pub curve_samples: usize,
    /// Höhe einer Anzeige in Pixeln
    #[serde(default = "default_widget_height_px")]
    pub widget_height_px: f32,

    // ── Farben ──────────────────────────────────────────────────
    pub background_color: [f32; 4],
    pub stroke_color: [f32; 4],
    pub fill_color: [f32; 4],
    pub marker_color: [f32; 4],
    pub marker_highlight_color: [f32; 4],
    #[serde(default = "default_axis_color")]
    pub axis_color: [f32; 4],
    #[serde(default = "default_guide_color")]
    pub guide_color: [f32; 4],
}

impl Default for EnvelopeViewOptions {
    fn default() -> Self {
        Self {
            border_px: BORDER_PX,
            stroke_width_px: STROKE_WIDTH_PX,
            guide_dash_px: GUIDE_DASH_PX,

            marker_radius_px: MARKER_RADIUS_PX,
            marker_highlight_radius_px: MARKER_HIGHLIGHT_RADIUS_PX,

            curve_samples: CURVE_SAMPLES,
            widget_height_px: WIDGET_HEIGHT_PX,

            background_color: BACKGROUND_COLOR,
            stroke_color: STROKE_COLOR,
            fill_color: FILL_COLOR,
            marker_color: MARKER_COLOR,
            marker_highlight_color: MARKER_HIGHLIGHT_COLOR,
            axis_color: AXIS_COLOR,
            guide_color: GUIDE_COLOR,
        }
    }
}

fn default_guide_dash_px() -> f32 {
    GUIDE_DASH_PX
}

fn default_curve_samples() -> usize {
    CURVE_SAMPLES
}

fn default_widget_height_px() -> f32 {
    WIDGET_HEIGHT_PX
}

fn default_axis_color() -> [f32; 4] {
    AXIS_COLOR
}

fn default_guide_color() -> [f32; 4] {
    GUIDE_COLOR
}

impl EnvelopeViewOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("patch_envelope_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("patch_envelope_editor.toml")
    }
}
