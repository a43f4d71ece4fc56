//! egui-Anbindung: Pointer-Input → `EnvelopeWidget`, Zeichnen über `EguiCanvas`.

use envelope_engine::{DragToken, ObservableModel, ParameterModel};
use glam::Vec2;

use super::canvas::EguiCanvas;
use super::envelope_widget::EnvelopeWidget;
use crate::shared::EnvelopeViewOptions;

fn to_vec2(p: egui::Pos2) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Reicht Pointer-Events eines Frames an das Widget weiter.
///
/// Releases werden unabhängig vom Hover zugestellt; das Token entscheidet,
/// ob dieses Widget seinen Drag beendet.
pub fn handle_envelope_input<M: ObservableModel>(
    ui: &egui::Ui,
    response: &egui::Response,
    widget: &mut EnvelopeWidget,
    model: &mut M,
    token: &mut DragToken,
) {
    let (pressed, released, latest, moved) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
            i.pointer.delta() != egui::Vec2::ZERO,
        )
    });

    if pressed && response.hovered() {
        // press_origin() ist die exakte Klickposition vor der Drag-Schwelle
        if let Some(pos) = ui.input(|i| i.pointer.press_origin()) {
            widget.pointer_pressed(to_vec2(pos), token);
        }
    }

    // Nur echte Bewegung weiterreichen, sonst schreibt schon der Press-Frame
    if let Some(pos) = latest.filter(|_| moved) {
        if widget.drag_state().is_pressed() || response.hovered() {
            widget.pointer_moved(to_vec2(pos), model);
        }
    }

    if released {
        widget.pointer_released(token);
    }

    if !response.hovered() {
        widget.pointer_exited();
    }
}

/// Belegt eine Zeile im Layout, verarbeitet Input und zeichnet die Envelope.
pub fn show_envelope<M: ObservableModel>(
    ui: &mut egui::Ui,
    widget: &mut EnvelopeWidget,
    model: &mut M,
    token: &mut DragToken,
    options: &EnvelopeViewOptions,
) -> egui::Response {
    let desired = egui::vec2(ui.available_width(), options.widget_height_px);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());

    handle_envelope_input(ui, &response, widget, model, token);

    let painter = ui.painter_at(rect);
    let mut canvas = EguiCanvas::new(&painter);
    let model: &dyn ParameterModel = &*model;
    widget.paint(
        &mut canvas,
        model,
        to_vec2(rect.min),
        Vec2::new(rect.width(), rect.height()),
        options,
    );

    response
}
