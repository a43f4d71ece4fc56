//! Interaktive Envelope-Anzeige, unabhängig vom GUI-Toolkit.
//!
//! Das Widget hält Spec, Variante und Drag-Zustand. Geometrie wird bei jedem
//! `paint` aus dem aktuellen Model-Zustand neu berechnet; Maus-Events laufen
//! über den zuletzt gezeichneten Frame zurück ins Model.

use std::cell::Cell;
use std::rc::Rc;

use envelope_engine::{
    DisplayFrame, DragPhase, DragState, DragToken, EnvelopeGeometryEngine, EnvelopeSpec, EnvelopeVariant,
    HitTester, ListenerId, ObservableModel, ParameterModel, RenderedEnvelope, SegmentKind,
    WidgetId,
};
use glam::Vec2;

use super::canvas::Canvas;
use crate::shared::EnvelopeViewOptions;

/// View-Model einer Envelope-Anzeige.
pub struct EnvelopeWidget {
    id: WidgetId,
    spec: EnvelopeSpec,
    variant: Box<dyn EnvelopeVariant>,
    engine: EnvelopeGeometryEngine,
    drag: DragState,
    /// Screen-Position des letzten Pointer-Down
    press_pos: Option<Vec2>,
    /// Wird von Model-Listenern gesetzt, von `take_dirty` zurückgesetzt
    dirty: Rc<Cell<bool>>,
    subscriptions: Vec<(String, ListenerId)>,
    rendered: Option<RenderedEnvelope>,
}

impl std::fmt::Debug for EnvelopeWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeWidget")
            .field("id", &self.id)
            .field("breakpoints", &self.spec.len())
            .field("drag", &self.drag)
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl EnvelopeWidget {
    pub fn new(
        id: WidgetId,
        spec: EnvelopeSpec,
        variant: Box<dyn EnvelopeVariant>,
        curve_samples: usize,
    ) -> Self {
        Self {
            id,
            spec,
            variant,
            engine: EnvelopeGeometryEngine::new(curve_samples),
            drag: DragState::new(),
            press_pos: None,
            dirty: Rc::new(Cell::new(true)),
            subscriptions: Vec::new(),
            rendered: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn spec(&self) -> &EnvelopeSpec {
        &self.spec
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Zuletzt gezeichnete Geometrie.
    pub fn rendered(&self) -> Option<&RenderedEnvelope> {
        self.rendered.as_ref()
    }

    /// Registriert Listener für alle Keys, von denen die Darstellung abhängt.
    pub fn attach(&mut self, model: &mut dyn ObservableModel) {
        self.detach(model);
        for key in self.spec.referenced_keys() {
            let dirty = Rc::clone(&self.dirty);
            let id = model.register(&key, Box::new(move |_, _| dirty.set(true)));
            self.subscriptions.push((key, id));
        }
        log::debug!(
            "Envelope {:?}: {} Model-Keys abonniert",
            self.id,
            self.subscriptions.len()
        );
    }

    /// Entfernt alle Listener dieses Widgets.
    pub fn detach(&mut self, model: &mut dyn ObservableModel) {
        for (key, id) in self.subscriptions.drain(..) {
            model.unregister(&key, id);
        }
    }

    /// True, wenn sich seit dem letzten Aufruf ein abonnierter Wert geändert hat.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Berechnet die Geometrie für ein Widget-Rechteck und merkt sie für Hit-Tests.
    pub fn layout(
        &mut self,
        model: &dyn ParameterModel,
        outer_min: Vec2,
        outer_size: Vec2,
        border: f32,
    ) -> &RenderedEnvelope {
        let frame = DisplayFrame::inset(outer_min, outer_size, border);
        self.rendered.insert(self.engine.compute_geometry(
            &self.spec,
            model,
            self.variant.as_ref(),
            frame,
        ))
    }

    /// Zeichnet Hintergrund, Fläche, Achse, Hilfslinien, Pfad und Marker.
    pub fn paint(
        &mut self,
        canvas: &mut dyn Canvas,
        model: &dyn ParameterModel,
        outer_min: Vec2,
        outer_size: Vec2,
        options: &EnvelopeViewOptions,
    ) {
        let highlight = self.drag.highlight();
        let rendered = self.layout(model, outer_min, outer_size, options.border_px);

        canvas.fill_rect(outer_min, outer_size, options.background_color);

        if rendered.filled {
            canvas.fill_area(&rendered.fill_polygon, rendered.baseline_y, options.fill_color);
        }

        if let Some(axis) = rendered.axis_line {
            canvas.stroke_polyline(&axis, 1.0, options.axis_color);
        }

        for guide in &rendered.guides {
            canvas.dashed_vline(
                guide.x,
                guide.top,
                guide.bottom,
                options.guide_dash_px,
                options.guide_color,
            );
        }

        for segment in &rendered.segments {
            match segment.kind {
                SegmentKind::Line => canvas.stroke_polyline(
                    &[segment.from, segment.to],
                    options.stroke_width_px,
                    options.stroke_color,
                ),
                SegmentKind::Cubic { c1, c2 } => canvas.stroke_cubic(
                    segment.from,
                    c1,
                    c2,
                    segment.to,
                    options.stroke_width_px,
                    options.stroke_color,
                ),
            }
        }

        for (index, &center) in rendered.markers.iter().enumerate() {
            if highlight == Some(index) {
                canvas.circle(
                    center,
                    options.marker_highlight_radius_px,
                    options.marker_highlight_color,
                );
            } else {
                canvas.circle(center, options.marker_radius_px, options.marker_color);
            }
        }
    }

    /// Pointer-Down. Gibt `true` zurück, wenn ein Drag beginnt.
    ///
    /// Ohne vorheriges `paint` gibt es keine Geometrie und damit keinen Treffer.
    pub fn pointer_pressed(&mut self, pos: Vec2, token: &mut DragToken) -> bool {
        let Some(rendered) = self.rendered.as_ref() else {
            return false;
        };
        let mouse = rendered.frame.mouse_to_logical(pos);
        let index = HitTester::new(&self.spec, rendered, self.variant.as_ref())
            .index_at(mouse.x, mouse.y, false);

        if index.is_none() || !token.acquire(self.id) {
            return false;
        }
        self.press_pos = Some(pos);
        self.drag.press(index)
    }

    /// Pointer-Move. Während eines Drags wird der neue Wert ins Model
    /// geschrieben und der gespeicherte (geklemmte) Wert zurückgegeben,
    /// sonst nur der Hover aktualisiert.
    ///
    /// Ein Move auf der Press-Position vor dem ersten echten Move schreibt
    /// nichts: ein Klick auf einen Marker lässt das Model unverändert.
    pub fn pointer_moved(&mut self, pos: Vec2, model: &mut dyn ObservableModel) -> Option<f32> {
        if matches!(self.drag.phase(), DragPhase::Armed(_)) && self.press_pos == Some(pos) {
            return None;
        }
        let rendered = self.rendered.as_ref()?;
        let mouse = rendered.frame.mouse_to_logical(pos);
        let continuation = self.drag.is_continuation();
        let tester = HitTester::new(&self.spec, rendered, self.variant.as_ref())
            .with_active(self.drag.active_index());

        if !self.drag.is_pressed() {
            let hover = tester.index_at(mouse.x, mouse.y, false);
            self.drag.set_hover(hover);
            return None;
        }

        let index = tester.index_at(mouse.x, mouse.y, continuation)?;
        let update = tester.value_for_drag(mouse.x, mouse.y, index, continuation);
        self.drag.advance(index);

        let update = update?;
        let stored = model.set(&update.key, update.value);
        log::trace!(
            "Envelope {:?}: {} = {} (Index {})",
            self.id,
            update.key,
            stored,
            update.index
        );
        Some(stored)
    }

    /// Pointer-Up, egal wo er zugestellt wurde. Beendet den Drag nur, wenn
    /// dieses Widget das Token hält.
    pub fn pointer_released(&mut self, token: &mut DragToken) -> bool {
        if !token.holds(self.id) {
            return false;
        }
        token.release();
        self.drag.release();
        self.press_pos = None;
        true
    }

    /// Pointer verlässt das Widget.
    pub fn pointer_exited(&mut self) {
        self.drag.exit();
    }
}
