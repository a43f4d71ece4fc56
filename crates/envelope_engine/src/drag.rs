//! Drag-Zustandsmaschine und Drag-Token.
//!
//! `Idle → press → Armed(i) → move → Dragging(i) → release → Idle`
//!
//! Der erste Move nach dem Press ist keine Fortsetzung: er legt den aktiven
//! Index fest. Alle weiteren Moves sind Fortsetzungen und bleiben am Index,
//! auch wenn ein Nachbar inzwischen näher liegt.
//!
//! Release-Events stellt der Host nicht zuverlässig dem Widget zu, das den
//! Drag begonnen hat. Deshalb hält genau ein [`DragToken`] den Besitzer des
//! laufenden Drags; jeder Release beendet den Drag dieses Besitzers.

/// Phase eines Drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Gedrückt, noch kein Move
    Armed(usize),
    Dragging(usize),
}

/// Drag- und Hover-Zustand eines interaktiven Widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragState {
    phase: DragPhase,
    hover: Option<usize>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Index des laufenden Drags (Armed oder Dragging).
    pub fn active_index(&self) -> Option<usize> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Armed(index) | DragPhase::Dragging(index) => Some(index),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// True ab dem zweiten Move eines Drags.
    pub fn is_continuation(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Hervorgehobener Index (Hover oder aktiver Drag).
    pub fn highlight(&self) -> Option<usize> {
        self.active_index().or(self.hover)
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn set_hover(&mut self, index: Option<usize>) {
        self.hover = index;
    }

    /// Pointer-Down auf `index`. Ohne Treffer bleibt der Zustand `Idle`.
    pub fn press(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(index) => {
                log::debug!("Envelope-Drag bereit: Index {}", index);
                self.phase = DragPhase::Armed(index);
                true
            }
            None => {
                self.phase = DragPhase::Idle;
                false
            }
        }
    }

    /// Pointer-Move während gedrückter Taste. Gibt den nun aktiven Index zurück.
    ///
    /// Im Zustand `Idle` passiert nichts.
    pub fn advance(&mut self, index: usize) -> Option<usize> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Armed(_) => {
                log::debug!("Envelope-Drag gestartet: Index {}", index);
                self.phase = DragPhase::Dragging(index);
                Some(index)
            }
            DragPhase::Dragging(active) => Some(active),
        }
    }

    /// Pointer-Up. Gibt den zuletzt aktiven Index zurück.
    pub fn release(&mut self) -> Option<usize> {
        let index = self.active_index();
        if let Some(index) = index {
            log::debug!("Envelope-Drag beendet: Index {}", index);
        }
        self.phase = DragPhase::Idle;
        index
    }

    /// Pointer verlässt das Widget: Hover weg, ein laufender Drag bleibt.
    pub fn exit(&mut self) {
        self.hover = None;
    }
}

/// Identität eines interaktiven Widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u64);

/// Einziger Besitzer des laufenden Drags.
///
/// Wird beim Press erworben und beim ersten Release genau einmal freigegeben.
#[derive(Debug, Default)]
pub struct DragToken {
    owner: Option<WidgetId>,
}

impl DragToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erwirbt das Token. Schlägt fehl, solange ein anderes Widget es hält.
    pub fn acquire(&mut self, id: WidgetId) -> bool {
        match self.owner {
            Some(owner) if owner != id => {
                log::debug!(
                    "Drag-Token belegt von {:?}, Anfrage von {:?} abgelehnt",
                    owner,
                    id
                );
                false
            }
            _ => {
                self.owner = Some(id);
                true
            }
        }
    }

    pub fn holds(&self, id: WidgetId) -> bool {
        self.owner == Some(id)
    }

    pub fn owner(&self) -> Option<WidgetId> {
        self.owner
    }

    /// Gibt das Token frei. Ein zweiter Aufruf liefert `None`.
    pub fn release(&mut self) -> Option<WidgetId> {
        let owner = self.owner.take();
        if owner.is_none() {
            log::debug!("Drag-Token: Release ohne Besitzer ignoriert");
        }
        owner
    }
}
