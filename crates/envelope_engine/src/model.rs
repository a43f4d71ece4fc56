//! Schnittstelle zum externen Parameter-Model und ein In-Memory-Store.
//!
//! Die Engine liest nur über [`ParameterModel`]. Clamping auf Min/Max ist
//! Aufgabe des Models, nicht der Geometrie.

use indexmap::IndexMap;

/// Lesender Zugriff auf Patch-Parameter.
pub trait ParameterModel {
    /// Aktueller Wert oder `default`, wenn der Key nicht gesetzt ist.
    fn get(&self, key: &str, default: f32) -> f32;

    /// Deklariertes Minimum des Keys.
    fn min(&self, key: &str) -> Option<f32>;

    /// Deklariertes Maximum des Keys.
    fn max(&self, key: &str) -> Option<f32>;

    fn min_exists(&self, key: &str) -> bool {
        self.min(key).is_some()
    }

    fn max_exists(&self, key: &str) -> bool {
        self.max(key).is_some()
    }

    /// Klemmt `value` auf die deklarierten Grenzen des Keys.
    fn clamp(&self, key: &str, value: f32) -> f32 {
        let mut v = value;
        if let Some(min) = self.min(key) {
            v = v.max(min);
        }
        if let Some(max) = self.max(key) {
            v = v.min(max);
        }
        v
    }
}

/// Callback bei Wertänderung: `(key, neuer Wert)`.
pub type Listener = Box<dyn FnMut(&str, f32)>;

/// Handle eines registrierten Listeners (für `unregister`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Model mit Änderungs-Benachrichtigung.
pub trait ObservableModel: ParameterModel {
    /// Registriert einen Listener für `key`.
    fn register(&mut self, key: &str, listener: Listener) -> ListenerId;

    /// Entfernt einen Listener. Gibt `false` zurück, wenn er nicht (mehr) existiert.
    fn unregister(&mut self, key: &str, id: ListenerId) -> bool;

    /// Schreibt einen Wert zurück; das Model klemmt. Gibt den gespeicherten Wert zurück.
    fn set(&mut self, key: &str, value: f32) -> f32;
}

/// Deklarierte Grenzen eines Parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamBounds {
    pub min: Option<f32>,
    pub max: Option<f32>,
    /// Ganzzahliger Synth-Parameter: geschriebene Werte werden gerundet
    pub integral: bool,
}

impl ParamBounds {
    /// Ganzzahliger Bereich `[min, max]` (typisch für Synth-Parameter 0..127).
    pub fn int_range(min: i32, max: i32) -> Self {
        Self {
            min: Some(min as f32),
            max: Some(max as f32),
            integral: true,
        }
    }

    /// Kontinuierlicher Bereich `[min, max]`.
    pub fn range(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            integral: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ParamEntry {
    value: Option<f32>,
    bounds: ParamBounds,
}

/// Einfacher Parameter-Store mit Grenzen und Listenern.
///
/// Single-threaded: alle Zugriffe erfolgen auf dem UI-Thread.
#[derive(Default)]
pub struct ParameterStore {
    params: IndexMap<String, ParamEntry>,
    listeners: IndexMap<String, Vec<(ListenerId, Listener)>>,
    next_listener_id: u64,
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field(
                "listener_count",
                &self.listeners.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl ParameterStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deklariert Grenzen für einen Key (ohne Wert zu setzen).
    pub fn declare(&mut self, key: &str, bounds: ParamBounds) -> &mut Self {
        self.params.entry(key.to_string()).or_default().bounds = bounds;
        self
    }

    /// Deklariert Grenzen und setzt einen Startwert (ohne Benachrichtigung).
    pub fn declare_with_value(&mut self, key: &str, bounds: ParamBounds, value: f32) -> &mut Self {
        let entry = self.params.entry(key.to_string()).or_default();
        entry.bounds = bounds;
        entry.value = Some(Self::normalize(bounds, value));
        self
    }

    /// Roher gespeicherter Wert (ohne Default).
    pub fn value(&self, key: &str) -> Option<f32> {
        self.params.get(key).and_then(|e| e.value)
    }

    /// Setzt einen Wert, klemmt auf die Grenzen und benachrichtigt Listener,
    /// falls sich der gespeicherte Wert geändert hat. Gibt den gespeicherten Wert zurück.
    pub fn set(&mut self, key: &str, value: f32) -> f32 {
        let entry = self.params.entry(key.to_string()).or_default();
        let stored = Self::normalize(entry.bounds, value);
        if entry.value == Some(stored) {
            return stored;
        }
        entry.value = Some(stored);

        if let Some(listeners) = self.listeners.get_mut(key) {
            for (_, listener) in listeners.iter_mut() {
                listener(key, stored);
            }
        }
        stored
    }

    /// Anzahl registrierter Listener für `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.get(key).map_or(0, Vec::len)
    }

    fn normalize(bounds: ParamBounds, value: f32) -> f32 {
        let mut v = value;
        if let Some(min) = bounds.min {
            v = v.max(min);
        }
        if let Some(max) = bounds.max {
            v = v.min(max);
        }
        if bounds.integral { v.round() } else { v }
    }
}

impl ParameterModel for ParameterStore {
    fn get(&self, key: &str, default: f32) -> f32 {
        self.value(key).unwrap_or(default)
    }

    fn min(&self, key: &str) -> Option<f32> {
        self.params.get(key).and_then(|e| e.bounds.min)
    }

    fn max(&self, key: &str) -> Option<f32> {
        self.params.get(key).and_then(|e| e.bounds.max)
    }
}

impl ObservableModel for ParameterStore {
    fn register(&mut self, key: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners
            .entry(key.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn unregister(&mut self, key: &str, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(key) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    fn set(&mut self, key: &str, value: f32) -> f32 {
        ParameterStore::set(self, key, value)
    }
}
