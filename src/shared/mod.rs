//! Geteilte Typen zwischen UI-Layer und Demo-Binary.

pub mod options;

pub use options::EnvelopeViewOptions;
