//! Feature-Handler für AppCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion.

pub mod history;
pub mod import;
pub mod layers;
pub mod presets;
pub mod styling;
pub mod tools;
pub mod view;
