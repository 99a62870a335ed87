//! Narrative generation
//!
//! Classifies an aggregated forecast and renders it as plain-language text
//! from fixed templates.

pub mod classify;
pub mod synthesizer;
pub mod templates;

pub use classify::{NarrativeType, classify};
pub use synthesizer::{NarrativeBuilder, NarrativeSummary, build_narrative};
pub use templates::{fill_template, select_template};
