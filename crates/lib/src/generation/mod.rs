//! # Content-Generation Pipeline
//!
//! A sequence of dependent LLM stages, each with a strict typed schema:
//! research questions → headlines → draft outline → topic sentences →
//! full content → edit/polish. Raw model output passes through the
//! response parser before a stage's result is handed to the next stage.

pub mod parser;
pub mod stages;
pub mod style;
pub mod types;

pub use parser::DataError;
pub use stages::{GenerationError, StageClient};
pub use style::StyleBank;
pub use types::*;
