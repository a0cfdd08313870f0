//! Cartographic style definitions.
//!
//! The style document is the load-once input to the render engine: it is
//! parsed at initialization and rendered many times, once per tile request.

mod document;
mod error;

pub use document::{Color, StyleDocument, StyleLayer};
pub use error::StyleError;
