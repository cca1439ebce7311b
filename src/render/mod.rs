//! Render output: break markers and the patch protocol

mod marker;
mod patch;

pub use marker::{BreakMarker, DisplayMarker};
pub use patch::MarkerPatch;
