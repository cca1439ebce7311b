//! Pagebreak-Preview: predicted page breaks for a live document view
//!
//! This crate provides the core that overlays export page boundaries on an
//! editor:
//! - Page geometry (size, orientation, margins, font) resolved to a pixel height
//! - Break generation with incremental extension as content grows
//! - A per-container break cache invalidated on structural change
//! - A synchronizer that debounces host signals and emits marker patches

pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod render;
pub mod sync;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmBreakPreview;

// Re-export primary types
pub use cache::{BreakCache, BreakState, CacheStats};
pub use config::{
    FontFamily, LineStyle, MarkerStyle, Orientation, PageConfiguration, PageSize, Settings,
};
pub use error::BreakError;
pub use host::{HeightSubscription, Host, MarkerRenderer, MirroredHost};
pub use layout::{extend_breaks, generate_breaks, page_height_px, BreakParams, BreakSequence};
pub use render::{BreakMarker, DisplayMarker, MarkerPatch};
pub use sync::{ViewSynchronizer, GROWTH_HYSTERESIS_PX};

/// Host handle to a scrollable content region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

/// Host handle to an open document view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);
