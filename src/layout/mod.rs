//! Page geometry and break positions

mod breaks;
pub mod geometry;

pub use breaks::{extend_breaks, generate_breaks, AdditionalBreaks, BreakSequence};
pub use geometry::{mm_to_px, page_height_px, SAFETY_FACTOR};

use crate::config::PageConfiguration;
use crate::error::BreakError;

/// Resolved parameters for one break computation.
///
/// Built once per configuration snapshot so the page height is not
/// re-derived for every container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakParams {
    pub page_height: f32,
    pub calibration_offset: f32,
    pub min_spacing: f32,
}

impl BreakParams {
    pub fn resolve(config: &PageConfiguration) -> Result<Self, BreakError> {
        Ok(Self {
            page_height: page_height_px(config)?,
            calibration_offset: config.calibration_offset,
            min_spacing: config.min_break_spacing,
        })
    }

    /// Full computation for a container of `total_height` pixels
    pub fn generate(&self, total_height: f32) -> BreakSequence {
        generate_breaks(
            total_height,
            self.page_height,
            self.calibration_offset,
            self.min_spacing,
        )
    }

    /// Breaks gained by growing from `old_height` to `new_height`
    pub fn extend(
        &self,
        existing: &BreakSequence,
        old_height: f32,
        new_height: f32,
    ) -> AdditionalBreaks {
        extend_breaks(
            existing,
            old_height,
            new_height,
            self.page_height,
            self.calibration_offset,
            self.min_spacing,
        )
    }
}
