//! Page configuration and persisted settings

mod font;
mod style;

pub use font::FontFamily;
pub use style::{LineStyle, MarkerStyle};

use crate::error::BreakError;
use serde::{Deserialize, Serialize};

/// Current settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Standard paper sizes. Settings written before the names were lowercased
/// still load through the aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageSize {
    #[default]
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Legal")]
    Legal,
}

impl PageSize {
    /// Portrait (width, height) in millimetres
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Physical page geometry and typography used to predict breaks.
///
/// The synchronizer only ever reads a snapshot of this; edits go through
/// [`crate::ViewSynchronizer::apply_settings`], which invalidates every cached
/// break sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfiguration {
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// Margins in millimetres
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Nominal font size in points
    pub font_size: f32,
    pub line_height: f32,
    pub font_family: FontFamily,
    /// Pixel shift applied to every break, any sign
    pub calibration_offset: f32,
    /// Minimum pixel distance between accepted breaks
    pub min_break_spacing: f32,
}

impl Default for PageConfiguration {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_top: 25.4, // 1 inch
            margin_bottom: 25.4,
            margin_left: 25.4,
            margin_right: 25.4,
            font_size: 12.0,
            line_height: 1.5,
            font_family: FontFamily::Default,
            calibration_offset: 0.0,
            min_break_spacing: 50.0,
        }
    }
}

impl PageConfiguration {
    /// Page extent along the scroll axis, in millimetres.
    ///
    /// Landscape swaps the page, so its width becomes the flow dimension.
    pub fn flow_dimension_mm(&self) -> f32 {
        let (width, height) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => height,
            Orientation::Landscape => width,
        }
    }

    /// Page extent across the scroll axis, in millimetres
    pub fn cross_dimension_mm(&self) -> f32 {
        let (width, height) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => width,
            Orientation::Landscape => height,
        }
    }

    /// Printable height in millimetres
    pub fn printable_height_mm(&self) -> f32 {
        self.flow_dimension_mm() - self.margin_top - self.margin_bottom
    }

    /// Reject configurations that cannot yield a positive page height
    pub fn validate(&self) -> Result<(), BreakError> {
        let margins = [
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(BreakError::configuration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.margin_top + self.margin_bottom >= self.flow_dimension_mm() {
            return Err(BreakError::configuration(format!(
                "vertical margins ({} mm) consume the whole page ({} mm)",
                self.margin_top + self.margin_bottom,
                self.flow_dimension_mm()
            )));
        }
        if self.margin_left + self.margin_right >= self.cross_dimension_mm() {
            return Err(BreakError::configuration(format!(
                "horizontal margins ({} mm) consume the whole page ({} mm)",
                self.margin_left + self.margin_right,
                self.cross_dimension_mm()
            )));
        }

        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(BreakError::configuration(format!(
                "fontSize must be positive, got {}",
                self.font_size
            )));
        }
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            return Err(BreakError::configuration(format!(
                "lineHeight must be positive, got {}",
                self.line_height
            )));
        }
        if !self.calibration_offset.is_finite() {
            return Err(BreakError::configuration("calibrationOffset must be finite"));
        }
        if !(self.min_break_spacing.is_finite() && self.min_break_spacing >= 0.0) {
            return Err(BreakError::configuration(format!(
                "minBreakSpacing must be non-negative, got {}",
                self.min_break_spacing
            )));
        }

        Ok(())
    }
}

/// Persisted settings envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub version: u32,
    pub page: PageConfiguration,
    pub markers: MarkerStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            page: PageConfiguration::default(),
            markers: MarkerStyle::default(),
        }
    }
}

impl Settings {
    /// Load settings, filling any missing field with its default
    pub fn from_json(json: &str) -> Result<Self, BreakError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.version != SETTINGS_VERSION {
            log::info!(
                "upgrading settings from version {} to {}",
                settings.version,
                SETTINGS_VERSION
            );
            settings.version = SETTINGS_VERSION;
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, BreakError> {
        Ok(serde_json::to_string(self)?)
    }
}
