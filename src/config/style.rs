//! Visual style handed to the marker renderer

use serde::{Deserialize, Serialize};

/// Stroke pattern of a break line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Solid,
    #[default]
    Dashed,
    Dotted,
}

/// How break markers look. Display-only: never affects break positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerStyle {
    pub line_color: String,
    pub line_style: LineStyle,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
    pub show_page_number: bool,
    /// Manual visibility toggle
    pub visible: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            line_color: "#888888".to_string(),
            line_style: LineStyle::default(),
            opacity: 0.6,
            show_page_number: true,
            visible: true,
        }
    }
}

impl MarkerStyle {
    /// Opacity limited to the displayable range
    pub fn clamped_opacity(&self) -> f32 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
