//! Font family metric corrections

use serde::{Deserialize, Serialize};

/// Font family used by the export engine.
///
/// Each family carries an empirical factor describing how its line metrics
/// stretch or compress rendered line height relative to the nominal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    #[default]
    Default,
    Serif,
    SansSerif,
    Monospace,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Default,
        FontFamily::Serif,
        FontFamily::SansSerif,
        FontFamily::Monospace,
    ];

    /// Multiplier applied to the printable height
    pub fn metric_factor(self) -> f32 {
        match self {
            FontFamily::Default => 1.0,
            FontFamily::Serif => 1.02,
            FontFamily::SansSerif => 0.98,
            FontFamily::Monospace => 1.05,
        }
    }
}
