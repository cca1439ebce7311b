//! Physical page geometry to pixel page height

use crate::config::PageConfiguration;
use crate::error::BreakError;

/// CSS reference resolution: 96 px per inch
pub const PX_PER_INCH: f32 = 96.0;

pub const MM_PER_INCH: f32 = 25.4;

/// Bias toward slightly short pages so a predicted page never holds more
/// than the export engine will fit
pub const SAFETY_FACTOR: f32 = 0.985;

/// Convert millimetres to CSS pixels
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_INCH / MM_PER_INCH
}

/// Height in pixels of the printable area of one page.
///
/// Always measured along the container's scroll axis: orientation only
/// chooses which physical edge of the sheet runs along it.
pub fn page_height_px(config: &PageConfiguration) -> Result<f32, BreakError> {
    config.validate()?;

    let printable_mm = config.printable_height_mm();
    let height = mm_to_px(printable_mm) * config.font_family.metric_factor() * SAFETY_FACTOR;

    if !(height.is_finite() && height > 0.0) {
        return Err(BreakError::configuration(format!(
            "resolved page height {height} px is not positive"
        )));
    }

    Ok(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FontFamily, Orientation, PageSize};

    fn approx(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} +/- {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_a4_portrait_one_inch_margins() {
        let config = PageConfiguration {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_top: 25.4,
            margin_bottom: 25.4,
            font_family: FontFamily::Default,
            calibration_offset: 0.0,
            min_break_spacing: 50.0,
            ..Default::default()
        };
        let expected = (297.0 - 50.8) * 96.0 / 25.4 * 1.0 * 0.985;
        approx(page_height_px(&config).unwrap(), expected, 1.0);
    }

    #[test]
    fn test_landscape_is_shorter() {
        let portrait = PageConfiguration::default();
        let landscape = PageConfiguration {
            orientation: Orientation::Landscape,
            ..Default::default()
        };
        let expected = (210.0 - 50.8) * 96.0 / 25.4 * 0.985;
        approx(page_height_px(&landscape).unwrap(), expected, 0.01);
        assert!(page_height_px(&landscape).unwrap() < page_height_px(&portrait).unwrap());
    }

    #[test]
    fn test_font_family_scales_height() {
        let base = page_height_px(&PageConfiguration::default()).unwrap();
        let mono = PageConfiguration {
            font_family: FontFamily::Monospace,
            ..Default::default()
        };
        approx(page_height_px(&mono).unwrap(), base * 1.05, 0.01);
    }

    #[test]
    fn test_positive_for_all_standard_layouts() {
        for page_size in [PageSize::A4, PageSize::Letter, PageSize::Legal] {
            for orientation in [Orientation::Portrait, Orientation::Landscape] {
                for font_family in FontFamily::ALL {
                    for margin in [0.0, 10.0, 25.4, 50.0] {
                        let config = PageConfiguration {
                            page_size,
                            orientation,
                            font_family,
                            margin_top: margin,
                            margin_bottom: margin,
                            margin_left: margin,
                            margin_right: margin,
                            ..Default::default()
                        };
                        assert!(page_height_px(&config).unwrap() > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_margins_consuming_page_is_error() {
        let config = PageConfiguration {
            orientation: Orientation::Landscape,
            margin_top: 105.0,
            margin_bottom: 105.0,
            ..Default::default()
        };
        assert!(matches!(
            page_height_px(&config),
            Err(BreakError::Configuration(_))
        ));
    }

    #[test]
    fn test_mm_to_px() {
        approx(mm_to_px(25.4), 96.0, 1e-4);
        approx(mm_to_px(0.0), 0.0, 0.0);
    }
}
