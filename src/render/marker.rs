//! Break markers: render-ready view of a break sequence

use crate::config::{LineStyle, MarkerStyle};
use crate::layout::BreakSequence;
use serde::Serialize;

/// A single predicted page boundary.
///
/// Page 1 has no leading break, so numbering starts at 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakMarker {
    /// Pixels from the container's top edge
    pub offset: f32,
    pub page_number: u32,
}

impl BreakMarker {
    /// Markers for `offsets`, where the first offset is break number
    /// `first_ordinal` (0-based) within the whole sequence
    pub fn from_offsets(offsets: &[f32], first_ordinal: usize) -> Vec<BreakMarker> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| BreakMarker {
                offset,
                page_number: (first_ordinal + i + 2) as u32,
            })
            .collect()
    }

    pub fn for_sequence(breaks: &BreakSequence) -> Vec<BreakMarker> {
        Self::from_offsets(breaks.offsets(), 0)
    }

    /// Project onto the current style
    pub fn display(&self, style: &MarkerStyle) -> DisplayMarker {
        DisplayMarker {
            y: self.offset,
            label: style
                .show_page_number
                .then(|| format!("Page {}", self.page_number)),
            color: style.line_color.clone(),
            line_style: style.line_style,
            opacity: style.clamped_opacity(),
        }
    }
}

/// Everything a renderer needs to draw one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMarker {
    pub y: f32,
    pub label: Option<String>,
    pub color: String,
    pub line_style: LineStyle,
    pub opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_starts_at_two() {
        let breaks = BreakSequence::from(vec![900.0, 1800.0]);
        let markers = BreakMarker::for_sequence(&breaks);
        assert_eq!(
            markers,
            vec![
                BreakMarker { offset: 900.0, page_number: 2 },
                BreakMarker { offset: 1800.0, page_number: 3 },
            ]
        );
    }

    #[test]
    fn test_numbering_continues_after_prefix() {
        let markers = BreakMarker::from_offsets(&[2700.0], 2);
        assert_eq!(markers[0].page_number, 4);
    }

    #[test]
    fn test_display_respects_badge_toggle() {
        let marker = BreakMarker { offset: 900.0, page_number: 2 };
        let mut style = MarkerStyle::default();

        let shown = marker.display(&style);
        assert_eq!(shown.label.as_deref(), Some("Page 2"));
        assert_eq!(shown.y, 900.0);
        assert_eq!(shown.line_style, LineStyle::Dashed);

        style.show_page_number = false;
        assert_eq!(marker.display(&style).label, None);
    }

    #[test]
    fn test_display_serializes_camel_case() {
        let marker = BreakMarker { offset: 10.0, page_number: 2 };
        let json = serde_json::to_string(&marker.display(&MarkerStyle::default())).unwrap();
        assert!(json.contains("\"lineStyle\":\"dashed\""));
    }
}
