//! Marker patch protocol for incremental rendering

use crate::config::MarkerStyle;
use crate::layout::BreakSequence;
use crate::render::{BreakMarker, DisplayMarker};
use serde::Serialize;

/// A single update for a container's marker layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MarkerPatch {
    /// Discard existing markers and draw these
    Replace { markers: Vec<BreakMarker> },
    /// Keep existing markers and add these after them
    Append { markers: Vec<BreakMarker> },
    /// Remove every marker
    Clear,
}

impl MarkerPatch {
    /// Patch for a freshly computed sequence
    pub fn replace(breaks: &BreakSequence) -> Self {
        MarkerPatch::Replace {
            markers: BreakMarker::for_sequence(breaks),
        }
    }

    /// Patch for breaks appended to a sequence that already held
    /// `existing_len` offsets
    pub fn append(existing_len: usize, additional: &[f32]) -> Self {
        MarkerPatch::Append {
            markers: BreakMarker::from_offsets(additional, existing_len),
        }
    }

    pub fn markers(&self) -> &[BreakMarker] {
        match self {
            MarkerPatch::Replace { markers } | MarkerPatch::Append { markers } => markers,
            MarkerPatch::Clear => &[],
        }
    }

    /// Whether applying the patch changes nothing
    pub fn is_noop(&self) -> bool {
        matches!(self, MarkerPatch::Append { markers } if markers.is_empty())
    }

    /// Display-ready markers for this patch
    pub fn display(&self, style: &MarkerStyle) -> Vec<DisplayMarker> {
        self.markers().iter().map(|m| m.display(style)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_numbers_from_two() {
        let patch = MarkerPatch::replace(&BreakSequence::from(vec![900.0, 1800.0]));
        let numbers: Vec<_> = patch.markers().iter().map(|m| m.page_number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert!(!patch.is_noop());
    }

    #[test]
    fn test_append_continues_numbering() {
        let patch = MarkerPatch::append(2, &[2700.0]);
        assert_eq!(
            patch.markers(),
            &[BreakMarker { offset: 2700.0, page_number: 4 }]
        );
    }

    #[test]
    fn test_empty_append_is_noop() {
        assert!(MarkerPatch::append(2, &[]).is_noop());
        assert!(!MarkerPatch::Clear.is_noop());
        assert!(MarkerPatch::Clear.markers().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&MarkerPatch::append(0, &[900.0])).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"append","markers":[{"offset":900.0,"pageNumber":2}]}"#
        );
        let json = serde_json::to_string(&MarkerPatch::Clear).unwrap();
        assert_eq!(json, r#"{"kind":"clear"}"#);
    }
}
