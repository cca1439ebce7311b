//! Break generation and incremental extension
//!
//! Both entry points drive the same page-index scan, so extending a sequence
//! always lands on exactly the offsets a full regeneration would produce.

use smallvec::SmallVec;

/// Breaks produced by a single extension, usually one or two
pub type AdditionalBreaks = SmallVec<[f32; 4]>;

/// Strictly increasing break offsets for one container, in pixels from its
/// top edge. The first offset closes page 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakSequence {
    offsets: Vec<f32>,
}

impl BreakSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.offsets.last().copied()
    }

    /// Append extension results in place
    pub fn append(&mut self, additional: &[f32]) {
        debug_assert!(additional
            .first()
            .zip(self.last())
            .map_or(true, |(next, last)| *next > last));
        self.offsets.extend_from_slice(additional);
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }
}

impl From<Vec<f32>> for BreakSequence {
    fn from(offsets: Vec<f32>) -> Self {
        Self { offsets }
    }
}

/// Scan page indices from `first_index` while `index * page_height` stays
/// below `total_height`, handing every accepted candidate to `accept`.
///
/// A candidate is accepted when it is positive and at least `min_spacing`
/// past the previously accepted break. With no previous break the first
/// positive candidate is always taken. Returns the index the scan stopped at.
fn scan_pages(
    first_index: u32,
    mut last_accepted: Option<f32>,
    total_height: f32,
    page_height: f32,
    calibration_offset: f32,
    min_spacing: f32,
    mut accept: impl FnMut(f32),
) -> u32 {
    let mut index = first_index;

    while (index as f32) * page_height < total_height {
        let candidate = (index as f32) * page_height + calibration_offset;

        let spaced = match last_accepted {
            Some(last) => candidate - last >= min_spacing && candidate > last,
            None => true,
        };
        if spaced && candidate > 0.0 {
            accept(candidate);
            last_accepted = Some(candidate);
        }

        index += 1;
    }

    index
}

/// First page index a scan bounded by `height` never visited
fn first_unvisited_index(height: f32, page_height: f32) -> u32 {
    let mut index = (height / page_height).ceil().max(1.0) as u32;
    while index > 1 && ((index - 1) as f32) * page_height >= height {
        index -= 1;
    }
    while (index as f32) * page_height < height {
        index += 1;
    }
    index
}

fn usable(page_height: f32, height: f32) -> bool {
    page_height.is_finite() && page_height > 0.0 && height.is_finite()
}

/// Compute every break for a container of `total_height` pixels.
///
/// Calibration shifts accepted positions but never extends the scan: the
/// loop stops at the first page whose nominal end reaches the content end.
pub fn generate_breaks(
    total_height: f32,
    page_height: f32,
    calibration_offset: f32,
    min_spacing: f32,
) -> BreakSequence {
    let mut offsets = Vec::new();
    if !usable(page_height, total_height) {
        return BreakSequence::from(offsets);
    }

    scan_pages(
        1,
        None,
        total_height,
        page_height,
        calibration_offset,
        min_spacing,
        |offset| offsets.push(offset),
    );

    BreakSequence::from(offsets)
}

/// Compute only the breaks a container gained by growing from `old_height`
/// to `new_height`.
///
/// `existing` must be the sequence generated for `old_height` with the same
/// page parameters. The scan resumes at the first page index the old scan
/// never reached, so no candidate it already judged is revisited.
pub fn extend_breaks(
    existing: &BreakSequence,
    old_height: f32,
    new_height: f32,
    page_height: f32,
    calibration_offset: f32,
    min_spacing: f32,
) -> AdditionalBreaks {
    let mut additional = AdditionalBreaks::new();
    if !usable(page_height, new_height) || !(new_height > old_height) {
        return additional;
    }

    let first_index = first_unvisited_index(old_height, page_height);
    scan_pages(
        first_index,
        existing.last(),
        new_height,
        page_height,
        calibration_offset,
        min_spacing,
        |offset| additional.push(offset),
    );

    additional
}
