//! Hierarchical binning as used by BAI and CSI indexes.
//!
//! Coordinate space is split into `depth + 1` levels. Level 0 is a single bin
//! covering everything; each following level splits every bin of the previous
//! one into 8, down to bins of `1 << min_shift` positions at level `depth`.
//! Bin ids are numbered level by level, so level `l` starts at
//! `(8^l - 1) / 7`.

use std::ops::RangeInclusive;

use crate::types::Region;

/// Largest coordinate an index can address.
pub const MAX_COORDINATE: u32 = 1 << 29;

/// Largest depth whose bin ids (including the metadata bin) fit in 32 bits.
pub const MAX_DEPTH: i32 = 10;

/// Largest supported `min_shift`.
pub const MAX_MIN_SHIFT: i32 = 32;

/// Id of the first bin of level `level`.
fn level_base(level: u32) -> u64 {
    ((1u64 << (3 * level)) - 1) / 7
}

/// Id of the pseudo-bin holding index metadata rather than coordinates.
///
/// This is one past the last real bin: 37450 for the usual depth of 5.
pub fn metadata_bin_id(depth: i32) -> u32 {
    let depth = depth.clamp(0, MAX_DEPTH) as u32;
    (level_base(depth + 1) + 1) as u32
}

/// Whether `min_shift` and `depth` describe a binning scheme this crate can
/// evaluate.
pub fn valid_parameters(min_shift: i32, depth: i32) -> bool {
    (0..=MAX_MIN_SHIFT).contains(&min_shift) && (0..=MAX_DEPTH).contains(&depth)
}

/// The set of bins that may hold records overlapping a query.
///
/// Stored as one inclusive id range per level so that membership is cheap
/// even when the query spans millions of fine bins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBins {
    levels: Vec<RangeInclusive<u32>>,
}

impl CandidateBins {
    pub fn contains(&self, bin_id: u32) -> bool {
        self.levels.iter().any(|range| range.contains(&bin_id))
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels
            .iter()
            .map(|range| (range.end() - range.start()) as usize + 1)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().flat_map(|range| range.clone())
    }
}

/// Bins that may overlap the zero-based, half-open interval `[start, end)`.
///
/// An `end` of 0 or past [`MAX_COORDINATE`] is clamped to it. Empty and
/// out-of-range intervals, as well as invalid binning parameters, select no
/// bins.
pub fn bins_for_range(start: u32, end: u32, min_shift: i32, depth: i32) -> CandidateBins {
    let end = if end == 0 || end > MAX_COORDINATE {
        MAX_COORDINATE
    } else {
        end
    };
    if end <= start || start > MAX_COORDINATE || !valid_parameters(min_shift, depth) {
        return CandidateBins::default();
    }

    let (start, end) = (u64::from(start), u64::from(end - 1));
    let depth = depth as u32;
    let mut shift = min_shift as u32 + depth * 3;

    let mut levels = Vec::with_capacity(depth as usize + 1);
    for level in 0..=depth {
        let base = level_base(level);
        let first = base + (start >> shift);
        let last = base + (end >> shift);
        levels.push(first as u32..=last as u32);
        shift = shift.saturating_sub(3);
    }

    CandidateBins { levels }
}

/// Whether bin `bin_id` of reference `reference_id` can hold records for
/// `region`.
pub fn region_contains_bin(
    region: &Region,
    reference_id: i32,
    bin_id: u32,
    candidates: &CandidateBins,
) -> bool {
    if region.reference_id >= 0 && reference_id != region.reference_id {
        return false;
    }

    if region.is_unconstrained() {
        return true;
    }

    candidates.contains(bin_id)
}
