//! Precomputed mapping between two length-group divisions.

use std::ops::Range;

use crate::division::{same_edge, LengthGroupDivision};

/// How a target grid relates to a source grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// Same bin width and aligned edges: `target = source + offset`.
    SameSpacing {
        /// Constant index shift from source numbering to target numbering.
        offset: isize,
    },
    /// Every target bin lies inside a single source bin, and at least one
    /// source bin holds more than one target bin.
    TargetFiner,
    /// The target is coarser than, or not aligned with, the source.
    TargetCoarser,
}

/// Immutable reconciliation table between a source and a target grid.
///
/// Built once per pair of grids at setup and shared by reference for the
/// rest of the run. Whichever grid is finer is the *fine* side and the other
/// the *coarse* side; the lookup tables are phrased in those terms:
///
/// - [`map_index`](Self::map_index): fine bin → coarse bin holding its midpoint.
/// - [`bin_count`](Self::bin_count): how many fine bins share that coarse bin.
/// - [`min_overlap`](Self::min_overlap) / [`max_overlap`](Self::max_overlap):
///   first/last fine bin at or inside a coarse bound.
///
/// With same spacing the source is the fine side and every mapping is a
/// plain shift by [`offset`](Self::offset).
///
/// # Examples
///
/// ```
/// use shoal_length::{ConversionIndex, LengthGroupDivision};
///
/// let stock = LengthGroupDivision::new(10.0, 20.0, 2.0).unwrap();
/// let growth = LengthGroupDivision::new(10.0, 20.0, 1.0).unwrap();
///
/// let ci = ConversionIndex::new(&stock, &growth);
/// assert!(ci.target_is_finer());
/// assert_eq!(ci.map_index(3), Some(1)); // growth bin [13, 14) sits in stock bin [12, 14)
/// assert_eq!(ci.bin_count(3), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionIndex {
    regime: Regime,
    source_len: usize,
    target_len: usize,
    pos: Vec<Option<usize>>,
    nrof: Vec<usize>,
    min_pos: Vec<Option<usize>>,
    max_pos: Vec<Option<usize>>,
    fine_range: Range<usize>,
}

impl ConversionIndex {
    /// Build the table converting from `source` numbering to `target` numbering.
    pub fn new(source: &LengthGroupDivision, target: &LengthGroupDivision) -> Self {
        if let Some(offset) = aligned_offset(source, target) {
            return Self::build(source, target, Regime::SameSpacing { offset });
        }
        let (pos, _) = midpoint_map(target, source);
        if refines(target, source, &pos) {
            Self::build(target, source, Regime::TargetFiner)
        } else {
            Self::build(source, target, Regime::TargetCoarser)
        }
    }

    fn build(fine: &LengthGroupDivision, coarse: &LengthGroupDivision, regime: Regime) -> Self {
        let (source_len, target_len) = match regime {
            Regime::TargetFiner => (coarse.len(), fine.len()),
            _ => (fine.len(), coarse.len()),
        };
        let (pos, fine_range) = midpoint_map(fine, coarse);

        let mut per_coarse = vec![0usize; coarse.len()];
        for k in pos.iter().flatten() {
            per_coarse[*k] += 1;
        }
        let nrof = pos
            .iter()
            .map(|p| p.map_or(0, |k| per_coarse[k]))
            .collect();

        let mut min_pos = vec![None; coarse.len()];
        let mut max_pos = vec![None; coarse.len()];
        for k in 0..coarse.len() {
            min_pos[k] = fine_range.clone().find(|&i| pos[i].is_some_and(|p| p >= k));
            max_pos[k] = fine_range.clone().rev().find(|&i| pos[i].is_some_and(|p| p <= k));
        }

        Self {
            regime,
            source_len,
            target_len,
            pos,
            nrof,
            min_pos,
            max_pos,
            fine_range,
        }
    }

    /// The relationship between the two grids.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Returns `true` if the grids share bin width and alignment.
    pub fn is_same_spacing(&self) -> bool {
        matches!(self.regime, Regime::SameSpacing { .. })
    }

    /// Index shift `target = source + offset`, when spacing is identical.
    pub fn offset(&self) -> Option<isize> {
        match self.regime {
            Regime::SameSpacing { offset } => Some(offset),
            _ => None,
        }
    }

    /// Returns `true` if the target grid splits source bins into smaller ones.
    pub fn target_is_finer(&self) -> bool {
        self.regime == Regime::TargetFiner
    }

    /// Number of bins in the source grid.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Number of bins in the target grid.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Coarse bin holding the midpoint of fine bin `fine`.
    ///
    /// The fine side is the target when [`target_is_finer`](Self::target_is_finer),
    /// the source otherwise. `None` if the bin lies outside the coarse grid.
    pub fn map_index(&self, fine: usize) -> Option<usize> {
        self.pos.get(fine).copied().flatten()
    }

    /// Number of fine bins that share a coarse bin with fine bin `fine`.
    ///
    /// Zero when `fine` maps outside the coarse grid; callers dividing by
    /// this must check first.
    pub fn bin_count(&self, fine: usize) -> usize {
        self.nrof.get(fine).copied().unwrap_or(0)
    }

    /// Smallest fine bin mapped at or above coarse bin `coarse`.
    pub fn min_overlap(&self, coarse: usize) -> Option<usize> {
        self.min_pos.get(coarse).copied().flatten()
    }

    /// Largest fine bin mapped at or below coarse bin `coarse`.
    pub fn max_overlap(&self, coarse: usize) -> Option<usize> {
        self.max_pos.get(coarse).copied().flatten()
    }

    /// Fine bins that fall inside the coarse grid, as a half-open range.
    pub fn fine_range(&self) -> Range<usize> {
        self.fine_range.clone()
    }

    /// Target bin corresponding to source bin `source`, for the regimes where
    /// that is a single bin (same spacing and coarser target).
    pub fn source_to_target(&self, source: usize) -> Option<usize> {
        match self.regime {
            Regime::SameSpacing { offset } => {
                shift(source, offset).filter(|&t| t < self.target_len)
            }
            Regime::TargetCoarser => self.map_index(source),
            Regime::TargetFiner => None,
        }
    }
}

/// Apply a signed shift to an index, `None` if it would go negative.
pub(crate) fn shift(index: usize, offset: isize) -> Option<usize> {
    index.checked_add_signed(offset)
}

/// Offset between two evenly spaced, aligned grids.
fn aligned_offset(source: &LengthGroupDivision, target: &LengthGroupDivision) -> Option<isize> {
    let (sdl, tdl) = (source.dl()?, target.dl()?);
    if !same_edge(sdl, tdl) {
        return None;
    }
    let steps = (source.min_length() - target.min_length()) / tdl;
    let rounded = steps.round();
    same_edge(steps, rounded).then_some(rounded as isize)
}

/// Map each fine bin's midpoint onto the coarse grid.
///
/// Returns the map and the range of fine bins that landed inside.
fn midpoint_map(
    fine: &LengthGroupDivision,
    coarse: &LengthGroupDivision,
) -> (Vec<Option<usize>>, Range<usize>) {
    let pos: Vec<Option<usize>> = (0..fine.len())
        .map(|i| coarse.bin_of(fine.bin_mean(i)))
        .collect();
    let first = pos.iter().position(Option::is_some);
    let last = pos.iter().rposition(Option::is_some);
    let range = match (first, last) {
        (Some(a), Some(b)) => a..b + 1,
        _ => 0..0,
    };
    (pos, range)
}

/// Returns `true` if every mapped `fine` bin sits wholly inside its `coarse`
/// bin and the mapped fine bins outnumber the coarse bins they hit.
fn refines(
    fine: &LengthGroupDivision,
    coarse: &LengthGroupDivision,
    pos: &[Option<usize>],
) -> bool {
    let mut mapped = 0usize;
    let mut hit = 0usize;
    let mut last = None;
    for (i, p) in pos.iter().enumerate() {
        let Some(k) = *p else { continue };
        let (lo, hi) = (fine.bin_min(i), fine.bin_max(i));
        let lo_ok = lo >= coarse.bin_min(k) || same_edge(lo, coarse.bin_min(k));
        let hi_ok = hi <= coarse.bin_max(k) || same_edge(hi, coarse.bin_max(k));
        if !(lo_ok && hi_ok) {
            return false;
        }
        mapped += 1;
        if last != Some(k) {
            hit += 1;
            last = Some(k);
        }
    }
    mapped > hit
}
