//! One age-band matrix per area, and migration between them.

use std::ops::Range;

use indexmap::map::Entry;
use indexmap::IndexMap;
use smallvec::SmallVec;

use shoal_core::{AreaId, Diagnostics, PopCell, Warning};

use crate::error::ConfigError;
use crate::matrix::AgeBandMatrix;
use crate::migration::MigrationMatrix;

/// Snapshot of one `(age, length)` cell across every area.
type AreaCells = SmallVec<[PopCell; 8]>;

/// The population of one stock across its areas.
///
/// Matrices are kept in area order and are added with the same age range
/// and row windows. Rows reshaped later through [`get_mut`](Self::get_mut)
/// are only migrated while every area agrees on them. Positional indices (as used by [`MigrationMatrix`]) follow
/// that order.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeBandMatrixCollection {
    areas: IndexMap<AreaId, AgeBandMatrix>,
}

impl AgeBandMatrixCollection {
    /// One copy of `template` per area, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAreas`] for an empty area list and
    /// [`ConfigError::DuplicateArea`] if an id repeats.
    pub fn new(areas: &[AreaId], template: &AgeBandMatrix) -> Result<Self, ConfigError> {
        if areas.is_empty() {
            return Err(ConfigError::NoAreas);
        }
        let mut map = IndexMap::with_capacity(areas.len());
        for &area in areas {
            if map.insert(area, template.clone()).is_some() {
                return Err(ConfigError::DuplicateArea { area });
            }
        }
        Ok(Self { areas: map })
    }

    /// Add a matrix for a new area at the end of the area order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateArea`] if the area is already present
    /// and [`ConfigError::LayoutMismatch`] if `matrix` does not share the
    /// collection's layout.
    pub fn push_area(&mut self, area: AreaId, matrix: AgeBandMatrix) -> Result<(), ConfigError> {
        if let Some((_, first)) = self.areas.first() {
            if !first.same_layout(&matrix) {
                return Err(ConfigError::LayoutMismatch { area });
            }
        }
        match self.areas.entry(area) {
            Entry::Occupied(_) => Err(ConfigError::DuplicateArea { area }),
            Entry::Vacant(slot) => {
                slot.insert(matrix);
                Ok(())
            }
        }
    }

    /// Remove an area, keeping the order of the rest.
    ///
    /// The last remaining area cannot be removed; `None` is returned and
    /// the collection is unchanged.
    pub fn remove_area(&mut self, area: AreaId) -> Option<AgeBandMatrix> {
        if self.areas.len() <= 1 {
            return None;
        }
        self.areas.shift_remove(&area)
    }

    /// Matrix for `area`.
    pub fn get(&self, area: AreaId) -> Option<&AgeBandMatrix> {
        self.areas.get(&area)
    }

    /// Mutable matrix for `area`.
    pub fn get_mut(&mut self, area: AreaId) -> Option<&mut AgeBandMatrix> {
        self.areas.get_mut(&area)
    }

    /// Area and matrix at position `index`.
    pub fn get_index(&self, index: usize) -> Option<(AreaId, &AgeBandMatrix)> {
        self.areas.get_index(index).map(|(a, m)| (*a, m))
    }

    /// Area and mutable matrix at position `index`.
    pub fn get_index_mut(&mut self, index: usize) -> Option<(AreaId, &mut AgeBandMatrix)> {
        self.areas.get_index_mut(index).map(|(a, m)| (*a, m))
    }

    /// Position of `area` in the collection order.
    pub fn position(&self, area: AreaId) -> Option<usize> {
        self.areas.get_index_of(&area)
    }

    /// Area ids in order.
    pub fn area_ids(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.areas.keys().copied()
    }

    /// Iterate over `(area, matrix)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (AreaId, &AgeBandMatrix)> + '_ {
        self.areas.iter().map(|(a, m)| (*a, m))
    }

    /// Iterate mutably over `(area, matrix)` in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AreaId, &mut AgeBandMatrix)> + '_ {
        self.areas.iter_mut().map(|(a, m)| (*a, m))
    }

    /// Number of areas.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Always `false`: a collection holds at least one area.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Sum of counts over every area.
    pub fn total_count(&self) -> f64 {
        self.areas.values().map(AgeBandMatrix::total_count).sum()
    }

    /// Sum of biomass over every area.
    pub fn total_biomass(&self) -> f64 {
        self.areas.values().map(AgeBandMatrix::total_biomass).sum()
    }

    // ── Migration ──────────────────────────────────────────────────

    /// Redistribute every age class with the same transfer matrix.
    ///
    /// Each target cell becomes the sum over sources of
    /// `m[target][source] * before[source]`, combined with [`PopCell`]
    /// accumulation. All areas read from the pre-migration state. A matrix
    /// whose size differs from the number of areas is reported and nothing
    /// moves.
    pub fn migrate(&mut self, m: &MigrationMatrix, diag: &dyn Diagnostics) {
        if m.size() != self.len() {
            diag.warn(Warning::MigrationSizeMismatch {
                areas: self.len(),
                matrix: m.size(),
            });
            return;
        }
        self.migrate_with(|_| Some(m), diag);
    }

    /// Redistribute with a transfer matrix chosen per age.
    ///
    /// Ages for which `per_age` returns `None` stay where they are. An age
    /// whose matrix has the wrong size, or whose row window differs between
    /// areas, is reported and skipped.
    pub fn migrate_with<'m, F>(&mut self, mut per_age: F, diag: &dyn Diagnostics)
    where
        F: FnMut(u32) -> Option<&'m MigrationMatrix>,
    {
        let n = self.len();
        let Some((_, first)) = self.areas.first() else {
            return;
        };
        let ages = first.ages();

        let mut before = AreaCells::with_capacity(n);
        for age in ages {
            let Some(m) = per_age(age) else { continue };
            if m.size() != n {
                diag.warn(Warning::MigrationSizeMismatch {
                    areas: n,
                    matrix: m.size(),
                });
                continue;
            }
            let Some(window) = self.shared_window(age) else {
                diag.warn(Warning::MigrationLayoutMismatch { age });
                continue;
            };
            for length in window {
                before.clear();
                before.extend(self.areas.values().map(|a| a.get(age, length)));
                for (target, matrix) in self.areas.values_mut().enumerate() {
                    let moved: PopCell = before
                        .iter()
                        .enumerate()
                        .map(|(source, cell)| *cell * m.get(target, source))
                        .sum();
                    if let Some(slot) = matrix.get_mut(age, length) {
                        *slot = moved;
                    }
                }
            }
        }
    }

    /// Length window of `age`, if every area holds the same one.
    fn shared_window(&self, age: u32) -> Option<Range<usize>> {
        let mut windows = self.areas.values().map(|a| a.row(age).map(|r| r.window()));
        let window = windows.next()??;
        windows
            .all(|w| w.as_ref() == Some(&window))
            .then_some(window)
    }
}
