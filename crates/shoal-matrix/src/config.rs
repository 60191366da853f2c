//! Stock layout configuration and validation.
//!
//! [`StockConfig`] describes the shape of one stock's population state:
//! its age range, its length grid, the areas it lives on and, optionally,
//! a per-age window of active length bins. [`validate()`](StockConfig::validate)
//! checks the structural invariants; the `build_*` methods produce zeroed
//! state ready for recruitment.

use std::collections::HashSet;
use std::ops::Range;

use shoal_core::AreaId;
use shoal_length::LengthGroupDivision;

use crate::collection::AgeBandMatrixCollection;
use crate::error::ConfigError;
use crate::matrix::AgeBandMatrix;

/// Layout of one stock's population.
#[derive(Clone, Debug, PartialEq)]
pub struct StockConfig {
    /// Youngest age class.
    pub min_age: u32,
    /// Oldest age class (the plus group).
    pub max_age: u32,
    /// Length grid shared by every age and area.
    pub lengths: LengthGroupDivision,
    /// Areas the stock lives on, in collection order.
    pub areas: Vec<AreaId>,
    /// Active length bins per age, youngest first. `None` means every age
    /// spans the whole grid.
    pub windows: Option<Vec<Range<usize>>>,
}

impl StockConfig {
    /// Evenly spaced grid from `min_length` to `max_length` with width `dl`,
    /// every age spanning the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Length`] if the grid cannot be built. The rest
    /// of the layout is checked by [`validate`](Self::validate).
    pub fn uniform(
        min_age: u32,
        max_age: u32,
        min_length: f64,
        max_length: f64,
        dl: f64,
        areas: Vec<AreaId>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            min_age,
            max_age,
            lengths: LengthGroupDivision::new(min_length, max_length, dl)?,
            areas,
            windows: None,
        })
    }

    /// Number of age classes, `None` if the age range is reversed.
    pub fn age_count(&self) -> Option<usize> {
        self.max_age
            .checked_sub(self.min_age)
            .and_then(|span| usize::try_from(span).ok())
            .and_then(|span| span.checked_add(1))
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Ages ascend.
        let Some(ages) = self.age_count() else {
            return Err(ConfigError::InvalidAgeRange {
                min_age: self.min_age,
                max_age: self.max_age,
            });
        };
        // 2. At least one area, none repeated.
        if self.areas.is_empty() {
            return Err(ConfigError::NoAreas);
        }
        let mut seen = HashSet::with_capacity(self.areas.len());
        for &area in &self.areas {
            if !seen.insert(area) {
                return Err(ConfigError::DuplicateArea { area });
            }
        }
        // 3. One window per age, each inside the grid.
        if let Some(windows) = &self.windows {
            if windows.len() != ages {
                return Err(ConfigError::WindowCount {
                    expected: ages,
                    actual: windows.len(),
                });
            }
            let bins = self.lengths.len();
            for (age, w) in (self.min_age..).zip(windows) {
                if w.start > w.end {
                    return Err(ConfigError::InvalidWindow {
                        age,
                        start: w.start,
                        end: w.end,
                    });
                }
                if w.end > bins {
                    return Err(ConfigError::WindowOutOfRange {
                        age,
                        end: w.end,
                        bins,
                    });
                }
            }
        }
        Ok(())
    }

    /// Row windows, one per age.
    fn row_windows(&self, ages: usize) -> Vec<Range<usize>> {
        match &self.windows {
            Some(w) => w.clone(),
            None => vec![0..self.lengths.len(); ages],
        }
    }

    /// A zeroed matrix for one area.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) error, if any.
    pub fn build_matrix(&self) -> Result<AgeBandMatrix, ConfigError> {
        self.validate()?;
        let ages = self.age_count().unwrap_or(0);
        AgeBandMatrix::new(self.min_age, &self.row_windows(ages))
    }

    /// Zeroed matrices for every configured area.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) error, if any.
    pub fn build_collection(&self) -> Result<AgeBandMatrixCollection, ConfigError> {
        let template = self.build_matrix()?;
        AgeBandMatrixCollection::new(&self.areas, &template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_length::LengthError;

    fn valid_config() -> StockConfig {
        StockConfig::uniform(1, 4, 10.0, 30.0, 2.0, vec![AreaId(1), AreaId(2)]).unwrap()
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn uniform_propagates_grid_errors() {
        let err = StockConfig::uniform(0, 1, 10.0, 5.0, 1.0, vec![AreaId(0)]).unwrap_err();
        match err {
            ConfigError::Length(LengthError::EmptyRange { .. }) => {}
            other => panic!("expected Length(EmptyRange), got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validate_reversed_ages_fails() {
        let mut cfg = valid_config();
        cfg.max_age = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidAgeRange {
                min_age: 1,
                max_age: 0
            })
        );
    }

    #[test]
    fn validate_area_list() {
        let mut cfg = valid_config();
        cfg.areas.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoAreas));
        cfg.areas = vec![AreaId(4), AreaId(4)];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateArea { area: AreaId(4) })
        );
    }

    #[test]
    fn validate_windows() {
        let mut cfg = valid_config();
        cfg.windows = Some(vec![0..5; 3]);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::WindowCount {
                expected: 4,
                actual: 3
            })
        );
        cfg.windows = Some(vec![0..5, 0..10, 2..11, 3..8]);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::WindowOutOfRange {
                age: 3,
                end: 11,
                bins: 10
            })
        );
    }

    #[test]
    fn build_full_grid_matrix() {
        let m = valid_config().build_matrix().unwrap();
        assert_eq!(m.min_age(), 1);
        assert_eq!(m.max_age(), 4);
        assert!(m.rows().iter().all(|r| r.window() == (0..10)));
        assert_eq!(m.total_count(), 0.0);
    }

    #[test]
    fn build_windowed_collection() {
        let mut cfg = valid_config();
        cfg.windows = Some(vec![0..3, 1..6, 2..9, 4..10]);
        let c = cfg.build_collection().unwrap();
        assert_eq!(c.len(), 2);
        let m = c.get(AreaId(2)).unwrap();
        assert_eq!(m.min_length(3), 2);
        assert_eq!(m.max_length(4), 10);
    }
}
