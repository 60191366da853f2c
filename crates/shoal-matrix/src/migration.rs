//! Square transfer-fraction matrices between areas.

use crate::error::ConfigError;

/// Fractions of the population moving between areas in one timestep.
///
/// Stored row-major: `get(target, source)` is the fraction of `source`'s
/// population that ends up in `target`. Columns summing to one conserve the
/// total population; that is the caller's responsibility and can be checked
/// with [`is_conserving`](Self::is_conserving).
///
/// ```
/// use shoal_matrix::MigrationMatrix;
///
/// let m = MigrationMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.1, 0.9]]).unwrap();
/// assert_eq!(m.get(0, 1), 0.1);
/// assert!(m.is_conserving(1e-12));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationMatrix {
    size: usize,
    fractions: Vec<f64>,
}

impl MigrationMatrix {
    /// The matrix that moves nothing.
    pub fn identity(size: usize) -> Self {
        let mut fractions = vec![0.0; size * size];
        for i in 0..size {
            fractions[i * size + i] = 1.0;
        }
        Self { size, fractions }
    }

    /// Build from rows indexed by target area.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMigration`] for no rows,
    /// [`ConfigError::MigrationNotSquare`] if a row has the wrong length and
    /// [`ConfigError::MigrationNonFinite`] for a NaN or infinite fraction.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyMigration);
        }
        let mut fractions = Vec::with_capacity(size * size);
        for (target, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ConfigError::MigrationNotSquare {
                    row: target,
                    len: row.len(),
                    size,
                });
            }
            if let Some((source, &value)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(ConfigError::MigrationNonFinite {
                    target,
                    source,
                    value,
                });
            }
            fractions.extend(row);
        }
        Ok(Self { size, fractions })
    }

    /// Number of areas the matrix spans.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fraction of `source` moving to `target`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`size`](Self::size).
    pub fn get(&self, target: usize, source: usize) -> f64 {
        assert!(
            target < self.size && source < self.size,
            "migration index ({target}, {source}) out of range for size {}",
            self.size
        );
        self.fractions[target * self.size + source]
    }

    /// Fractions arriving in `target`, indexed by source.
    pub fn row(&self, target: usize) -> Option<&[f64]> {
        (target < self.size).then(|| &self.fractions[target * self.size..(target + 1) * self.size])
    }

    /// Total fraction leaving each source area, indexed by source.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.size];
        for row in self.fractions.chunks_exact(self.size) {
            for (sum, v) in sums.iter_mut().zip(row) {
                *sum += v;
            }
        }
        sums
    }

    /// Returns `true` if every column sums to one within `tolerance`.
    pub fn is_conserving(&self, tolerance: f64) -> bool {
        self.column_sums()
            .iter()
            .all(|s| (s - 1.0).abs() <= tolerance)
    }
}
