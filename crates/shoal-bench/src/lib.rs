//! Benchmark profiles for the Shoal population engine.
//!
//! Provides pre-built stock layouts sized like real assessment models:
//!
//! - [`reference_profile`]: 15 ages, 60 length groups, 4 areas
//! - [`stress_profile`]: 30 ages, 200 length groups, 16 areas
//! - [`growth_grid`]: a grid four times finer than a profile's stock grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use shoal_core::AreaId;
use shoal_length::{LengthGroupDivision, LengthError};
use shoal_matrix::{AgeBandMatrixCollection, StockConfig};
use shoal_test_utils::PopulationGen;

/// A stock layout with a populated collection.
pub struct Profile {
    pub config: StockConfig,
    pub stock: AgeBandMatrixCollection,
}

fn build(ages: u32, groups: usize, areas: u32, seed: u64) -> Profile {
    let max_length = 5.0 + 2.0 * groups as f64;
    let ids = (0..areas).map(AreaId).collect();
    let config = StockConfig::uniform(1, ages, 5.0, max_length, 2.0, ids)
        .unwrap_or_else(|e| panic!("bench profile is invalid: {e}"));
    let template = config
        .build_matrix()
        .unwrap_or_else(|e| panic!("bench profile is invalid: {e}"));
    let stock = PopulationGen::new(seed).collection(areas as usize, &template);
    Profile { config, stock }
}

/// Build the reference profile: 15 ages × 60 length groups × 4 areas.
pub fn reference_profile(seed: u64) -> Profile {
    build(15, 60, 4, seed)
}

/// Build the stress profile: 30 ages × 200 length groups × 16 areas.
pub fn stress_profile(seed: u64) -> Profile {
    build(30, 200, 16, seed)
}

/// Grid over the same span as `config.lengths`, four times finer.
pub fn growth_grid(config: &StockConfig) -> Result<LengthGroupDivision, LengthError> {
    let lengths = &config.lengths;
    let dl = lengths.dl().unwrap_or(1.0) / 4.0;
    LengthGroupDivision::new(lengths.min_length(), lengths.max_length(), dl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_shape() {
        let p = reference_profile(42);
        assert_eq!(p.stock.len(), 4);
        let (_, m) = p.stock.get_index(0).unwrap();
        assert_eq!(m.age_count(), 15);
        assert_eq!(m.width(), 60);
        assert!(p.stock.total_count() > 0.0);
    }

    #[test]
    fn growth_grid_is_finer() {
        let p = reference_profile(1);
        let g = growth_grid(&p.config).unwrap();
        assert_eq!(g.len(), 240);
    }

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(reference_profile(9).stock, reference_profile(9).stock);
    }
}
