//! Integration test: several simulated years of one stock on two areas.
//!
//! Drives the matrix engine the way a model driver would: recruit, grow on
//! a finer grid, apply mortality and predation, migrate, then age. Checks
//! that the bookkeeping stays consistent across the whole run.

use approx::assert_relative_eq;
use shoal_core::{AreaId, LengthEdge, PopCell, RecordingDiagnostics, Warning};
use shoal_length::{check_finer, ConversionIndex};
use shoal_matrix::{AgeBandMatrix, MigrationMatrix, StockConfig};
use shoal_test_utils::grid;

const RECRUITS: f64 = 1000.0;

fn config() -> StockConfig {
    StockConfig::uniform(0, 3, 10.0, 30.0, 2.0, vec![AreaId(10), AreaId(20)]).unwrap()
}

#[test]
fn multi_year_run_stays_consistent() {
    let cfg = config();
    let mut stock = cfg.build_collection().unwrap();
    let diag = RecordingDiagnostics::new();

    let growth_grid = grid(10.0, 30.0, 1.0);
    assert!(check_finer(&cfg.lengths, &growth_grid, &diag));
    let to_growth = ConversionIndex::new(&cfg.lengths, &growth_grid);
    let to_stock = ConversionIndex::new(&growth_grid, &cfg.lengths);
    let same = ConversionIndex::new(&cfg.lengths, &cfg.lengths);

    let migration = MigrationMatrix::from_rows(vec![vec![0.8, 0.3], vec![0.2, 0.7]]).unwrap();
    assert!(migration.is_conserving(1e-12));
    let survival = vec![0.9; cfg.lengths.len()];

    for _year in 0..6 {
        // Recruitment into the youngest, smallest fish of the first area.
        let (_, nursery) = stock.get_index_mut(0).unwrap();
        nursery.set(0, 0, PopCell::new(RECRUITS, 0.01));

        for (_, area) in stock.iter_mut() {
            // Growth: spread onto the fine grid and back.
            let mut fine = AgeBandMatrix::new(area.min_age(), &vec![0..growth_grid.len(); area.age_count()])
                .unwrap();
            fine.add(area, &to_growth, 1.0, area.ages(), &diag);
            let mut regrown = AgeBandMatrix::new(area.min_age(), &vec![0..cfg.lengths.len(); area.age_count()])
                .unwrap();
            regrown.add(&fine, &to_stock, 1.0, area.ages(), &diag);
            assert_relative_eq!(regrown.total_count(), area.total_count(), max_relative = 1e-9);
            *area = regrown;

            let before = area.total_count();
            area.multiply(&survival, &same, &diag);
            assert_relative_eq!(area.total_count(), 0.9 * before, max_relative = 1e-9);

            let prior = area.column_sums();
            let eaten: Vec<f64> = prior.iter().map(|c| 0.1 * c.count).collect();
            area.subtract(&eaten, &same, &prior, &diag);
            assert_relative_eq!(area.total_count(), 0.81 * before, max_relative = 1e-9);
        }

        let before = stock.total_count();
        stock.migrate(&migration, &diag);
        assert_relative_eq!(stock.total_count(), before, max_relative = 1e-9);

        for (_, area) in stock.iter_mut() {
            // Full-width windows lose nothing when ageing.
            let before = area.total_count();
            area.increment_age();
            assert_relative_eq!(area.total_count(), before, max_relative = 1e-9);
            area.filter_counts(1e-6);
        }
    }

    assert!(diag.is_empty(), "unexpected warnings: {:?}", diag.warnings());
    assert!(stock.total_count() > 0.0);
    for (_, area) in stock.iter() {
        assert!(area.row(0).unwrap().cells().iter().all(|c| *c == PopCell::ZERO));
        // Weights are averages of the recruit weight, never sums.
        for row in area.rows() {
            for c in row.cells().iter().filter(|c| c.count > 0.0) {
                assert_relative_eq!(c.weight, 0.01, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn mismatched_growth_grid_is_reported() {
    let cfg = config();
    let diag = RecordingDiagnostics::new();
    let wider = grid(8.0, 30.0, 1.0);
    assert!(check_finer(&cfg.lengths, &wider, &diag));
    assert_eq!(
        diag.warnings(),
        vec![Warning::LengthBoundsMismatch {
            edge: LengthEdge::Minimum,
            coarse: 10.0,
            fine: 8.0,
        }]
    );

    let offset = grid(10.5, 29.5, 1.0);
    assert!(!check_finer(&cfg.lengths, &offset, &diag));
    assert!(matches!(diag.warnings()[1], Warning::NotFiner { .. }));
}
