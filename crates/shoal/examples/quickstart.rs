//! Ten simulated years of one stock on three areas.
//!
//! Demonstrates: stock config → collection → recruit → grow on a finer
//! grid → mortality → predation → migrate → age → report.
//!
//! Run with `RUST_LOG=shoal=warn` to see reconciliation warnings.

use shoal::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Shoal Quickstart ===\n");

    let areas = vec![AreaId(1), AreaId(2), AreaId(3)];
    let config = StockConfig::uniform(0, 5, 4.0, 64.0, 4.0, areas).unwrap();
    let mut stock = config.build_collection().unwrap();
    let diag = TracingDiagnostics;

    let growth_grid = LengthGroupDivision::new(4.0, 64.0, 1.0).unwrap();
    check_finer(&config.lengths, &growth_grid, &diag);
    let to_growth = ConversionIndex::new(&config.lengths, &growth_grid);
    let same = ConversionIndex::new(&config.lengths, &config.lengths);
    // Reading the growth grid one stock group higher moves every fish up a
    // group; the largest group grows out of the model.
    let grown_grid = LengthGroupDivision::new(8.0, 68.0, 1.0).unwrap();
    let shift_up = ConversionIndex::new(&grown_grid, &config.lengths);

    let bins = config.lengths.len();
    let survival = vec![0.85; bins];
    let migration = MigrationMatrix::from_rows(vec![
        vec![0.7, 0.2, 0.0],
        vec![0.3, 0.6, 0.3],
        vec![0.0, 0.2, 0.7],
    ])
    .unwrap();
    println!("migration conserving: {}", migration.is_conserving(1e-12));

    for year in 1..=10 {
        let (_, nursery) = stock.get_index_mut(0).unwrap();
        nursery.set(0, 0, PopCell::new(10_000.0, 0.002));

        for (_, area) in stock.iter_mut() {
            // Length growth on the finer grid, pooled back shifted.
            let windows = vec![0..growth_grid.len(); area.age_count()];
            let mut fine = AgeBandMatrix::new(area.min_age(), &windows).unwrap();
            fine.add(area, &to_growth, 1.0, area.ages(), &diag);
            area.set_to_zero();
            area.add(&fine, &shift_up, 1.0, fine.ages(), &diag);

            area.multiply(&survival, &same, &diag);

            let prior = area.column_sums();
            let eaten: Vec<f64> = prior.iter().map(|c| 0.05 * c.count).collect();
            area.subtract(&eaten, &same, &prior, &diag);
        }

        stock.migrate(&migration, &diag);
        for (_, area) in stock.iter_mut() {
            area.increment_age();
            area.filter_counts(1e-3);
        }

        println!(
            "year {year:>2}: {:>10.1} fish, {:>8.2} kg",
            stock.total_count(),
            stock.total_biomass()
        );
    }

    println!("\nNumbers by age and length group, area 2:");
    let area = stock.get(AreaId(2)).unwrap();
    for (age, counts) in area.ages().zip(area.dense_counts()) {
        let cells: Vec<String> = counts.iter().map(|n| format!("{n:7.0}")).collect();
        println!("age {age}: {}", cells.join(""));
    }
}
