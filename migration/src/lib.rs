pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_reference_tables;
mod m20250301_000002_create_piece_tables;
mod m20250308_000003_create_identity_tables;
mod m20250315_000004_seed_countries;
mod m20250322_000005_seed_units_of_measure;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_piece_tables::Migration),
            Box::new(m20250308_000003_create_identity_tables::Migration),
            Box::new(m20250315_000004_seed_countries::Migration),
            Box::new(m20250322_000005_seed_units_of_measure::Migration),
        ]
    }
}
