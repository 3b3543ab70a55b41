use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UnitOfMeasure {
    Table,
    Name,
    Abbreviation,
}

const UNITS: [(&str, &str); 4] = [
    ("Inches", "in"),
    ("Feet", "ft"),
    ("Centimeters", "cm"),
    ("Meters", "m"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(UnitOfMeasure::Table)
            .columns([UnitOfMeasure::Name, UnitOfMeasure::Abbreviation]);
        for (name, abbreviation) in UNITS {
            insert.values_panic([name.into(), abbreviation.into()]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(UnitOfMeasure::Table)
                    .and_where(Expr::col(UnitOfMeasure::Name).is_in(UNITS.map(|(name, _)| name)))
                    .to_owned(),
            )
            .await
    }
}
