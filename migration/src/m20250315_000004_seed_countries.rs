use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Country {
    Table,
    Name,
}

const COUNTRIES: [&str; 12] = [
    "Brazil",
    "Canada",
    "China",
    "Egypt",
    "France",
    "Germany",
    "Italy",
    "Japan",
    "Mexico",
    "Spain",
    "United Kingdom",
    "United States",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Country::Table).columns([Country::Name]);
        for name in COUNTRIES {
            insert.values_panic([name.into()]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Country::Table)
                    .and_where(Expr::col(Country::Name).is_in(COUNTRIES))
                    .to_owned(),
            )
            .await
    }
}
