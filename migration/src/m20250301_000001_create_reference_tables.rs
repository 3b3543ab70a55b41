use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Museum {
    Table,
    Id,
    Name,
    ShortName,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Location {
    Table,
    Id,
    MuseumId,
    Name,
    Address1,
    Address2,
    City,
    State,
    ZipCode,
    CountryId,
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
    MuseumId,
    Name,
    AlsoKnownAs,
    City,
    State,
    CountryId,
    Birthdate,
    Deathdate,
}

#[derive(DeriveIden, Clone, Copy)]
enum Genre {
    Table,
    Id,
    MuseumId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum Subgenre {
    Table,
    Id,
    MuseumId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum Medium {
    Table,
    Id,
    MuseumId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum SubjectMatter {
    Table,
    Id,
    MuseumId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum Inspector {
    Table,
    Id,
    MuseumId,
    Name,
}

#[derive(DeriveIden)]
enum ArtistSubjectMatter {
    Table,
    ArtistId,
    SubjectMatterId,
}

#[derive(DeriveIden)]
enum Acquisition {
    Table,
    Id,
    MuseumId,
    Date,
    Cost,
    PieceSource,
    FundingSource,
    Terms,
}

#[derive(DeriveIden)]
enum UnitOfMeasure {
    Table,
    Id,
    Name,
    Abbreviation,
}

#[derive(DeriveIden)]
enum InsurancePolicy {
    Table,
    Id,
    MuseumId,
    PolicyNumber,
    AmountInsured,
    ExpirationDate,
    Carrier,
}

/// Genres, subgenres, media, subject matters and inspectors share one shape:
/// an id, the owning museum and a required name.
fn named_museum_table<T>(table: T, id: T, museum_id: T, name: T, fk_name: &str) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(museum_id).integer().not_null())
        .col(ColumnDef::new(name).string().not_null())
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, museum_id)
                .to(Museum::Table, Museum::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Museum::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Museum::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Museum::Name).string().not_null())
                    .col(ColumnDef::new(Museum::ShortName).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Country::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Country::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Country::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Location::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Location::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Location::Name).string().not_null())
                    .col(ColumnDef::new(Location::Address1).string().null())
                    .col(ColumnDef::new(Location::Address2).string().null())
                    .col(ColumnDef::new(Location::City).string().null())
                    .col(ColumnDef::new(Location::State).string().null())
                    .col(ColumnDef::new(Location::ZipCode).string().null())
                    .col(ColumnDef::new(Location::CountryId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_museum")
                            .from(Location::Table, Location::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_country")
                            .from(Location::Table, Location::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artist::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Artist::Name).string().not_null())
                    .col(ColumnDef::new(Artist::AlsoKnownAs).string().null())
                    .col(ColumnDef::new(Artist::City).string().null())
                    .col(ColumnDef::new(Artist::State).string().null())
                    .col(ColumnDef::new(Artist::CountryId).integer().null())
                    .col(ColumnDef::new(Artist::Birthdate).date().null())
                    .col(ColumnDef::new(Artist::Deathdate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_museum")
                            .from(Artist::Table, Artist::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_country")
                            .from(Artist::Table, Artist::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(named_museum_table(
                Genre::Table,
                Genre::Id,
                Genre::MuseumId,
                Genre::Name,
                "fk_genre_museum",
            ))
            .await?;
        manager
            .create_table(named_museum_table(
                Subgenre::Table,
                Subgenre::Id,
                Subgenre::MuseumId,
                Subgenre::Name,
                "fk_subgenre_museum",
            ))
            .await?;
        manager
            .create_table(named_museum_table(
                Medium::Table,
                Medium::Id,
                Medium::MuseumId,
                Medium::Name,
                "fk_medium_museum",
            ))
            .await?;
        manager
            .create_table(named_museum_table(
                SubjectMatter::Table,
                SubjectMatter::Id,
                SubjectMatter::MuseumId,
                SubjectMatter::Name,
                "fk_subject_matter_museum",
            ))
            .await?;
        manager
            .create_table(named_museum_table(
                Inspector::Table,
                Inspector::Id,
                Inspector::MuseumId,
                Inspector::Name,
                "fk_inspector_museum",
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ArtistSubjectMatter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArtistSubjectMatter::ArtistId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArtistSubjectMatter::SubjectMatterId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ArtistSubjectMatter::ArtistId)
                            .col(ArtistSubjectMatter::SubjectMatterId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_subject_matter_artist")
                            .from(ArtistSubjectMatter::Table, ArtistSubjectMatter::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_subject_matter_subject_matter")
                            .from(
                                ArtistSubjectMatter::Table,
                                ArtistSubjectMatter::SubjectMatterId,
                            )
                            .to(SubjectMatter::Table, SubjectMatter::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Acquisition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Acquisition::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Acquisition::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Acquisition::Date).date().null())
                    .col(ColumnDef::new(Acquisition::Cost).decimal_len(19, 4).null())
                    .col(ColumnDef::new(Acquisition::PieceSource).string().null())
                    .col(ColumnDef::new(Acquisition::FundingSource).string().null())
                    .col(ColumnDef::new(Acquisition::Terms).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_acquisition_museum")
                            .from(Acquisition::Table, Acquisition::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UnitOfMeasure::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitOfMeasure::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UnitOfMeasure::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UnitOfMeasure::Abbreviation).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InsurancePolicy::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InsurancePolicy::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InsurancePolicy::MuseumId).integer().not_null())
                    .col(ColumnDef::new(InsurancePolicy::PolicyNumber).string().not_null())
                    .col(
                        ColumnDef::new(InsurancePolicy::AmountInsured)
                            .decimal_len(19, 4)
                            .null(),
                    )
                    .col(ColumnDef::new(InsurancePolicy::ExpirationDate).date().null())
                    .col(ColumnDef::new(InsurancePolicy::Carrier).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insurance_policy_museum")
                            .from(InsurancePolicy::Table, InsurancePolicy::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InsurancePolicy::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UnitOfMeasure::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Acquisition::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ArtistSubjectMatter::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inspector::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectMatter::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Medium::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subgenre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Country::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Museum::Table).to_owned())
            .await?;
        Ok(())
    }
}
