use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Museum {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Location {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Medium {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subgenre {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum SubjectMatter {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Acquisition {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum UnitOfMeasure {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum InsurancePolicy {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Piece {
    Table,
    Id,
    MuseumId,
    AccessionNumber,
    Title,
    Subject,
    ArtistId,
    MediumId,
    GenreId,
    SubgenreId,
    SubjectMatterId,
    AcquisitionId,
    EstimatedValue,
    IsFramed,
    CreationYear,
    CreationMonth,
    CreationDay,
    OriginCity,
    OriginState,
    OriginCountryId,
    Height,
    Width,
    Depth,
    UnitOfMeasureId,
    CopyrightYear,
    CopyrightOwner,
    InsurancePolicyId,
}

#[derive(DeriveIden)]
enum Exhibition {
    Table,
    Id,
    MuseumId,
    Name,
    Curator,
    Theme,
    StartDate,
    EndDate,
    LocationId,
}

#[derive(DeriveIden)]
enum ExhibitionPiece {
    Table,
    ExhibitionId,
    PieceId,
}

#[derive(DeriveIden)]
enum Loan {
    Table,
    Id,
    MuseumId,
    FromLocationId,
    ToLocationId,
    FromDate,
    ToDate,
    ExhibitionId,
    Terms,
}

#[derive(DeriveIden)]
enum LoanPiece {
    Table,
    LoanId,
    PieceId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Piece::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Piece::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Piece::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Piece::AccessionNumber).string().null())
                    .col(ColumnDef::new(Piece::Title).string().not_null())
                    .col(ColumnDef::new(Piece::Subject).string().null())
                    .col(ColumnDef::new(Piece::ArtistId).integer().null())
                    .col(ColumnDef::new(Piece::MediumId).integer().null())
                    .col(ColumnDef::new(Piece::GenreId).integer().null())
                    .col(ColumnDef::new(Piece::SubgenreId).integer().null())
                    .col(ColumnDef::new(Piece::SubjectMatterId).integer().null())
                    .col(ColumnDef::new(Piece::AcquisitionId).integer().null())
                    .col(
                        ColumnDef::new(Piece::EstimatedValue)
                            .decimal_len(19, 4)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Piece::IsFramed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Piece::CreationYear).integer().null())
                    .col(ColumnDef::new(Piece::CreationMonth).integer().null())
                    .col(ColumnDef::new(Piece::CreationDay).integer().null())
                    .col(ColumnDef::new(Piece::OriginCity).string().null())
                    .col(ColumnDef::new(Piece::OriginState).string().null())
                    .col(ColumnDef::new(Piece::OriginCountryId).integer().null())
                    .col(ColumnDef::new(Piece::Height).double().null())
                    .col(ColumnDef::new(Piece::Width).double().null())
                    .col(ColumnDef::new(Piece::Depth).double().null())
                    .col(ColumnDef::new(Piece::UnitOfMeasureId).integer().null())
                    .col(ColumnDef::new(Piece::CopyrightYear).integer().null())
                    .col(ColumnDef::new(Piece::CopyrightOwner).string().null())
                    .col(ColumnDef::new(Piece::InsurancePolicyId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_museum")
                            .from(Piece::Table, Piece::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_artist")
                            .from(Piece::Table, Piece::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_medium")
                            .from(Piece::Table, Piece::MediumId)
                            .to(Medium::Table, Medium::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_genre")
                            .from(Piece::Table, Piece::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_subgenre")
                            .from(Piece::Table, Piece::SubgenreId)
                            .to(Subgenre::Table, Subgenre::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_subject_matter")
                            .from(Piece::Table, Piece::SubjectMatterId)
                            .to(SubjectMatter::Table, SubjectMatter::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_acquisition")
                            .from(Piece::Table, Piece::AcquisitionId)
                            .to(Acquisition::Table, Acquisition::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_origin_country")
                            .from(Piece::Table, Piece::OriginCountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_unit_of_measure")
                            .from(Piece::Table, Piece::UnitOfMeasureId)
                            .to(UnitOfMeasure::Table, UnitOfMeasure::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_piece_insurance_policy")
                            .from(Piece::Table, Piece::InsurancePolicyId)
                            .to(InsurancePolicy::Table, InsurancePolicy::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Exhibition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exhibition::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exhibition::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Exhibition::Name).string().not_null())
                    .col(ColumnDef::new(Exhibition::Curator).string().null())
                    .col(ColumnDef::new(Exhibition::Theme).string().null())
                    .col(ColumnDef::new(Exhibition::StartDate).date().not_null())
                    .col(ColumnDef::new(Exhibition::EndDate).date().not_null())
                    .col(ColumnDef::new(Exhibition::LocationId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_museum")
                            .from(Exhibition::Table, Exhibition::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_location")
                            .from(Exhibition::Table, Exhibition::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExhibitionPiece::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExhibitionPiece::ExhibitionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExhibitionPiece::PieceId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ExhibitionPiece::ExhibitionId)
                            .col(ExhibitionPiece::PieceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_piece_exhibition")
                            .from(ExhibitionPiece::Table, ExhibitionPiece::ExhibitionId)
                            .to(Exhibition::Table, Exhibition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_piece_piece")
                            .from(ExhibitionPiece::Table, ExhibitionPiece::PieceId)
                            .to(Piece::Table, Piece::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Loan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Loan::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Loan::MuseumId).integer().not_null())
                    .col(ColumnDef::new(Loan::FromLocationId).integer().null())
                    .col(ColumnDef::new(Loan::ToLocationId).integer().null())
                    .col(ColumnDef::new(Loan::FromDate).date().not_null())
                    .col(ColumnDef::new(Loan::ToDate).date().not_null())
                    .col(ColumnDef::new(Loan::ExhibitionId).integer().null())
                    .col(ColumnDef::new(Loan::Terms).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_museum")
                            .from(Loan::Table, Loan::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_from_location")
                            .from(Loan::Table, Loan::FromLocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_to_location")
                            .from(Loan::Table, Loan::ToLocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_exhibition")
                            .from(Loan::Table, Loan::ExhibitionId)
                            .to(Exhibition::Table, Exhibition::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoanPiece::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LoanPiece::LoanId).integer().not_null())
                    .col(ColumnDef::new(LoanPiece::PieceId).integer().not_null())
                    .primary_key(Index::create().col(LoanPiece::LoanId).col(LoanPiece::PieceId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_piece_loan")
                            .from(LoanPiece::Table, LoanPiece::LoanId)
                            .to(Loan::Table, Loan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_piece_piece")
                            .from(LoanPiece::Table, LoanPiece::PieceId)
                            .to(Piece::Table, Piece::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoanPiece::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Loan::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExhibitionPiece::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exhibition::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Piece::Table).to_owned())
            .await?;
        Ok(())
    }
}
