use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Museum {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    MuseumId,
    Email,
    EmailConfirmed,
    PhoneNumber,
    PasswordHash,
    TwoFactorEnabled,
    AuthenticatorKey,
}

#[derive(DeriveIden)]
enum UserLogin {
    Table,
    LoginProvider,
    ProviderKey,
    ProviderDisplayName,
    UserId,
}

#[derive(DeriveIden)]
enum UserRecoveryCode {
    Table,
    UserId,
    CodeHash,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AppUser::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AppUser::MuseumId).integer().not_null())
                    .col(ColumnDef::new(AppUser::Email).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(AppUser::EmailConfirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AppUser::PhoneNumber).string().null())
                    .col(ColumnDef::new(AppUser::PasswordHash).string().null())
                    .col(
                        ColumnDef::new(AppUser::TwoFactorEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AppUser::AuthenticatorKey).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_museum")
                            .from(AppUser::Table, AppUser::MuseumId)
                            .to(Museum::Table, Museum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserLogin::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserLogin::LoginProvider).string().not_null())
                    .col(ColumnDef::new(UserLogin::ProviderKey).string().not_null())
                    .col(ColumnDef::new(UserLogin::ProviderDisplayName).string().null())
                    .col(ColumnDef::new(UserLogin::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserLogin::LoginProvider)
                            .col(UserLogin::ProviderKey),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_login_app_user")
                            .from(UserLogin::Table, UserLogin::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRecoveryCode::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRecoveryCode::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserRecoveryCode::CodeHash).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserRecoveryCode::UserId)
                            .col(UserRecoveryCode::CodeHash),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_recovery_code_app_user")
                            .from(UserRecoveryCode::Table, UserRecoveryCode::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRecoveryCode::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserLogin::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;
        Ok(())
    }
}
