use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // プラットフォーム設定（キー/値）
        manager
            .create_table(
                Table::create()
                    .table(PlatformSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformSettings::Key)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlatformSettings::Value).text().not_null())
                    .col(
                        ColumnDef::new(PlatformSettings::ValueType)
                            .string_len(16)
                            .not_null()
                            .default("string"),
                    )
                    .col(ColumnDef::new(PlatformSettings::Description).text().null())
                    .col(ColumnDef::new(PlatformSettings::UpdatedBy).uuid().null())
                    .col(
                        ColumnDef::new(PlatformSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ブランディングは単一行（id = 1）で管理
        manager
            .create_table(
                Table::create()
                    .table(BrandingProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BrandingProfiles::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BrandingProfiles::CompanyName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BrandingProfiles::LogoUrl).text().null())
                    .col(ColumnDef::new(BrandingProfiles::FaviconUrl).text().null())
                    .col(
                        ColumnDef::new(BrandingProfiles::PrimaryColor)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BrandingProfiles::SecondaryColor)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BrandingProfiles::SupportEmail)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(BrandingProfiles::UpdatedBy).uuid().null())
                    .col(
                        ColumnDef::new(BrandingProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BrandingProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlatformSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlatformSettings {
    Table,
    Key,
    Value,
    ValueType,
    Description,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BrandingProfiles {
    Table,
    Id,
    CompanyName,
    LogoUrl,
    FaviconUrl,
    PrimaryColor,
    SecondaryColor,
    SupportEmail,
    UpdatedBy,
    UpdatedAt,
}
