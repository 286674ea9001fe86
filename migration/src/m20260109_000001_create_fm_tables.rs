use sea_orm_migration::prelude::*;

use crate::m20260105_000001_create_organizations_table::Organizations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ベンダー（テナントスコープ）
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Vendors::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Vendors::Company).string_len(200).null())
                    .col(ColumnDef::new(Vendors::Email).string_len(255).null())
                    .col(ColumnDef::new(Vendors::Phone).string_len(32).null())
                    .col(ColumnDef::new(Vendors::Specialization).string_len(100).null())
                    .col(
                        ColumnDef::new(Vendors::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Vendors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendors_org_id")
                            .from(Vendors::Table, Vendors::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vendors_org_id")
                    .table(Vendors::Table)
                    .col(Vendors::OrgId)
                    .to_owned(),
            )
            .await?;

        // 作業指示（テナントスコープ）
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkOrders::OrgId).uuid().not_null())
                    .col(ColumnDef::new(WorkOrders::Title).string_len(200).not_null())
                    .col(ColumnDef::new(WorkOrders::Description).text().null())
                    .col(ColumnDef::new(WorkOrders::Category).string_len(64).null())
                    .col(
                        ColumnDef::new(WorkOrders::Priority)
                            .string_len(16)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(WorkOrders::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(WorkOrders::VendorId).uuid().null())
                    .col(ColumnDef::new(WorkOrders::PropertyRef).string_len(100).null())
                    .col(ColumnDef::new(WorkOrders::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(WorkOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_org_id")
                            .from(WorkOrders::Table, WorkOrders::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_vendor_id")
                            .from(WorkOrders::Table, WorkOrders::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_orders_org_status")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::OrgId)
                    .col(WorkOrders::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    OrgId,
    Name,
    Company,
    Email,
    Phone,
    Specialization,
    Rating,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
    OrgId,
    Title,
    Description,
    Category,
    Priority,
    Status,
    VendorId,
    PropertyRef,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
