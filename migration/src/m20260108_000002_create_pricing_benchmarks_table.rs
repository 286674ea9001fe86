use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingBenchmarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingBenchmarks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingBenchmarks::Category)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingBenchmarks::ServiceCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PricingBenchmarks::ServiceName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingBenchmarks::UnitDescription)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingBenchmarks::MinPrice).double().not_null())
                    .col(
                        ColumnDef::new(PricingBenchmarks::TypicalPrice)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingBenchmarks::MaxPrice).double().not_null())
                    .col(ColumnDef::new(PricingBenchmarks::Notes).text().null())
                    .col(
                        ColumnDef::new(PricingBenchmarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pricing_benchmarks_category")
                    .table(PricingBenchmarks::Table)
                    .col(PricingBenchmarks::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingBenchmarks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PricingBenchmarks {
    Table,
    Id,
    Category,
    ServiceCode,
    ServiceName,
    UnitDescription,
    MinPrice,
    TypicalPrice,
    MaxPrice,
    Notes,
    CreatedAt,
}
