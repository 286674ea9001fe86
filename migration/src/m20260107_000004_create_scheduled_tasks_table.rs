use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduledTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::TaskType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::CronExpression)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ScheduledTasks::Payload).json().null())
                    .col(
                        ColumnDef::new(ScheduledTasks::LastRunAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::LastRunStatus)
                            .string_len(32)
                            .null(),
                    )
                    .col(ColumnDef::new(ScheduledTasks::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(ScheduledTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduledTasks {
    Table,
    Id,
    Name,
    TaskType,
    CronExpression,
    Enabled,
    Payload,
    LastRunAt,
    LastRunStatus,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
