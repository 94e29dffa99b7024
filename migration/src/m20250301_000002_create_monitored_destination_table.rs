use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(MonitoredDestination::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(MonitoredDestination::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(MonitoredDestination::UserId).string())
                .col(ColumnDef::new(MonitoredDestination::Location).string())
                .col(ColumnDef::new(MonitoredDestination::RiskLevel).string()) // LOW, MEDIUM, HIGH, CRITICAL
                .col(ColumnDef::new(MonitoredDestination::LastChecked).date())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_monitored_destination_user_id")
                .table(MonitoredDestination::Table)
                .col(MonitoredDestination::UserId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_monitored_destination_last_checked")
                .table(MonitoredDestination::Table)
                .col(MonitoredDestination::LastChecked)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MonitoredDestination::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MonitoredDestination {
    Table,
    Id,
    UserId,
    Location,
    RiskLevel,
    LastChecked,
}
