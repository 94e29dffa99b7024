use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(UserAlerts::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(UserAlerts::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(UserAlerts::UserId).string())
                .col(
                    ColumnDef::new(UserAlerts::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(UserAlerts::AlertName).string().not_null())
                .col(ColumnDef::new(UserAlerts::AlertDescription).text().not_null())
                .col(ColumnDef::new(UserAlerts::AlertStatus).string().not_null()) // ACTIVE, INACTIVE, RESOLVED, PENDING
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_user_alerts_status")
                .table(UserAlerts::Table)
                .col(UserAlerts::AlertStatus)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserAlerts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserAlerts {
    Table,
    Id,
    UserId,
    Timestamp,
    AlertName,
    AlertDescription,
    AlertStatus,
}
