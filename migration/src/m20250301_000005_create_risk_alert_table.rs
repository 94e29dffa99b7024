use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(RiskAlert::Table)
                .if_not_exists()
                .col(ColumnDef::new(RiskAlert::AlertId).uuid().not_null().primary_key())
                .col(ColumnDef::new(RiskAlert::UserId).string().not_null())
                .col(ColumnDef::new(RiskAlert::AlertType).string().not_null())
                .col(ColumnDef::new(RiskAlert::Message).text().not_null())
                .col(ColumnDef::new(RiskAlert::Severity).string().not_null())
                .col(
                    ColumnDef::new(RiskAlert::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(RiskAlert::Acknowledged).boolean().not_null().default(false))
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_risk_alert_user_id")
                .table(RiskAlert::Table)
                .col(RiskAlert::UserId)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RiskAlert::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RiskAlert {
    Table,
    AlertId,
    UserId,
    AlertType,
    Message,
    Severity,
    Timestamp,
    Acknowledged,
}
