use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Reward::Table)
                .if_not_exists()
                .col(ColumnDef::new(Reward::RewardId).uuid().not_null().primary_key())
                .col(ColumnDef::new(Reward::UserId).string().not_null())
                .col(ColumnDef::new(Reward::RouteId).string().not_null())
                .col(ColumnDef::new(Reward::RewardValue).integer().not_null().default(0))
                .col(ColumnDef::new(Reward::AvoidedRisks).integer().not_null().default(0))
                .col(ColumnDef::new(Reward::ClaimPreventionEstimate).double().not_null().default(0.0))
                .col(
                    ColumnDef::new(Reward::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_reward_user_id")
                .table(Reward::Table)
                .col(Reward::UserId)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reward::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reward {
    Table,
    RewardId,
    UserId,
    RouteId,
    RewardValue,
    AvoidedRisks,
    ClaimPreventionEstimate,
    CreatedAt,
}
