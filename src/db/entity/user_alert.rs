use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<String>,
    pub timestamp: DateTimeUtc,
    pub alert_name: String,
    #[sea_orm(column_type = "Text")]
    pub alert_description: String,
    pub alert_status: String, // "ACTIVE", "INACTIVE", "RESOLVED", "PENDING"
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
