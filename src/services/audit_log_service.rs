use std::sync::Arc;

use chrono::{ DateTime, Utc };
use sea_orm::{
    ActiveModelTrait,
    ActiveValue,
    ColumnTrait,
    Condition,
    DatabaseConnection,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Select,
    TransactionTrait,
};
use serde::Deserialize;

use crate::db::entity::{ audit_log, AuditLog };
use crate::error::{ AppError, Result };

pub struct AuditLogService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAuditLog {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogUpdate {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl AuditLogUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.action.is_none() && self.timestamp.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

/// Selection for a bulk delete. `id` wins; otherwise `before`/`action`
/// narrowed by `user_id`; otherwise every log of `user_id`.
#[derive(Debug, Clone, Default)]
pub struct AuditLogDeletion {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub before: Option<DateTime<Utc>>,
    pub action: Option<String>,
}

impl AuditLogDeletion {
    fn condition(&self) -> Result<Condition> {
        if let Some(id) = self.id {
            return Ok(Condition::all().add(audit_log::Column::Id.eq(id)));
        }

        if self.before.is_none() && self.action.is_none() && self.user_id.is_none() {
            return Err(
                AppError::InvalidInput(
                    "ID, user_id, before_date, or action is required".to_string()
                )
            );
        }

        let mut condition = Condition::all();
        if let Some(before) = self.before {
            condition = condition.add(audit_log::Column::Timestamp.lt(before));
        }
        if let Some(action) = &self.action {
            condition = condition.add(audit_log::Column::Action.eq(action.as_str()));
        }
        if let Some(user_id) = &self.user_id {
            condition = condition.add(audit_log::Column::UserId.eq(user_id.as_str()));
        }

        Ok(condition)
    }
}

impl AuditLogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn active_model(entry: NewAuditLog) -> audit_log::ActiveModel {
        audit_log::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(entry.user_id),
            action: ActiveValue::Set(entry.action),
            timestamp: ActiveValue::Set(entry.timestamp.unwrap_or_else(Utc::now)),
        }
    }

    /// Record a single entry, stamping it with the current time if none was given.
    pub async fn create(&self, entry: NewAuditLog) -> Result<audit_log::Model> {
        let log = Self::active_model(entry).insert(self.db.as_ref()).await?;
        tracing::debug!("audit log {} recorded", log.id);
        Ok(log)
    }

    /// Record several entries atomically.
    pub async fn create_many(&self, entries: Vec<NewAuditLog>) -> Result<Vec<audit_log::Model>> {
        let txn = self.db.begin().await?;
        let mut inserted = Vec::with_capacity(entries.len());

        for entry in entries {
            inserted.push(Self::active_model(entry).insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(inserted)
    }

    pub async fn get(&self, id: i32) -> Result<audit_log::Model> {
        AuditLog::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("Audit log not found".to_string()))
    }

    fn filtered(filter: &AuditLogFilter) -> Select<AuditLog> {
        let mut query = AuditLog::find();

        if let Some(user_id) = &filter.user_id {
            query = query.filter(audit_log::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(action) = &filter.action {
            query = query.filter(audit_log::Column::Action.eq(action.as_str()));
        }
        if let Some(start) = filter.start {
            query = query.filter(audit_log::Column::Timestamp.gte(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(audit_log::Column::Timestamp.lte(end));
        }

        query
    }

    /// Most recent first.
    pub async fn list(&self, filter: &AuditLogFilter) -> Result<Vec<audit_log::Model>> {
        let mut query = Self::filtered(filter).order_by_desc(audit_log::Column::Timestamp);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(self.db.as_ref()).await?)
    }

    pub async fn count(&self, filter: &AuditLogFilter) -> Result<u64> {
        Ok(Self::filtered(filter).count(self.db.as_ref()).await?)
    }

    pub async fn update(&self, id: i32, update: AuditLogUpdate) -> Result<audit_log::Model> {
        let existing = AuditLog::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("Audit log not found".to_string()))?;
        if update.is_empty() {
            return Ok(existing);
        }

        let mut active: audit_log::ActiveModel = existing.into();
        if let Some(user_id) = update.user_id {
            active.user_id = ActiveValue::Set(Some(user_id));
        }
        if let Some(action) = update.action {
            active.action = ActiveValue::Set(Some(action));
        }
        if let Some(timestamp) = update.timestamp {
            active.timestamp = ActiveValue::Set(timestamp);
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Delete the selected logs and return what was removed.
    pub async fn delete(&self, selection: &AuditLogDeletion) -> Result<Vec<audit_log::Model>> {
        let condition = selection.condition()?;

        let doomed = AuditLog::find().filter(condition).all(self.db.as_ref()).await?;
        if doomed.is_empty() {
            return Err(AppError::NotFound("No audit logs found to delete".to_string()));
        }

        let ids: Vec<i32> = doomed
            .iter()
            .map(|l| l.id)
            .collect();
        let result = AuditLog::delete_many()
            .filter(audit_log::Column::Id.is_in(ids))
            .exec(self.db.as_ref()).await?;

        tracing::info!("deleted {} audit log(s)", result.rows_affected);
        Ok(doomed)
    }
}
