use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{ DateTime, Utc };
use sea_orm::{
    sea_query::{ Expr, Func, LikeExpr, SimpleExpr },
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
};
use serde::Deserialize;

use crate::db::entity::{ user_alert, UserAlert };
use crate::enums::AlertStatus;
use crate::error::{ AppError, Result };

use super::{ tally, window_days };

/// Default age for purging resolved alerts.
pub const DEFAULT_RESOLVED_RETENTION_DAYS: i64 = 30;

pub struct UserAlertService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserAlert {
    pub user_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub alert_name: Option<String>,
    pub alert_description: Option<String>,
    pub alert_status: Option<AlertStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAlertUpdate {
    pub user_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub alert_name: Option<String>,
    pub alert_description: Option<String>,
    pub alert_status: Option<AlertStatus>,
}

impl UserAlertUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() &&
            self.timestamp.is_none() &&
            self.alert_name.is_none() &&
            self.alert_description.is_none() &&
            self.alert_status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserAlertFilter {
    pub user_id: Option<String>,
    pub status: Option<AlertStatus>,
    /// Case-insensitive substring of the alert name.
    pub name: Option<String>,
    /// Case-insensitive substring of the name or the description.
    pub search: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

/// First populated selector wins: id, status, before, name.
#[derive(Debug, Clone, Default)]
pub struct UserAlertDeletion {
    pub id: Option<i32>,
    pub status: Option<AlertStatus>,
    pub before: Option<DateTime<Utc>>,
    pub name: Option<String>,
}

impl UserAlertDeletion {
    fn condition(&self) -> Result<Condition> {
        let expr = if let Some(id) = self.id {
            user_alert::Column::Id.eq(id)
        } else if let Some(status) = self.status {
            user_alert::Column::AlertStatus.eq(status.as_str())
        } else if let Some(before) = self.before {
            user_alert::Column::Timestamp.lt(before)
        } else if let Some(name) = &self.name {
            user_alert::Column::AlertName.eq(name.as_str())
        } else {
            return Err(
                AppError::InvalidInput(
                    "ID, alert_status, before_date, or alert_name is required".to_string()
                )
            );
        };

        Ok(Condition::all().add(expr))
    }
}

/// Alerts to mark RESOLVED. First populated selector wins: id, ids, user.
/// A user selection skips alerts that are already resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAlertResolution {
    pub id: Option<i32>,
    pub ids: Option<Vec<i32>>,
    pub user_id: Option<String>,
}

impl UserAlertResolution {
    fn condition(&self) -> Result<Condition> {
        if let Some(id) = self.id {
            return Ok(Condition::all().add(user_alert::Column::Id.eq(id)));
        }
        if let Some(ids) = self.ids.as_ref().filter(|ids| !ids.is_empty()) {
            return Ok(Condition::all().add(user_alert::Column::Id.is_in(ids.iter().copied())));
        }
        if let Some(user_id) = non_blank(self.user_id.clone()) {
            return Ok(
                Condition::all()
                    .add(user_alert::Column::UserId.eq(user_id))
                    .add(user_alert::Column::AlertStatus.ne(AlertStatus::Resolved.as_str()))
            );
        }

        Err(AppError::InvalidInput("id, ids, or user_id is required".to_string()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lowercased `%needle%` with LIKE wildcards in the needle taken literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `lower(column) LIKE %needle%`, portable across backends.
fn contains_ci(column: user_alert::Column, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(like_pattern(needle)).escape('\\'))
}

fn filtered(filter: &UserAlertFilter) -> Select<UserAlert> {
    let mut query = UserAlert::find();

    if let Some(user_id) = &filter.user_id {
        query = query.filter(user_alert::Column::UserId.eq(user_id.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(user_alert::Column::AlertStatus.eq(status.as_str()));
    }
    if let Some(name) = &filter.name {
        query = query.filter(contains_ci(user_alert::Column::AlertName, name));
    }
    if let Some(search) = &filter.search {
        query = query.filter(
            Condition::any()
                .add(contains_ci(user_alert::Column::AlertName, search))
                .add(contains_ci(user_alert::Column::AlertDescription, search))
        );
    }
    if let Some(start) = filter.start {
        query = query.filter(user_alert::Column::Timestamp.gte(start));
    }
    if let Some(end) = filter.end {
        query = query.filter(user_alert::Column::Timestamp.lte(end));
    }

    query
}

impl UserAlertService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Name, description and status are all mandatory.
    pub async fn create(&self, alert: NewUserAlert) -> Result<user_alert::Model> {
        let (name, description, status) = match
            (non_blank(alert.alert_name), non_blank(alert.alert_description), alert.alert_status)
        {
            (Some(name), Some(description), Some(status)) => (name, description, status),
            _ => {
                return Err(
                    AppError::InvalidInput(
                        "alert_name, alert_description, and alert_status are required".to_string()
                    )
                );
            }
        };

        let model = user_alert::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(alert.user_id),
            timestamp: ActiveValue::Set(alert.timestamp.unwrap_or_else(Utc::now)),
            alert_name: ActiveValue::Set(name),
            alert_description: ActiveValue::Set(description),
            alert_status: ActiveValue::Set(status.to_string()),
        };

        Ok(model.insert(self.db.as_ref()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<user_alert::Model> {
        UserAlert::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("User alert not found".to_string()))
    }

    /// Most recent first.
    pub async fn list(&self, filter: &UserAlertFilter) -> Result<Vec<user_alert::Model>> {
        let mut query = filtered(filter).order_by_desc(user_alert::Column::Timestamp);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(self.db.as_ref()).await?)
    }

    pub async fn count(&self, user_id: Option<&str>, status: Option<AlertStatus>) -> Result<u64> {
        let filter = UserAlertFilter {
            user_id: user_id.map(str::to_string),
            status,
            ..Default::default()
        };

        Ok(filtered(&filter).count(self.db.as_ref()).await?)
    }

    /// Alerts per status for one user. Rows without a status count as `UNKNOWN`.
    pub async fn status_summary(&self, user_id: &str) -> Result<BTreeMap<String, u64>> {
        let alerts = UserAlert::find()
            .filter(user_alert::Column::UserId.eq(user_id))
            .all(self.db.as_ref()).await?;

        Ok(tally(alerts.iter().map(|a| Some(a.alert_status.as_str()).filter(|s| !s.is_empty()))))
    }

    /// Mark the selected alerts RESOLVED and return them as updated.
    pub async fn resolve(&self, selection: &UserAlertResolution) -> Result<Vec<user_alert::Model>> {
        let condition = selection.condition()?;

        let resolved = UserAlert::update_many()
            .col_expr(user_alert::Column::AlertStatus, Expr::value(AlertStatus::Resolved.as_str()))
            .filter(condition)
            .exec_with_returning(self.db.as_ref()).await?;

        tracing::info!("resolved {} user alert(s)", resolved.len());
        Ok(resolved)
    }

    pub async fn update(&self, id: i32, update: UserAlertUpdate) -> Result<user_alert::Model> {
        let existing = self.get(id).await?;
        if update.is_empty() {
            return Ok(existing);
        }

        let mut active: user_alert::ActiveModel = existing.into();
        if let Some(user_id) = update.user_id {
            active.user_id = ActiveValue::Set(Some(user_id));
        }
        if let Some(timestamp) = update.timestamp {
            active.timestamp = ActiveValue::Set(timestamp);
        }
        if let Some(name) = update.alert_name {
            active.alert_name = ActiveValue::Set(name);
        }
        if let Some(description) = update.alert_description {
            active.alert_description = ActiveValue::Set(description);
        }
        if let Some(status) = update.alert_status {
            active.alert_status = ActiveValue::Set(status.to_string());
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete(&self, selection: &UserAlertDeletion) -> Result<Vec<user_alert::Model>> {
        let condition = selection.condition()?;

        let doomed = UserAlert::find().filter(condition).all(self.db.as_ref()).await?;
        if doomed.is_empty() {
            return Err(AppError::NotFound("No user alerts found to delete".to_string()));
        }

        let ids: Vec<i32> = doomed
            .iter()
            .map(|a| a.id)
            .collect();
        UserAlert::delete_many().filter(user_alert::Column::Id.is_in(ids)).exec(self.db.as_ref()).await?;

        Ok(doomed)
    }

    /// Purge RESOLVED alerts older than `days`, optionally for one user only.
    pub async fn delete_old_resolved(
        &self,
        now: DateTime<Utc>,
        days: i64,
        user_id: Option<&str>
    ) -> Result<Vec<user_alert::Model>> {
        let cutoff = now
            .checked_sub_signed(window_days(days)?)
            .ok_or_else(|| AppError::InvalidInput(format!("days is out of range: {}", days)))?;

        let mut query = UserAlert::find()
            .filter(user_alert::Column::AlertStatus.eq(AlertStatus::Resolved.as_str()))
            .filter(user_alert::Column::Timestamp.lt(cutoff));
        if let Some(user_id) = user_id {
            query = query.filter(user_alert::Column::UserId.eq(user_id));
        }

        let doomed = query.all(self.db.as_ref()).await?;
        if doomed.is_empty() {
            return Err(AppError::NotFound("No resolved user alerts found to delete".to_string()));
        }

        let ids: Vec<i32> = doomed
            .iter()
            .map(|a| a.id)
            .collect();
        UserAlert::delete_many().filter(user_alert::Column::Id.is_in(ids)).exec(self.db.as_ref()).await?;

        tracing::info!("purged {} resolved user alert(s) older than {}", doomed.len(), cutoff);
        Ok(doomed)
    }
}
