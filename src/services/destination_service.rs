use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    sea_query::{ NullOrdering, Order },
    ActiveModelTrait,
    ActiveValue,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Select,
};
use serde::Deserialize;

use crate::db::entity::{ monitored_destination, MonitoredDestination };
use crate::enums::RiskLevel;
use crate::error::{ AppError, Result };

use super::{ tally, window_days };

/// Default age for the stale-destination cleanup.
pub const DEFAULT_CLEANUP_DAYS: i64 = 90;

pub struct DestinationService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDestination {
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub last_checked: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DestinationUpdate {
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub last_checked: Option<NaiveDate>,
}

impl DestinationUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() &&
            self.location.is_none() &&
            self.risk_level.is_none() &&
            self.last_checked.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DestinationFilter {
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub checked_from: Option<NaiveDate>,
    pub checked_to: Option<NaiveDate>,
}

/// First populated selector wins: id, user, location, risk level.
#[derive(Debug, Clone, Default)]
pub struct DestinationDeletion {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

impl DestinationDeletion {
    fn condition(&self) -> Result<Condition> {
        let expr = if let Some(id) = self.id {
            monitored_destination::Column::Id.eq(id)
        } else if let Some(user_id) = &self.user_id {
            monitored_destination::Column::UserId.eq(user_id.as_str())
        } else if let Some(location) = &self.location {
            monitored_destination::Column::Location.eq(location.as_str())
        } else if let Some(level) = self.risk_level {
            monitored_destination::Column::RiskLevel.eq(level.as_str())
        } else {
            return Err(
                AppError::InvalidInput(
                    "ID, user_id, location, or risk_level is required".to_string()
                )
            );
        };

        Ok(Condition::all().add(expr))
    }
}

/// Cutoff date for staleness: anything checked before it is due again.
pub fn stale_cutoff(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    today
        .checked_sub_signed(window_days(days)?)
        .ok_or_else(|| AppError::InvalidInput(format!("days is out of range: {}", days)))
}

/// Never-checked rows first, then oldest.
fn stale_query(cutoff: NaiveDate) -> Select<MonitoredDestination> {
    MonitoredDestination::find()
        .filter(
            Condition::any()
                .add(monitored_destination::Column::LastChecked.is_null())
                .add(monitored_destination::Column::LastChecked.lt(cutoff))
        )
        .order_by_with_nulls(
            monitored_destination::Column::LastChecked,
            Order::Asc,
            NullOrdering::First
        )
}

impl DestinationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, destination: NewDestination) -> Result<monitored_destination::Model> {
        let model = monitored_destination::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(destination.user_id),
            location: ActiveValue::Set(destination.location),
            risk_level: ActiveValue::Set(destination.risk_level.map(|l| l.to_string())),
            last_checked: ActiveValue::Set(destination.last_checked),
        };

        let model = model.insert(self.db.as_ref()).await?;
        tracing::debug!("monitoring destination {} ({:?})", model.id, model.location);
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<monitored_destination::Model> {
        MonitoredDestination::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("Monitored destination not found".to_string()))
    }

    /// Most recently checked first.
    pub async fn list(
        &self,
        filter: &DestinationFilter
    ) -> Result<Vec<monitored_destination::Model>> {
        let mut query = MonitoredDestination::find();

        if let Some(user_id) = &filter.user_id {
            query = query.filter(monitored_destination::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(location) = &filter.location {
            query = query.filter(monitored_destination::Column::Location.eq(location.as_str()));
        }
        if let Some(level) = filter.risk_level {
            query = query.filter(monitored_destination::Column::RiskLevel.eq(level.as_str()));
        }
        if let Some(from) = filter.checked_from {
            query = query.filter(monitored_destination::Column::LastChecked.gte(from));
        }
        if let Some(to) = filter.checked_to {
            query = query.filter(monitored_destination::Column::LastChecked.lte(to));
        }

        let destinations = query
            .order_by_desc(monitored_destination::Column::LastChecked)
            .all(self.db.as_ref()).await?;

        Ok(destinations)
    }

    /// Destinations never checked, or last checked before `today - days`.
    /// Never-checked rows come first, then oldest.
    pub async fn stale(
        &self,
        today: NaiveDate,
        days: i64
    ) -> Result<Vec<monitored_destination::Model>> {
        let cutoff = stale_cutoff(today, days)?;
        Ok(stale_query(cutoff).all(self.db.as_ref()).await?)
    }

    pub async fn count(&self, user_id: Option<&str>, risk_level: Option<RiskLevel>) -> Result<u64> {
        let mut query = MonitoredDestination::find();

        if let Some(user_id) = user_id {
            query = query.filter(monitored_destination::Column::UserId.eq(user_id));
        }
        if let Some(level) = risk_level {
            query = query.filter(monitored_destination::Column::RiskLevel.eq(level.as_str()));
        }

        Ok(query.count(self.db.as_ref()).await?)
    }

    /// Destinations per risk level. Rows without a level count as `UNKNOWN`.
    pub async fn risk_level_statistics(&self, user_id: Option<&str>) -> Result<BTreeMap<String, u64>> {
        let mut query = MonitoredDestination::find();

        if let Some(user_id) = user_id {
            query = query.filter(monitored_destination::Column::UserId.eq(user_id));
        }

        let destinations = query.all(self.db.as_ref()).await?;
        Ok(tally(destinations.iter().map(|d| d.risk_level.as_deref())))
    }

    /// HIGH and CRITICAL destinations, most severe first.
    pub async fn high_risk(
        &self,
        user_id: Option<&str>
    ) -> Result<Vec<monitored_destination::Model>> {
        let mut query = MonitoredDestination::find().filter(
            monitored_destination::Column::RiskLevel.is_in([
                RiskLevel::High.as_str(),
                RiskLevel::Critical.as_str(),
            ])
        );

        if let Some(user_id) = user_id {
            query = query.filter(monitored_destination::Column::UserId.eq(user_id));
        }

        let mut destinations = query.all(self.db.as_ref()).await?;
        destinations.sort_by_key(|d| {
            std::cmp::Reverse(d.risk_level.as_deref().and_then(|l| l.parse::<RiskLevel>().ok()))
        });

        Ok(destinations)
    }

    pub async fn update(
        &self,
        id: i32,
        update: DestinationUpdate
    ) -> Result<monitored_destination::Model> {
        let existing = self.get(id).await?;
        if update.is_empty() {
            return Ok(existing);
        }

        let mut active: monitored_destination::ActiveModel = existing.into();
        if let Some(user_id) = update.user_id {
            active.user_id = ActiveValue::Set(Some(user_id));
        }
        if let Some(location) = update.location {
            active.location = ActiveValue::Set(Some(location));
        }
        if let Some(level) = update.risk_level {
            active.risk_level = ActiveValue::Set(Some(level.to_string()));
        }
        if let Some(last_checked) = update.last_checked {
            active.last_checked = ActiveValue::Set(Some(last_checked));
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Store the outcome of a risk assessment on `conn`, which may be a transaction.
    pub async fn record_assessment<C: ConnectionTrait>(
        conn: &C,
        destination: monitored_destination::Model,
        level: RiskLevel,
        checked_on: NaiveDate
    ) -> Result<monitored_destination::Model> {
        let mut active: monitored_destination::ActiveModel = destination.into();
        active.risk_level = ActiveValue::Set(Some(level.to_string()));
        active.last_checked = ActiveValue::Set(Some(checked_on));

        Ok(active.update(conn).await?)
    }

    pub async fn delete(
        &self,
        selection: &DestinationDeletion
    ) -> Result<Vec<monitored_destination::Model>> {
        let condition = selection.condition()?;

        let doomed = MonitoredDestination::find().filter(condition).all(self.db.as_ref()).await?;
        if doomed.is_empty() {
            return Err(AppError::NotFound("No monitored destinations found to delete".to_string()));
        }

        let ids: Vec<i32> = doomed
            .iter()
            .map(|d| d.id)
            .collect();
        MonitoredDestination::delete_many()
            .filter(monitored_destination::Column::Id.is_in(ids))
            .exec(self.db.as_ref()).await?;

        Ok(doomed)
    }

    /// Remove destinations last checked more than `days` ago. Never-checked rows are kept.
    pub async fn delete_stale(
        &self,
        today: NaiveDate,
        days: i64
    ) -> Result<Vec<monitored_destination::Model>> {
        let cutoff = stale_cutoff(today, days)?;

        let doomed = MonitoredDestination::find()
            .filter(monitored_destination::Column::LastChecked.lt(cutoff))
            .all(self.db.as_ref()).await?;
        if doomed.is_empty() {
            return Err(AppError::NotFound("No stale monitored destinations found to delete".to_string()));
        }

        let ids: Vec<i32> = doomed
            .iter()
            .map(|d| d.id)
            .collect();
        let result = MonitoredDestination::delete_many()
            .filter(monitored_destination::Column::Id.is_in(ids))
            .exec(self.db.as_ref()).await?;

        tracing::info!("removed {} stale destination(s) not checked since {}", result.rows_affected, cutoff);
        Ok(doomed)
    }
}
