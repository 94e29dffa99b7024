use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entity::{ risk_alert, RiskAlert };
use crate::enums::RiskLevel;
use crate::error::{ AppError, Result };

pub struct RiskAlertService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRiskAlert {
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub severity: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskAlertUpdate {
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub severity: Option<RiskLevel>,
    pub acknowledged: Option<bool>,
}

impl RiskAlertUpdate {
    pub fn is_empty(&self) -> bool {
        self.alert_type.is_none() &&
            self.message.is_none() &&
            self.severity.is_none() &&
            self.acknowledged.is_none()
    }
}

impl RiskAlertService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: &str, alert: NewRiskAlert) -> Result<risk_alert::Model> {
        let alert_type = alert.alert_type
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::missing("alert_type"))?;
        let message = alert.message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| AppError::missing("message"))?;
        let severity = alert.severity.ok_or_else(|| AppError::missing("severity"))?;

        self.raise(user_id, &alert_type, &message, severity).await
    }

    /// Insert an unacknowledged alert.
    pub async fn raise(
        &self,
        user_id: &str,
        alert_type: &str,
        message: &str,
        severity: RiskLevel
    ) -> Result<risk_alert::Model> {
        Self::raise_on(self.db.as_ref(), user_id, alert_type, message, severity).await
    }

    /// Same as [`raise`](Self::raise) but on `conn`, which may be a transaction.
    pub async fn raise_on<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        alert_type: &str,
        message: &str,
        severity: RiskLevel
    ) -> Result<risk_alert::Model> {
        let model = risk_alert::ActiveModel {
            alert_id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id.to_string()),
            alert_type: ActiveValue::Set(alert_type.to_string()),
            message: ActiveValue::Set(message.to_string()),
            severity: ActiveValue::Set(severity.to_string()),
            timestamp: ActiveValue::Set(Utc::now()),
            acknowledged: ActiveValue::Set(false),
        };

        let model = model.insert(conn).await?;
        tracing::info!("{} risk alert {} raised for {}", severity, model.alert_id, user_id);
        Ok(model)
    }

    /// Newest first, optionally narrowed to acknowledged or pending alerts.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        acknowledged: Option<bool>
    ) -> Result<Vec<risk_alert::Model>> {
        let mut query = RiskAlert::find().filter(risk_alert::Column::UserId.eq(user_id));

        if let Some(acknowledged) = acknowledged {
            query = query.filter(risk_alert::Column::Acknowledged.eq(acknowledged));
        }

        let alerts = query.order_by_desc(risk_alert::Column::Timestamp).all(self.db.as_ref()).await?;
        Ok(alerts)
    }

    async fn find_owned(&self, user_id: &str, alert_id: Uuid) -> Result<risk_alert::Model> {
        RiskAlert::find_by_id(alert_id)
            .filter(risk_alert::Column::UserId.eq(user_id))
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("Risk alert not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: &str,
        alert_id: Uuid,
        update: RiskAlertUpdate
    ) -> Result<risk_alert::Model> {
        let existing = self.find_owned(user_id, alert_id).await?;
        if update.is_empty() {
            return Ok(existing);
        }

        let mut active: risk_alert::ActiveModel = existing.into();
        if let Some(alert_type) = update.alert_type {
            active.alert_type = ActiveValue::Set(alert_type);
        }
        if let Some(message) = update.message {
            active.message = ActiveValue::Set(message);
        }
        if let Some(severity) = update.severity {
            active.severity = ActiveValue::Set(severity.to_string());
        }
        if let Some(acknowledged) = update.acknowledged {
            active.acknowledged = ActiveValue::Set(acknowledged);
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete(&self, user_id: &str, alert_id: Uuid) -> Result<Vec<risk_alert::Model>> {
        let existing = self.find_owned(user_id, alert_id).await?;

        RiskAlert::delete_many()
            .filter(risk_alert::Column::UserId.eq(user_id))
            .filter(risk_alert::Column::AlertId.eq(alert_id))
            .exec(self.db.as_ref()).await?;

        Ok(vec![existing])
    }
}
