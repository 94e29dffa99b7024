use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
};
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::db::entity::{ reward, Reward };
use crate::error::{ AppError, Result };

pub struct RewardService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReward {
    pub route_id: Option<String>,
    #[serde(default)]
    pub reward_value: i32,
    #[serde(default)]
    pub avoided_risks: i32,
    #[serde(default)]
    pub claim_prevention_estimate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardUpdate {
    pub route_id: Option<String>,
    pub reward_value: Option<i32>,
    pub avoided_risks: Option<i32>,
    pub claim_prevention_estimate: Option<f64>,
}

impl RewardUpdate {
    pub fn is_empty(&self) -> bool {
        self.route_id.is_none() &&
            self.reward_value.is_none() &&
            self.avoided_risks.is_none() &&
            self.claim_prevention_estimate.is_none()
    }
}

/// Running totals shown on the rewards dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardSummary {
    pub user_id: String,
    pub total_points: i64,
    pub total_avoided_risks: i64,
    pub total_claim_prevention: f64,
    pub reward_count: usize,
}

impl RewardSummary {
    pub fn from_rewards(user_id: &str, rewards: &[reward::Model]) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_points: rewards
                .iter()
                .map(|r| r.reward_value as i64)
                .sum(),
            total_avoided_risks: rewards
                .iter()
                .map(|r| r.avoided_risks as i64)
                .sum(),
            total_claim_prevention: rewards
                .iter()
                .map(|r| r.claim_prevention_estimate)
                .sum(),
            reward_count: rewards.len(),
        }
    }
}

impl RewardService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: &str, new_reward: NewReward) -> Result<reward::Model> {
        let route_id = new_reward.route_id
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| AppError::missing("route_id"))?;

        if new_reward.reward_value < 0 || new_reward.avoided_risks < 0 {
            return Err(
                AppError::InvalidInput(
                    "reward_value and avoided_risks must not be negative".to_string()
                )
            );
        }

        let model = reward::ActiveModel {
            reward_id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id.to_string()),
            route_id: ActiveValue::Set(route_id),
            reward_value: ActiveValue::Set(new_reward.reward_value),
            avoided_risks: ActiveValue::Set(new_reward.avoided_risks),
            claim_prevention_estimate: ActiveValue::Set(new_reward.claim_prevention_estimate),
            created_at: ActiveValue::Set(Utc::now()),
        };

        let model = model.insert(self.db.as_ref()).await?;
        tracing::info!(
            "reward {} granted to {}: {} points",
            model.reward_id,
            model.user_id,
            model.reward_value
        );
        Ok(model)
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<reward::Model>> {
        let rewards = Reward::find()
            .filter(reward::Column::UserId.eq(user_id))
            .order_by_desc(reward::Column::CreatedAt)
            .all(self.db.as_ref()).await?;
        Ok(rewards)
    }

    pub async fn summary(&self, user_id: &str) -> Result<RewardSummary> {
        let rewards = self.list_for_user(user_id).await?;
        Ok(RewardSummary::from_rewards(user_id, &rewards))
    }

    async fn find_owned(&self, user_id: &str, reward_id: Uuid) -> Result<reward::Model> {
        Reward::find_by_id(reward_id)
            .filter(reward::Column::UserId.eq(user_id))
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: &str,
        reward_id: Uuid,
        update: RewardUpdate
    ) -> Result<reward::Model> {
        let existing = self.find_owned(user_id, reward_id).await?;
        if update.is_empty() {
            return Ok(existing);
        }

        let mut active: reward::ActiveModel = existing.into();
        if let Some(route_id) = update.route_id {
            active.route_id = ActiveValue::Set(route_id);
        }
        if let Some(value) = update.reward_value {
            active.reward_value = ActiveValue::Set(value);
        }
        if let Some(avoided) = update.avoided_risks {
            active.avoided_risks = ActiveValue::Set(avoided);
        }
        if let Some(estimate) = update.claim_prevention_estimate {
            active.claim_prevention_estimate = ActiveValue::Set(estimate);
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete(&self, user_id: &str, reward_id: Uuid) -> Result<Vec<reward::Model>> {
        let existing = self.find_owned(user_id, reward_id).await?;

        Reward::delete_many()
            .filter(reward::Column::UserId.eq(user_id))
            .filter(reward::Column::RewardId.eq(reward_id))
            .exec(self.db.as_ref()).await?;

        Ok(vec![existing])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(value: i32, avoided: i32, estimate: f64) -> reward::Model {
        reward::Model {
            reward_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            route_id: "route-1".to_string(),
            reward_value: value,
            avoided_risks: avoided,
            claim_prevention_estimate: estimate,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_totals() {
        let rewards = vec![reward(50, 2, 1200.0), reward(15, 1, 300.5)];
        let summary = RewardSummary::from_rewards("user-1", &rewards);

        assert_eq!(summary.total_points, 65);
        assert_eq!(summary.total_avoided_risks, 3);
        assert_eq!(summary.reward_count, 2);
        assert!((summary.total_claim_prevention - 1500.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = RewardSummary::from_rewards("user-2", &[]);
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.reward_count, 0);
    }
}
