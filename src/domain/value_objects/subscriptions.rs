use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    value_objects::enums::{providers::Provider, subscription_statuses::SubscriptionStatus},
};

/// Subscription as the use case sees it. `id` is `None` until persistence
/// assigns one on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub provider: Provider,
    pub status: SubscriptionStatus,
    pub expiration_date: DateTime<Utc>,
}

/// Incoming creation request, pre-validation. Every field is optional so the
/// validator can report absent values instead of the deserializer rejecting
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionEntity> for SubscriptionModel {
    type Error = anyhow::Error;

    fn try_from(entity: SubscriptionEntity) -> Result<Self, Self::Error> {
        let provider = Provider::from_str(&entity.provider)
            .ok_or_else(|| anyhow!("unknown provider stored for subscription {}", entity.id))?;

        Ok(SubscriptionModel {
            id: Some(entity.id),
            user_id: entity.user_id,
            name: entity.name,
            provider,
            status: SubscriptionStatus::from_str(&entity.status),
            expiration_date: entity.expiration_date,
        })
    }
}

impl From<&SubscriptionModel> for InsertSubscriptionEntity {
    fn from(model: &SubscriptionModel) -> Self {
        InsertSubscriptionEntity {
            user_id: model.user_id,
            name: model.name.clone(),
            provider: model.provider.to_string(),
            status: model.status.to_string(),
            expiration_date: model.expiration_date,
        }
    }
}
