use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::subscriptions::SubscriptionModel;

/// Persistence port for subscription records. Each call is a single atomic
/// statement against the store; the use case never wraps calls in a
/// transaction of its own.
#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn find_all(&self) -> Result<Vec<SubscriptionModel>>;

    async fn find_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionModel>>;

    /// Rows come back ordered by id ascending so "first matching provider"
    /// reconciliation does not depend on storage listing order.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<SubscriptionModel>>;

    /// Inserts a new row and returns it with the assigned id.
    async fn insert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel>;

    /// Writes back an already-persisted row. Fails when `id` is absent.
    async fn update(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel>;

    /// Insert when `id` is absent, update otherwise.
    async fn upsert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel>;

    /// Removes all rows for the user; true when at least one was removed.
    async fn delete_by_user_id(&self, user_id: i64) -> Result<bool>;
}
