use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
        value_objects::subscriptions::SubscriptionModel,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_all(&self) -> Result<Vec<SubscriptionModel>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = subscriptions::table
            .order(subscriptions::id.asc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        rows.into_iter().map(SubscriptionModel::try_from).collect()
    }

    async fn find_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionModel>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscriptions::table
            .find(subscription_id)
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        row.map(SubscriptionModel::try_from).transpose()
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<SubscriptionModel>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::id.asc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        rows.into_iter().map(SubscriptionModel::try_from).collect()
    }

    async fn insert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(subscriptions::table)
            .values(InsertSubscriptionEntity::from(&subscription))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        row.try_into()
    }

    async fn update(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        let subscription_id = subscription
            .id
            .ok_or_else(|| anyhow!("cannot update a subscription without an id"))?;
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(subscriptions::table.find(subscription_id))
            .set((
                subscriptions::user_id.eq(subscription.user_id),
                subscriptions::name.eq(subscription.name),
                subscriptions::provider.eq(subscription.provider.to_string()),
                subscriptions::status.eq(subscription.status.to_string()),
                subscriptions::expiration_date.eq(subscription.expiration_date),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        row.try_into()
    }

    async fn upsert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        match subscription.id {
            Some(_) => self.update(subscription).await,
            None => self.insert(subscription).await,
        }
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let removed = delete(subscriptions::table.filter(subscriptions::user_id.eq(user_id)))
            .execute(&mut conn)?;

        Ok(removed > 0)
    }
}
