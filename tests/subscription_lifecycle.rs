use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use subtrack::application::{
    mappers::subscriptions::CreateSubscriptionMapper,
    usecases::subscriptions::{SubscriptionError, SubscriptionUseCase},
    validators::subscriptions::CreateSubscriptionValidator,
};
use subtrack::domain::{
    clock::Clock,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::{providers::Provider, subscription_statuses::SubscriptionStatus},
        subscriptions::{CreateSubscriptionRequest, SubscriptionModel},
    },
};

/// Deterministic stand-in for the system clock.
#[derive(Debug, Clone, Copy)]
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Table-in-a-Mutex repository with the same id-assignment and ordering
/// semantics as the postgres implementation.
#[derive(Default)]
struct InMemorySubscriptionRepository {
    rows: Mutex<Vec<SubscriptionModel>>,
    next_id: Mutex<i64>,
}

impl InMemorySubscriptionRepository {
    fn assign_id(&self) -> i64 {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        *next_id
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_all(&self) -> Result<Vec<SubscriptionModel>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionModel>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == Some(subscription_id))
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<SubscriptionModel>> {
        let mut rows: Vec<SubscriptionModel> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn insert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        let persisted = SubscriptionModel {
            id: Some(self.assign_id()),
            ..subscription
        };
        self.rows.lock().unwrap().push(persisted.clone());
        Ok(persisted)
    }

    async fn update(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == subscription.id)
            .ok_or_else(|| anyhow::anyhow!("no row with id {:?}", subscription.id))?;
        *row = subscription.clone();
        Ok(subscription)
    }

    async fn upsert(&self, subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        match subscription.id {
            Some(_) => self.update(subscription).await,
            None => self.insert(subscription).await,
        }
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.user_id != user_id);
        Ok(rows.len() < before)
    }
}

fn now() -> DateTime<Utc> {
    "2024-11-16T10:15:30Z".parse().unwrap()
}

fn build_use_case(
    repo: Arc<InMemorySubscriptionRepository>,
) -> SubscriptionUseCase<InMemorySubscriptionRepository, FixedClock> {
    SubscriptionUseCase::new(
        repo,
        CreateSubscriptionValidator::new(Arc::new(FixedClock(now()))),
        CreateSubscriptionMapper::new(),
    )
}

fn request(user_id: i64, provider: &str) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        user_id: Some(user_id),
        name: Some("Some name".to_string()),
        provider: Some(provider.to_string()),
        expiration_date: Some(now() + Duration::days(30)),
    }
}

#[tokio::test]
async fn upsert_creates_active_subscription_with_assigned_id() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let subscription = use_case.upsert(request(123, "APPLE")).await.unwrap();

    assert_eq!(subscription.user_id, 123);
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert!(subscription.id.is_some());
}

#[tokio::test]
async fn repeated_upsert_for_same_user_and_provider_is_idempotent() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let first = use_case.upsert(request(123, "APPLE")).await.unwrap();

    let mut renewal = request(123, "APPLE");
    renewal.name = Some("Renamed".to_string());
    let second = use_case.upsert(renewal).await.unwrap();

    // The stored record wins over the incoming request.
    assert_eq!(second, first);
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_user_different_provider_gets_a_second_subscription() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let apple = use_case.upsert(request(123, "APPLE")).await.unwrap();
    let google = use_case.upsert(request(123, "GOOGLE")).await.unwrap();

    assert_ne!(apple.id, google.id);
    assert_eq!(google.provider, Provider::Google);
    assert_eq!(repo.find_by_user_id(123).await.unwrap().len(), 2);
}

#[tokio::test]
async fn find_by_user_id_stays_id_ascending_after_updates() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let apple = use_case.upsert(request(123, "APPLE")).await.unwrap();
    use_case.upsert(request(123, "GOOGLE")).await.unwrap();

    // Rewriting the older row must not move it behind the newer one.
    use_case.cancel(apple.id.unwrap()).await.unwrap();

    let ids: Vec<Option<i64>> = repo
        .find_by_user_id(123)
        .await
        .unwrap()
        .iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn cancel_is_one_way_and_second_cancel_fails() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let subscription = use_case.upsert(request(123, "APPLE")).await.unwrap();
    let id = subscription.id.unwrap();

    use_case.cancel(id).await.unwrap();
    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Canceled);

    let err = use_case.cancel(id).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Only active subscription {id} can be canceled")
    );
}

#[tokio::test]
async fn canceled_subscription_can_still_expire() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let subscription = use_case.upsert(request(123, "APPLE")).await.unwrap();
    let id = subscription.id.unwrap();

    use_case.cancel(id).await.unwrap();
    use_case.expire(id).await.unwrap();

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);

    let err = use_case.expire(id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Subscription {id} has already expired"));
}

#[tokio::test]
async fn invalid_request_reports_every_failing_field() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    let err = use_case
        .upsert(CreateSubscriptionRequest::default())
        .await
        .unwrap_err();

    match err {
        SubscriptionError::Validation(errors) => {
            let codes: Vec<i32> = errors.iter().map(|error| error.code).collect();
            assert_eq!(codes, vec![100, 101, 102, 103]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_by_user_id_reports_whether_rows_were_removed() {
    let repo = Arc::new(InMemorySubscriptionRepository::default());
    let use_case = build_use_case(Arc::clone(&repo));

    use_case.upsert(request(123, "APPLE")).await.unwrap();

    assert!(repo.delete_by_user_id(123).await.unwrap());
    assert!(!repo.delete_by_user_id(12345).await.unwrap());
}
