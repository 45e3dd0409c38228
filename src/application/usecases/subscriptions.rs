use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    application::{
        mappers::subscriptions::CreateSubscriptionMapper,
        validators::subscriptions::{CreateSubscriptionValidator, ValidationError},
    },
    domain::{
        clock::Clock,
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            subscriptions::{CreateSubscriptionRequest, SubscriptionModel},
        },
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscription request is invalid")]
    Validation(Vec<ValidationError>),
    #[error("subscription {0} not found")]
    NotFound(i64),
    #[error("Only active subscription {0} can be canceled")]
    NotActive(i64),
    #[error("Subscription {0} has already expired")]
    AlreadyExpired(i64),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            SubscriptionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::NotActive(_) | SubscriptionError::AlreadyExpired(_) => {
                StatusCode::CONFLICT
            }
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

/// Orchestrates the subscription lifecycle: upsert reconciliation plus the
/// cancel/expire state machine. Stateless apart from injected collaborators.
pub struct SubscriptionUseCase<R, C>
where
    R: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    subscription_repo: Arc<R>,
    validator: CreateSubscriptionValidator<C>,
    mapper: CreateSubscriptionMapper,
}

impl<R, C> SubscriptionUseCase<R, C>
where
    R: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        subscription_repo: Arc<R>,
        validator: CreateSubscriptionValidator<C>,
        mapper: CreateSubscriptionMapper,
    ) -> Self {
        Self {
            subscription_repo,
            validator,
            mapper,
        }
    }

    /// Finds the existing subscription for the request's (user, provider)
    /// pair or creates a fresh one, then persists and returns it. A repeated
    /// creation request for the same pair is an idempotent renewal: the
    /// existing record wins unchanged, the request's name and expiration are
    /// not applied to it.
    pub async fn upsert(
        &self,
        request: CreateSubscriptionRequest,
    ) -> UseCaseResult<SubscriptionModel> {
        let validation = self.validator.validate(&request);
        if validation.has_errors() {
            let errors = validation.into_errors();
            warn!(
                error_count = errors.len(),
                status = SubscriptionError::Validation(vec![]).status_code().as_u16(),
                "subscriptions: creation request failed validation"
            );
            return Err(SubscriptionError::Validation(errors));
        }

        let user_id = request
            .user_id
            .ok_or_else(|| SubscriptionError::Internal(anyhow!("validated request missing userId")))?;

        let existing = self
            .subscription_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(
                    user_id,
                    db_error = ?err,
                    "subscriptions: failed to list subscriptions for user"
                );
                SubscriptionError::Internal(err)
            })?;

        let subscription = match existing
            .into_iter()
            .find(|sub| Some(sub.provider.as_str()) == request.provider.as_deref())
        {
            Some(current) => {
                info!(
                    user_id,
                    subscription_id = ?current.id,
                    provider = %current.provider,
                    "subscriptions: reusing existing subscription for provider"
                );
                current
            }
            None => {
                let fresh = self.mapper.map(&request).ok_or_else(|| {
                    SubscriptionError::Internal(anyhow!("validated request could not be mapped"))
                })?;
                info!(
                    user_id,
                    provider = %fresh.provider,
                    "subscriptions: creating new subscription"
                );
                fresh
            }
        };

        let persisted = self
            .subscription_repo
            .upsert(subscription)
            .await
            .map_err(|err| {
                error!(
                    user_id,
                    db_error = ?err,
                    "subscriptions: failed to persist subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            user_id,
            subscription_id = ?persisted.id,
            status = %persisted.status,
            "subscriptions: upsert completed"
        );

        Ok(persisted)
    }

    /// Moves an active subscription to `Canceled`. Any other state is
    /// rejected before a write happens.
    pub async fn cancel(&self, subscription_id: i64) -> UseCaseResult<()> {
        let mut subscription = self.find_required(subscription_id).await?;

        if subscription.status != SubscriptionStatus::Active {
            let err = SubscriptionError::NotActive(subscription_id);
            warn!(
                subscription_id,
                current_status = %subscription.status,
                status = err.status_code().as_u16(),
                "subscriptions: cancel rejected for non-active subscription"
            );
            return Err(err);
        }

        subscription.status = SubscriptionStatus::Canceled;
        self.subscription_repo
            .update(subscription)
            .await
            .map_err(|err| {
                error!(
                    subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to persist cancellation"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(subscription_id, "subscriptions: subscription canceled");
        Ok(())
    }

    /// Moves a subscription to `Expired`. Only an already-expired
    /// subscription blocks the transition; a canceled one may still expire.
    pub async fn expire(&self, subscription_id: i64) -> UseCaseResult<()> {
        let mut subscription = self.find_required(subscription_id).await?;

        if subscription.status == SubscriptionStatus::Expired {
            let err = SubscriptionError::AlreadyExpired(subscription_id);
            warn!(
                subscription_id,
                status = err.status_code().as_u16(),
                "subscriptions: expire rejected for already-expired subscription"
            );
            return Err(err);
        }

        subscription.status = SubscriptionStatus::Expired;
        self.subscription_repo
            .update(subscription)
            .await
            .map_err(|err| {
                error!(
                    subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to persist expiration"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(subscription_id, "subscriptions: subscription expired");
        Ok(())
    }

    async fn find_required(&self, subscription_id: i64) -> UseCaseResult<SubscriptionModel> {
        self.subscription_repo
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(
                    subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to load subscription"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::NotFound(subscription_id);
                warn!(
                    subscription_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: subscription not found"
                );
                err
            })
    }
}
