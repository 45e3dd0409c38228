use crate::domain::value_objects::{
    enums::{providers::Provider, subscription_statuses::SubscriptionStatus},
    subscriptions::{CreateSubscriptionRequest, SubscriptionModel},
};

/// Turns a validated creation request into a fresh subscription: `Active`
/// status, no id. Returns `None` only when fed a request the validator would
/// have rejected, which is a caller contract violation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateSubscriptionMapper;

impl CreateSubscriptionMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, request: &CreateSubscriptionRequest) -> Option<SubscriptionModel> {
        Some(SubscriptionModel {
            id: None,
            user_id: request.user_id?,
            name: request.name.clone()?,
            provider: Provider::from_str(request.provider.as_deref()?)?,
            status: SubscriptionStatus::Active,
            expiration_date: request.expiration_date?,
        })
    }
}
