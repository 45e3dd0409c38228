use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    clock::Clock,
    value_objects::{
        enums::providers::Provider, subscriptions::CreateSubscriptionRequest,
    },
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    pub code: i32,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: i32, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// Ordered accumulation of validation failures; empty means the request is
/// valid. Errors append in check-declaration order, never short-circuiting.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Field-level gate over a creation request. Pure apart from reading the
/// injected clock; every check runs regardless of earlier failures.
pub struct CreateSubscriptionValidator<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> CreateSubscriptionValidator<C>
where
    C: Clock + Send + Sync,
{
    pub fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    pub fn validate(&self, request: &CreateSubscriptionRequest) -> ValidationResult {
        let mut result = ValidationResult::default();

        if request.user_id.is_none() {
            result.add(ValidationError::new(100, "userId is invalid"));
        }

        if request
            .name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
        {
            result.add(ValidationError::new(101, "name is invalid"));
        }

        if request
            .provider
            .as_deref()
            .and_then(Provider::from_str)
            .is_none()
        {
            result.add(ValidationError::new(102, "provider is invalid"));
        }

        match request.expiration_date {
            Some(expiration_date) if expiration_date > self.clock.now() => {}
            _ => result.add(ValidationError::new(103, "expirationDate is invalid")),
        }

        result
    }
}
