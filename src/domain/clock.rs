use chrono::{DateTime, Utc};
use mockall::automock;

/// Time source injected into validation so "expiration must be in the future"
/// stays deterministic under test.
#[automock]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
