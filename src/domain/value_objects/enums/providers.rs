use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Payment channel a subscription was purchased through. The external request
/// carries the raw string form; unknown strings are not members.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Provider {
    Apple,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Apple => "APPLE",
            Provider::Google => "GOOGLE",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "APPLE" => Some(Provider::Apple),
            "GOOGLE" => Some(Provider::Google),
            _ => None,
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
