//! Request-scoped session

use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// The authenticated user a request runs on behalf of.
///
/// Authentication happens before a `Session` exists; commands only use it
/// for ownership checks and log attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserId,
}

impl Session {
    pub fn new(user: impl Into<UserId>) -> Self {
        Self { user: user.into() }
    }
}
