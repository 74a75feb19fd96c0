//! The operation and execution traits

use crate::{ExecutionResult, ParamMeta};
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata about a command, usually derived with `#[operation]`
pub trait Operation {
    fn verb(&self) -> &'static str;

    fn noun(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn parameters(&self) -> &'static [ParamMeta];

    /// Canonical "verb noun" string used in logs
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}
