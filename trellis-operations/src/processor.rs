//! Operation processors: execute, then record

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations and takes care of whatever the result's log entry needs
/// (attribution, persistence). Implemented by each command crate.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
{
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>;
}
