//! # Trellis Operations
//!
//! Commands in Trellis are plain structs whose fields are their parameters.
//! The `#[operation]` attribute derives [`Operation`] metadata from those
//! fields, and each command implements [`Execute`] against the context type
//! of the crate that owns it.
//!
//! ```ignore
//! use trellis_operations::*;
//!
//! #[operation(verb = "move", noun = "card", description = "Move a card")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct MoveCard {
//!     /// The card to move
//!     pub id: CardId,
//!     /// Target column
//!     pub column: ColumnId,
//! }
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardError> for MoveCard {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
//!         // mutations return ExecutionResult::Logged, reads return Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod parameter;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use parameter::{ParamMeta, ParamType};
pub use processor::OperationProcessor;

pub use trellis_operations_macros::{operation, param};

pub use async_trait::async_trait;
pub use serde_json::Value;
