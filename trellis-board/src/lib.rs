//! Kanban board engine with fractional order keys and file-backed storage
//!
//! Boards hold columns, columns hold cards. Columns within a board and cards
//! within a column are positioned by `f64` order keys: a new element goes to
//! `max + 1`, a moved element gets the midpoint of its new neighbors, and no
//! sibling is ever renumbered. When repeated midpoints exhaust the precision
//! between two neighbors the move respaces that one scope to `1, 2, 3, …`.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trellis_board::{board::CreateBoard, card::{AddCard, MoveCard}, column::AddColumn};
//! use trellis_board::{BoardStore, Execute, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(BoardStore::new("/path/to/.trellis"));
//! let ctx = store.session(Session::new("usr_alice"));
//!
//! let board = CreateBoard::new("Roadmap", "#3b82f6").execute(&ctx).await.into_result()?;
//! let todo = AddColumn::new(board["id"].as_str().unwrap_or_default(), "Todo")
//!     .execute(&ctx).await.into_result()?;
//! let todo = todo["id"].as_str().unwrap_or_default();
//!
//! let a = AddCard::new(todo, "a").execute(&ctx).await.into_result()?;
//! let b = AddCard::new(todo, "b").execute(&ctx).await.into_result()?;
//!
//! // put b above a
//! MoveCard::new(b["id"].as_str().unwrap_or_default(), todo)
//!     .after(a["id"].as_str().unwrap_or_default())
//!     .execute(&ctx).await.into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! .trellis/
//! ├── boards/{id}.json
//! ├── columns/{id}.json
//! ├── cards/{id}.json
//! ├── logs/{board_id}.jsonl     # Per-board operation log
//! ├── activity/current.jsonl    # Global operation log
//! ├── .generation               # Write counter for view revalidation
//! └── .lock
//! ```

pub mod config;
mod context;
pub mod drop;
mod error;
mod execution;
pub mod optimistic;
pub mod order;
mod processor;
mod relocate;
pub mod scope;
pub mod types;

// Command modules
pub mod board;
pub mod card;
pub mod column;

// Re-export Execute trait and types from operations crate
pub use trellis_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::{BoardConfig, ConfigError};
pub use context::{BoardContext, BoardStore, StoreLock};
pub use error::{BoardError, Result};
pub use order::{OrderAllocator, OrderError, Placement};
pub use processor::BoardOperationProcessor;

pub use types::{Board, BoardId, BoardView, Card, CardId, Column, ColumnId, Lane, Session, UserId};
