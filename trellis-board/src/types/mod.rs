//! Core types for the board engine

mod board;
mod card;
mod ids;
mod session;
mod view;

pub use board::{Board, Column};
pub use card::Card;
pub use ids::{BoardId, CardId, ColumnId, UserId};
pub(crate) use ids::{has_prefixed_form, is_path_safe};
pub use session::Session;
pub use view::{BoardView, Lane};
