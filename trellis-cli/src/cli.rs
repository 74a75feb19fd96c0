//! CLI definition for the Trellis command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Trellis - ordered kanban boards on the local filesystem.
///
/// Every command prints its JSON result on stdout. Mutations are appended to
/// the store's activity log, attributed to `--user`.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version)]
#[command(about = "Ordered kanban boards with fractional order keys")]
#[command(
    long_about = "Trellis keeps boards, columns and cards as JSON files under a data \
    directory. Cards and columns are ordered by fractional keys, so moving one never \
    renumbers its neighbors.\n\n\
    Configuration is read from trellis.toml (or --config) and TRELLIS_-prefixed \
    environment variables:\n  \
    TRELLIS_ROOT             Data directory (default .trellis)\n  \
    TRELLIS_MIN_GAP          Neighbor gap below which a move respaces the column\n  \
    TRELLIS_LOCK_TIMEOUT_MS  How long a write waits for the store lock"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Data directory, overriding the configured one
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file to use instead of ./trellis.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// User id the commands run as
    #[arg(short, long, global = true, value_name = "USER_ID", default_value = "usr_local")]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list, show, update and delete boards
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },

    /// Add, rename, move and delete columns
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Add, edit, move and delete cards
    Card {
        #[command(subcommand)]
        action: CardAction,
    },

    /// List every operation with its parameters
    Ops,
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// Create a board
    Create {
        /// Board name
        name: String,
        /// Six-digit hex color
        #[arg(short, long, default_value = "#3b82f6")]
        color: String,
    },

    /// List your boards
    List,

    /// Show a board with its columns and cards in order
    Show {
        /// Board ID
        id: String,
    },

    /// Rename or recolor a board
    Update {
        /// Board ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a board with its columns and cards
    Delete {
        /// Board ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Append a column to a board
    Add {
        /// Board ID
        board: String,
        /// Column name
        name: String,
        /// Use this column ID instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// Rename a column
    Update {
        /// Column ID
        id: String,
        /// New name
        name: String,
    },

    /// Move a column; with no neighbors it goes to the end
    Move {
        /// Column ID
        id: String,
        /// Place right after this column
        #[arg(long)]
        before: Option<String>,
        /// Place right before this column
        #[arg(long)]
        after: Option<String>,
    },

    /// Delete a column and its cards
    Delete {
        /// Column ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardAction {
    /// Append a card to a column
    Add {
        /// Column ID
        column: String,
        /// Card title
        title: String,
        /// Card body
        #[arg(long)]
        content: Option<String>,
        /// Use this card ID instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// Edit a card's title or content
    Update {
        /// Card ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        /// New content; an empty string clears it
        #[arg(long)]
        content: Option<String>,
    },

    /// Move a card; with no neighbors it goes to the bottom of the column
    Move {
        /// Card ID
        id: String,
        /// Target column ID
        #[arg(long = "to", value_name = "COLUMN_ID")]
        column: String,
        /// Place right after this card
        #[arg(long)]
        before: Option<String>,
        /// Place right before this card
        #[arg(long)]
        after: Option<String>,
    },

    /// Delete a card
    Delete {
        /// Card ID
        id: String,
    },
}
