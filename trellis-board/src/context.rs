//! Storage primitives and the request-scoped context.
//!
//! [`BoardStore`] is file-backed I/O plus a board-keyed read cache; it holds
//! no business logic. [`BoardContext`] pairs a store with the session of the
//! request being served and is what every command executes against.

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::order::OrderAllocator;
use crate::types::{
    is_path_safe, Board, BoardId, BoardView, Card, CardId, Column, ColumnId, Session, UserId,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use trellis_operations::LogEntry;

const LOCK_POLL: Duration = Duration::from_millis(10);

/// File-backed store for boards, columns and cards
pub struct BoardStore {
    root: PathBuf,
    allocator: OrderAllocator,
    lock_timeout: Duration,
    views: RwLock<HashMap<BoardId, CachedView>>,
}

/// A loaded view and the store generation it was read at
struct CachedView {
    generation: u64,
    view: Arc<BoardView>,
}

impl BoardStore {
    /// Store rooted at `root` with default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&BoardConfig::default().with_root(root))
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            root: config.root.clone(),
            allocator: config.allocator(),
            lock_timeout: config.lock_timeout(),
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_allocator(mut self, allocator: OrderAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Context for one request made by `session`'s user
    pub fn session(self: &Arc<Self>, session: Session) -> BoardContext {
        BoardContext {
            store: Arc::clone(self),
            session,
        }
    }

    pub fn allocator(&self) -> &OrderAllocator {
        &self.allocator
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    pub fn column_path(&self, id: &ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    pub fn card_path(&self, id: &CardId) -> PathBuf {
        self.cards_dir().join(format!("{}.json", id))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Per-board operation log
    pub fn board_log_path(&self, id: &BoardId) -> PathBuf {
        self.logs_dir().join(format!("{}.jsonl", id))
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Global operation log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Write counter shared by every store instance on this root
    pub fn generation_path(&self) -> PathBuf {
        self.root.join(".generation")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    pub fn directories_exist(&self) -> bool {
        [
            self.boards_dir(),
            self.columns_dir(),
            self.cards_dir(),
            self.logs_dir(),
            self.activity_dir(),
        ]
        .iter()
        .all(|dir| dir.is_dir())
    }

    /// Create the root and all subdirectories. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.boards_dir()).await?;
        fs::create_dir_all(self.columns_dir()).await?;
        fs::create_dir_all(self.cards_dir()).await?;
        fs::create_dir_all(self.logs_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        let not_found = || BoardError::BoardNotFound { id: id.to_string() };
        if !is_path_safe(id.as_str()) {
            return Err(not_found());
        }
        read_json(&self.board_path(id)).await?.ok_or_else(not_found)
    }

    pub async fn write_board(&self, board: &Board) -> Result<()> {
        check_writable(board.id.as_str())?;
        write_json(&self.board_path(&board.id), board).await
    }

    pub async fn delete_board_file(&self, id: &BoardId) -> Result<()> {
        check_writable(id.as_str())?;
        remove_if_exists(&self.board_path(id)).await
    }

    pub async fn read_all_boards(&self) -> Result<Vec<Board>> {
        read_dir_json(&self.boards_dir()).await
    }

    /// Boards owned by `user`, sorted by name
    pub async fn read_boards_owned_by(&self, user: &UserId) -> Result<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .read_all_boards()
            .await?
            .into_iter()
            .filter(|b| b.is_owned_by(user))
            .collect();
        boards.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(boards)
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    pub async fn read_column(&self, id: &ColumnId) -> Result<Column> {
        let not_found = || BoardError::ColumnNotFound { id: id.to_string() };
        if !is_path_safe(id.as_str()) {
            return Err(not_found());
        }
        read_json(&self.column_path(id)).await?.ok_or_else(not_found)
    }

    pub async fn write_column(&self, column: &Column) -> Result<()> {
        check_writable(column.id.as_str())?;
        write_json(&self.column_path(&column.id), column).await
    }

    pub async fn delete_column_file(&self, id: &ColumnId) -> Result<()> {
        check_writable(id.as_str())?;
        remove_if_exists(&self.column_path(id)).await
    }

    /// Columns of one board, in no particular order
    pub async fn read_columns(&self, board: &BoardId) -> Result<Vec<Column>> {
        let columns: Vec<Column> = read_dir_json(&self.columns_dir()).await?;
        Ok(columns.into_iter().filter(|c| &c.board_id == board).collect())
    }

    // =========================================================================
    // Card I/O
    // =========================================================================

    pub async fn read_card(&self, id: &CardId) -> Result<Card> {
        let not_found = || BoardError::CardNotFound { id: id.to_string() };
        if !is_path_safe(id.as_str()) {
            return Err(not_found());
        }
        read_json(&self.card_path(id)).await?.ok_or_else(not_found)
    }

    /// Write a card. Column and order land in the same atomic file write.
    pub async fn write_card(&self, card: &Card) -> Result<()> {
        check_writable(card.id.as_str())?;
        write_json(&self.card_path(&card.id), card).await
    }

    pub async fn delete_card_file(&self, id: &CardId) -> Result<()> {
        check_writable(id.as_str())?;
        remove_if_exists(&self.card_path(id)).await
    }

    /// Cards of one board, in no particular order
    pub async fn read_cards(&self, board: &BoardId) -> Result<Vec<Card>> {
        let cards: Vec<Card> = read_dir_json(&self.cards_dir()).await?;
        Ok(cards.into_iter().filter(|c| &c.board_id == board).collect())
    }

    /// Cards of one column, in no particular order
    pub async fn read_cards_in_column(&self, column: &ColumnId) -> Result<Vec<Card>> {
        let cards: Vec<Card> = read_dir_json(&self.cards_dir()).await?;
        Ok(cards.into_iter().filter(|c| &c.column_id == column).collect())
    }

    // =========================================================================
    // Read views
    // =========================================================================

    /// The board's read view, from cache when no store instance has written
    /// since it was loaded
    pub async fn read_view(&self, id: &BoardId) -> Result<Arc<BoardView>> {
        // taken before loading so a write racing the load is caught on the next hit
        let generation = self.generation().await?;
        if let Some(cached) = self.views.read().await.get(id) {
            if cached.generation == generation {
                tracing::trace!(board = %id, generation, "board view cache hit");
                return Ok(Arc::clone(&cached.view));
            }
        }

        let board = self.read_board(id).await?;
        let columns = self.read_columns(id).await?;
        let cards = self.read_cards(id).await?;
        let view = Arc::new(BoardView::new(board, columns, cards));

        self.views.write().await.insert(
            id.clone(),
            CachedView {
                generation,
                view: Arc::clone(&view),
            },
        );
        tracing::debug!(board = %id, generation, "board view loaded");
        Ok(view)
    }

    /// Current value of the shared write counter; 0 before the first write
    pub async fn generation(&self) -> Result<u64> {
        match fs::read_to_string(self.generation_path()).await {
            Ok(content) => Ok(content.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(path = %self.generation_path().display(), "unreadable generation counter");
                0
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a board's views stale in every store instance on this root.
    ///
    /// Called after each mutation while the store lock is still held, so
    /// increments from different processes never interleave.
    pub async fn invalidate(&self, id: &BoardId) -> Result<()> {
        self.views.write().await.remove(id);
        let next = self.generation().await? + 1;
        atomic_write(&self.generation_path(), next.to_string().as_bytes()).await?;
        tracing::trace!(board = %id, generation = next, "board view invalidated");
        Ok(())
    }

    pub async fn is_cached(&self, id: &BoardId) -> bool {
        self.views.read().await.contains_key(id)
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        append_log(&self.activity_path(), entry).await
    }

    pub async fn append_board_log(&self, board: &BoardId, entry: &LogEntry) -> Result<()> {
        check_writable(board.as_str())?;
        append_log(&self.board_log_path(board), entry).await
    }

    /// Global log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_log(&self.activity_path(), limit).await
    }

    /// One board's log entries, newest first
    pub async fn read_board_log(&self, board: &BoardId, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_log(&self.board_log_path(board), limit).await
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to take the exclusive store lock without waiting
    pub async fn lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(BoardError::LockBusy),
        }
    }

    /// Take the exclusive store lock, polling until the configured timeout.
    ///
    /// Read-then-write sequences (neighbor lookup, key allocation, persist)
    /// run under this lock so concurrent moves see each other's writes.
    pub async fn lock_with_timeout(&self) -> Result<StoreLock> {
        let start = Instant::now();
        loop {
            match self.lock().await {
                Ok(lock) => return Ok(lock),
                Err(BoardError::LockBusy) if start.elapsed() < self.lock_timeout => {
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(BoardError::LockBusy) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    tracing::warn!(elapsed_ms, "timed out waiting for store lock");
                    return Err(BoardError::LockTimeout { elapsed_ms });
                }
                Err(other) => return Err(other),
            }
        }
    }
}

/// RAII lock guard - releases on drop
pub struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Context passed to every command: the store plus who is asking
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<BoardStore>,
    session: Session,
}

impl BoardContext {
    pub fn new(store: Arc<BoardStore>, session: Session) -> Self {
        Self { store, session }
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> &UserId {
        &self.session.user
    }

    /// Read a board the session user owns
    pub async fn owned_board(&self, id: &BoardId) -> Result<Board> {
        let board = self.store.read_board(id).await?;
        if !board.is_owned_by(self.user()) {
            tracing::debug!(board = %id, user = %self.user(), "board access denied");
            return Err(BoardError::forbidden(self.user(), id));
        }
        Ok(board)
    }

    /// Read a column whose board the session user owns
    pub async fn owned_column(&self, id: &ColumnId) -> Result<(Board, Column)> {
        let column = self.store.read_column(id).await?;
        let board = self.owned_board(&column.board_id).await?;
        Ok((board, column))
    }

    /// Read a card whose board the session user owns
    pub async fn owned_card(&self, id: &CardId) -> Result<(Board, Card)> {
        let card = self.store.read_card(id).await?;
        let board = self.owned_board(&card.board_id).await?;
        Ok((board, card))
    }
}

/// Ids become file names; anything that could leave its directory is refused
fn check_writable(id: &str) -> Result<()> {
    if !is_path_safe(id) {
        return Err(BoardError::invalid_value("id", format!("{:?} is not a valid id", id)));
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content.as_bytes()).await
}

/// Every `*.json` file in `dir`; a missing directory is empty
async fn read_dir_json<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        // a file removed between listing and reading is simply skipped
        if let Some(item) = read_json(&path).await? {
            items.push(item);
        }
    }
    Ok(items)
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn append_log(path: &Path, entry: &LogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

async fn read_log(path: &Path, limit: Option<usize>) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let mut entries: Vec<LogEntry> = content
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    entries.reverse();

    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    Ok(entries)
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<BoardStore>) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        (temp, store)
    }

    #[tokio::test]
    async fn test_paths() {
        let (temp, store) = setup();
        let root = temp.path().join(".trellis");
        let id = BoardId::from_string("brd_x");

        assert_eq!(store.root(), root);
        assert_eq!(store.board_path(&id), root.join("boards").join("brd_x.json"));
        assert_eq!(store.board_log_path(&id), root.join("logs").join("brd_x.jsonl"));
    }

    #[tokio::test]
    async fn test_card_io_and_filters() {
        let (_temp, store) = setup();
        store.create_directories().await.unwrap();

        let board = BoardId::from_string("brd_a");
        let column = ColumnId::from_string("col_a");
        let card = Card::new("Write tests", 1.0, column.clone(), board.clone()).with_content("soon");
        store.write_card(&card).await.unwrap();
        store
            .write_card(&Card::new("elsewhere", 1.0, ColumnId::from_string("col_b"), BoardId::from_string("brd_b")))
            .await
            .unwrap();

        assert_eq!(store.read_card(&card.id).await.unwrap(), card);
        assert_eq!(store.read_cards(&board).await.unwrap().len(), 1);
        assert_eq!(store.read_cards_in_column(&column).await.unwrap().len(), 1);

        store.delete_card_file(&card.id).await.unwrap();
        assert!(matches!(
            store.read_card(&card.id).await,
            Err(BoardError::CardNotFound { .. })
        ));
        // deleting twice is fine
        store.delete_card_file(&card.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_from_uninitialized_store() {
        let (_temp, store) = setup();
        assert!(!store.directories_exist());
        assert!(store.read_all_boards().await.unwrap().is_empty());
        assert!(store.read_activity(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_view_cache_invalidation() {
        let (_temp, store) = setup();
        let board = Board::new("Cache", "#000000", UserId::from_string("usr_a"));
        store.write_board(&board).await.unwrap();

        let first = store.read_view(&board.id).await.unwrap();
        assert!(store.is_cached(&board.id).await);
        assert!(first.columns.is_empty());

        store
            .write_column(&Column::new("Todo", 1.0, board.id.clone()))
            .await
            .unwrap();
        // still the cached snapshot until invalidated
        assert!(store.read_view(&board.id).await.unwrap().columns.is_empty());

        store.invalidate(&board.id).await.unwrap();
        assert!(!store.is_cached(&board.id).await);
        assert_eq!(store.read_view(&board.id).await.unwrap().columns.len(), 1);
    }

    #[tokio::test]
    async fn test_view_revalidated_across_store_instances() {
        let (temp, store) = setup();
        let other = BoardStore::new(temp.path().join(".trellis"));
        let board = Board::new("Shared", "#000000", UserId::from_string("usr_a"));
        store.write_board(&board).await.unwrap();

        assert!(store.read_view(&board.id).await.unwrap().columns.is_empty());
        assert_eq!(store.generation().await.unwrap(), 0);

        // a write through another instance, as another process would make it
        other
            .write_column(&Column::new("Todo", 1.0, board.id.clone()))
            .await
            .unwrap();
        other.invalidate(&board.id).await.unwrap();

        assert_eq!(store.generation().await.unwrap(), 1);
        assert_eq!(store.read_view(&board.id).await.unwrap().columns.len(), 1);
        assert!(store.is_cached(&board.id).await);
    }

    #[tokio::test]
    async fn test_ids_outside_entity_dirs_refused() {
        let (temp, store) = setup();
        store.create_directories().await.unwrap();
        let victim = Board::new("Victim", "#000000", UserId::from_string("usr_v"));
        store.write_board(&victim).await.unwrap();

        let escape = format!("itm_x/../../boards/{}", victim.id);
        let mut card = Card::new("pwn", 1.0, ColumnId::from_string("col_a"), BoardId::from_string("brd_a"));
        card.id = CardId::from_string(escape.as_str());

        assert!(matches!(
            store.write_card(&card).await,
            Err(BoardError::InvalidValue { .. })
        ));
        assert!(matches!(
            store.read_card(&card.id).await,
            Err(BoardError::CardNotFound { .. })
        ));
        assert!(store.delete_card_file(&card.id).await.is_err());

        assert_eq!(store.read_board(&victim.id).await.unwrap(), victim);
        assert_eq!(store.read_all_boards().await.unwrap().len(), 1);
        assert!(!temp.path().join(".trellis").join("cards").join("itm_x").exists());
    }

    #[tokio::test]
    async fn test_locking() {
        let (_temp, store) = setup();

        let lock1 = store.lock().await.unwrap();
        assert!(matches!(store.lock().await, Err(BoardError::LockBusy)));

        drop(lock1);
        let _lock2 = store.lock().await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_timeout() {
        let temp = TempDir::new().unwrap();
        let config = BoardConfig {
            root: temp.path().join(".trellis"),
            lock_timeout_ms: 30,
            ..BoardConfig::default()
        };
        let store = BoardStore::from_config(&config);

        let _held = store.lock().await.unwrap();
        let result = store.lock_with_timeout().await;
        assert!(matches!(result, Err(BoardError::LockTimeout { .. })));
    }

    #[tokio::test]
    async fn test_ownership_checks() {
        let (_temp, store) = setup();
        let owner = UserId::from_string("usr_owner");
        let board = Board::new("Mine", "#000000", owner.clone());
        store.write_board(&board).await.unwrap();

        let mine = store.session(Session::new(owner));
        assert!(mine.owned_board(&board.id).await.is_ok());

        let theirs = store.session(Session::new("usr_other"));
        assert!(matches!(
            theirs.owned_board(&board.id).await,
            Err(BoardError::Forbidden { .. })
        ));
        assert!(matches!(
            theirs.owned_board(&BoardId::from_string("brd_missing")).await,
            Err(BoardError::BoardNotFound { .. })
        ));
    }
}
