//! Line-indexed record storage.
//!
//! A store is one text blob whose records are the `'\n'`-separated lines of
//! that blob. Records are addressed by their 1-based position, so inserting
//! or deleting a line shifts every later index by one.
//!
//! Every mutation is a full read-modify-write of the blob: load everything,
//! edit the line vector in memory, truncate and rewrite from offset 0. This
//! is not crash safe; a crash halfway through a rewrite can leave a torn
//! file behind. Concurrent readers never see a torn write only because the
//! [`crate::coordinator::AccessCoordinator`] keeps them out while it runs.

use std::{
    future::Future,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};

use crate::error::{Result, StoreError};

/// Whole-blob persistence underneath a [`RecordStore`].
pub trait Storage: Send + Sync {
    /// Returns the complete current content.
    fn load(&self) -> impl Future<Output = Result<String>> + Send;

    /// Replaces the complete content with `content`.
    fn save(&self, content: &str) -> impl Future<Output = Result<()>> + Send;
}

/// A store file on local disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates the file at `path`, truncating anything already there.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::File::create(&path)
            .await
            .map_err(|source| StoreError::io("creating store file", &path, source))?;
        Ok(Self { path })
    }
}

impl Storage for FileStorage {
    async fn load(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::io("reading store file", &self.path, source))
    }

    async fn save(&self, content: &str) -> Result<()> {
        let write = async {
            let mut file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)
                .await?;
            file.write_all(content.as_bytes()).await?;
            // tokio buffers file writes on a background thread; flush waits for them.
            file.flush().await
        };
        write
            .await
            .map_err(|source| StoreError::io("rewriting store file", &self.path, source))
    }
}

/// Keeps the blob in process memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    content: Mutex<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(content.into()),
        }
    }

    pub fn contents(&self) -> String {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Storage for MemoryStorage {
    async fn load(&self) -> Result<String> {
        Ok(self.contents())
    }

    async fn save(&self, content: &str) -> Result<()> {
        let mut guard = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.push_str(content);
        Ok(())
    }
}

/// Read/add/change/delete over the lines held by a [`Storage`].
///
/// Reads borrow the store shared and mutations borrow it exclusively, so a
/// `RwLock` around the store is enough to keep writers apart from everyone
/// else.
#[derive(Debug)]
pub struct RecordStore<S = FileStorage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the whole content verbatim.
    pub async fn read_all(&self) -> Result<String> {
        let content = self.storage.load().await?;
        if content.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        Ok(content)
    }

    /// Returns line `index` (1-based).
    pub async fn read_line(&self, index: usize) -> Result<String> {
        let content = self.read_all().await?;
        let lines = split_lines(&content);
        let position = position(index, lines.len())?;
        Ok(lines[position].to_string())
    }

    /// Appends `body` as the new last line.
    pub async fn add_append(&mut self, body: &str) -> Result<()> {
        let mut content = self.storage.load().await?;
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(body);
        self.storage.save(&content).await
    }

    /// Inserts `body` so that it becomes line `index`, shifting the line
    /// previously there and everything after it down by one.
    ///
    /// On an empty store only index 1 is accepted and `body` becomes the
    /// sole content.
    pub async fn add_at(&mut self, index: usize, body: &str) -> Result<()> {
        let content = self.storage.load().await?;
        if content.is_empty() {
            if index != 1 {
                return Err(StoreError::InvalidIndex);
            }
            return self.storage.save(body).await;
        }

        let mut lines = split_lines(&content);
        let position = position(index, lines.len())?;
        lines.insert(position, body);
        self.storage.save(&lines.join("\n")).await
    }

    /// Replaces line `index` with `body`.
    pub async fn change_at(&mut self, index: usize, body: &str) -> Result<()> {
        let content = self.read_all().await?;
        let mut lines = split_lines(&content);
        let position = position(index, lines.len())?;
        lines[position] = body;
        self.storage.save(&lines.join("\n")).await
    }

    /// Removes line `index`, shifting later lines up by one.
    pub async fn delete_at(&mut self, index: usize) -> Result<()> {
        let content = self.read_all().await?;
        let mut lines = split_lines(&content);
        let position = position(index, lines.len())?;
        lines.remove(position);
        self.storage.save(&lines.join("\n")).await
    }

    /// Truncates the store to empty.
    pub async fn delete_all(&mut self) -> Result<()> {
        self.read_all().await?;
        self.storage.save("").await
    }
}

fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Maps a 1-based index onto a vector position, rejecting `0` and anything
/// past `len`.
fn position(index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(StoreError::InvalidIndex);
    }
    Ok(index - 1)
}
