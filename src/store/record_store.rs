//! In-memory BIN record store
//!
//! The table is built off to the side by [`super::import`] and installed with a
//! single pointer swap, so readers always see either the complete previous
//! table or the complete new one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::io::AsyncRead;
use parking_lot::RwLock;
use tokio_util::compat::TokioAsyncReadCompatExt;

use super::import::read_bin_table;
use crate::error::{BinForgeError, Result};
use crate::types::BinRecord;

type BinTable = HashMap<String, BinRecord>;

/// Lifecycle of a [`RecordStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing has been installed; every lookup misses
    Unloaded,
    /// An import is running; the previous table, if any, is still served
    Loading,
    /// A table is installed
    Ready,
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreState::Unloaded => write!(f, "unloaded"),
            StoreState::Loading => write!(f, "loading"),
            StoreState::Ready => write!(f, "ready"),
        }
    }
}

/// Installed table and import bookkeeping, guarded together so the reported
/// state always agrees with what lookups see.
#[derive(Debug, Default)]
struct Slot {
    table: Option<Arc<BinTable>>,
    loads_in_flight: usize,
}

impl Slot {
    fn state(&self) -> StoreState {
        if self.loads_in_flight > 0 {
            StoreState::Loading
        } else if self.table.is_some() {
            StoreState::Ready
        } else {
            StoreState::Unloaded
        }
    }
}

/// Read-mostly map from BIN prefix to record.
#[derive(Debug)]
pub struct RecordStore {
    slot: RwLock<Slot>,
    source: RwLock<Option<PathBuf>>,
}

impl RecordStore {
    /// Create an empty, unloaded store
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
            source: RwLock::new(None),
        }
    }

    /// Build a ready store from records already in memory
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = BinRecord>,
    {
        let store = Self::new();
        let table = records
            .into_iter()
            .map(|r| (r.prefix.clone(), r))
            .collect::<BinTable>();
        store.slot.write().table = Some(Arc::new(table));
        store
    }

    pub fn state(&self) -> StoreState {
        self.slot.read().state()
    }

    /// Whether a table is installed and lookups can hit
    pub fn is_ready(&self) -> bool {
        self.slot.read().table.is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshot().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the last successful file import
    pub fn source(&self) -> Option<PathBuf> {
        self.source.read().clone()
    }

    /// Exact-key lookup. Misses while no table is installed.
    pub fn get(&self, key: &str) -> Option<BinRecord> {
        self.snapshot()?.get(key).cloned()
    }

    /// Lookup with truncation: the prefix as given, then its first 8 digits,
    /// then its first 6. Each candidate is an exact-key match.
    pub fn lookup(&self, prefix: &str) -> Option<BinRecord> {
        let table = self.snapshot()?;
        lookup_keys(prefix)
            .into_iter()
            .find_map(|key| table.get(key))
            .cloned()
    }

    /// Import `path` and install the result.
    ///
    /// Returns `false` when the file cannot be opened or parsed; the store
    /// then keeps whatever table it had before (none on a first load).
    pub async fn load(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load(path).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load BIN database");
                false
            }
        }
    }

    /// Import `path` and install the result, returning the record count.
    pub async fn try_load(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| BinForgeError::import(e.to_string(), Some(display.clone())))?;

        let count = self
            .load_from_reader(file.compat())
            .await
            .map_err(|e| match e {
                BinForgeError::Import { message, .. } => {
                    BinForgeError::import(message, Some(display.clone()))
                }
                other => other,
            })?;

        *self.source.write() = Some(path.to_path_buf());
        Ok(count)
    }

    /// Re-import the last successfully loaded file
    pub async fn reload(&self) -> bool {
        match self.source() {
            Some(path) => self.load(path).await,
            None => {
                tracing::warn!("Reload requested before any BIN database was loaded");
                false
            }
        }
    }

    /// Import from any async reader and install the result.
    pub async fn load_from_reader<R>(&self, reader: R) -> Result<usize>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = Instant::now();
        self.begin_loading();

        match read_bin_table(reader).await {
            Ok(summary) => {
                let count = summary.records.len();
                self.finish_loading(Some(summary.records));
                tracing::info!(
                    records = count,
                    rows = summary.rows_read,
                    skipped = summary.rows_skipped,
                    duration_ms = %start.elapsed().as_millis(),
                    "BIN database loaded"
                );
                Ok(count)
            }
            Err(e) => {
                self.finish_loading(None);
                Err(e)
            }
        }
    }

    fn begin_loading(&self) {
        self.slot.write().loads_in_flight += 1;
    }

    /// End one import; a finished table replaces the installed one.
    fn finish_loading(&self, table: Option<BinTable>) {
        let mut slot = self.slot.write();
        slot.loads_in_flight = slot.loads_in_flight.saturating_sub(1);
        if let Some(table) = table {
            slot.table = Some(Arc::new(table));
        }
    }

    fn snapshot(&self) -> Option<Arc<BinTable>> {
        self.slot.read().table.clone()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate keys tried for `prefix`, in order, without duplicates.
pub fn lookup_keys(prefix: &str) -> Vec<&str> {
    let mut keys = vec![prefix];
    if prefix.len() > 6 {
        for len in [8, 6] {
            if let Some(key) = prefix.get(..len) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }
    keys
}
