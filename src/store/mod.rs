//! Local BIN database: import and in-memory index

pub mod columns;
pub mod import;
pub mod record_store;

pub use columns::{BinField, ColumnMap, COLUMN_SYNONYMS};
pub use import::{read_bin_table, ImportSummary};
pub use record_store::{lookup_keys, RecordStore, StoreState};

/// Default import file name, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "bin-list-data.csv";
