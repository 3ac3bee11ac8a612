//! Streaming import of delimited BIN tables
//!
//! Rows are pulled one at a time through csv-async, so a table with hundreds
//! of thousands of rows never has to sit in memory as raw text.

use std::collections::HashMap;

use csv_async::{AsyncReaderBuilder, Trim};
use futures::io::AsyncRead;
use futures::stream::StreamExt;

use super::columns::ColumnMap;
use crate::error::{BinForgeError, Result};
use crate::types::BinRecord;

/// Rows between cooperative yields to the scheduler
const YIELD_EVERY: usize = 8_192;

/// Output of one import pass
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub records: HashMap<String, BinRecord>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Read a BIN table with a header row from `reader`.
///
/// Later rows with a key already seen replace the earlier record. A header
/// without any recognized key column, or a row the CSV parser rejects, fails
/// the whole import.
pub async fn read_bin_table<R>(reader: R) -> Result<ImportSummary>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .create_reader(reader);

    let headers = csv_reader.headers().await?.clone();
    let columns = ColumnMap::from_headers(headers.iter());
    if !columns.has_key() {
        return Err(BinForgeError::import(
            format!("no BIN column among headers: {}", headers.iter().collect::<Vec<_>>().join(",")),
            None,
        ));
    }

    let mut summary = ImportSummary::default();
    let mut rows = csv_reader.records();

    while let Some(row) = rows.next().await {
        let row = row?;
        summary.rows_read += 1;

        match columns.to_record(&row) {
            Some(record) => {
                summary.records.insert(record.prefix.clone(), record);
            }
            None => summary.rows_skipped += 1,
        }

        if summary.rows_read % YIELD_EVERY == 0 {
            tokio::task::yield_now().await;
        }
    }

    tracing::debug!(
        rows_read = summary.rows_read,
        rows_skipped = summary.rows_skipped,
        unique = summary.records.len(),
        "BIN table parsed"
    );

    Ok(summary)
}
