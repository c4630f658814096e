use crate::config::TableWriteMode;
use crate::error::{BoxError, Error, Result};
use crate::sec::tickers::{Ticker, Tickers};
use crate::tui;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

mod dynamodb;

pub use dynamodb::DynamoDb;

/// A ticker in DynamoDB's attribute representation.
pub type Item = HashMap<String, AttributeValue>;

/// Most put requests a single `BatchWriteItem` call accepts.
pub const BATCH_SIZE: usize = 25;

/// Calls made per batch before its leftovers are given up on.
pub const MAX_ATTEMPTS: u32 = 5;

const BASE_BACKOFF: Duration = Duration::from_millis(50);

/// A key-value table tickers can be written to.
pub trait TickerTable {
    fn put_item(
        &self,
        table: &str,
        item: Item,
    ) -> impl Future<Output = std::result::Result<(), BoxError>> + Send;

    /// Write a batch of items, returning the ones the table did not process.
    fn put_batch(
        &self,
        table: &str,
        items: Vec<Item>,
    ) -> impl Future<Output = std::result::Result<Vec<Item>, BoxError>> + Send;
}

/// Marshal a ticker; the attribute names are its field names.
pub fn to_item(ticker: &Ticker) -> Result<Item> {
    let item: Item = serde_dynamo::to_item(ticker).map_err(|err| {
        error!("failed to marshal {}, error({err})", ticker.ticker);
        err
    })?;
    Ok(item)
}

/// Replays every ticker into a table.
///
/// Every ticker is marshalled before the first write goes out. After that there is no
/// transaction: a failed call ends the write with the earlier tickers already in the table.
pub struct TableWriter<'a, T> {
    table: &'a T,
    name: &'a str,
    mode: TableWriteMode,
    tui: bool,
}

impl<'a, T> TableWriter<'a, T>
where
    T: TickerTable + Sync,
{
    pub fn new(table: &'a T, name: &'a str, mode: TableWriteMode) -> Self {
        Self {
            table,
            name,
            mode,
            tui: false,
        }
    }

    /// Show a progress bar while writing.
    pub fn tui(mut self, tui: bool) -> Self {
        self.tui = tui;
        self
    }

    /// Write all `tickers`, returning how many landed.
    ///
    /// In batch mode, items the table still hands back after [`MAX_ATTEMPTS`] calls do not stop
    /// the remaining batches; they are reported as [`Error::Unprocessed`] once all are done.
    pub async fn write(&self, tickers: &Tickers) -> Result<usize> {
        let time = Instant::now();
        let items = tickers.values().map(to_item).collect::<Result<Vec<_>>>()?;

        let pb = tui::progress_bar(items.len(), "writing tickers ...", self.tui);
        let mut written = 0;
        let mut unprocessed = 0;

        match self.mode {
            TableWriteMode::Single => {
                for item in items {
                    self.table
                        .put_item(self.name, item)
                        .await
                        .map_err(|source| self.fail(source))?;
                    trace!("ticker inserted");
                    written += 1;
                    pb.inc(1);
                }
            }
            TableWriteMode::Batch => {
                for chunk in items.chunks(BATCH_SIZE) {
                    let left = self.write_chunk(chunk.to_vec()).await?;
                    written += chunk.len() - left;
                    unprocessed += left;
                    pb.inc(chunk.len() as u64);
                }
            }
        }

        pb.finish_and_clear();
        if self.tui {
            println!("writing tickers ... done\n");
        }
        debug!(
            "{written} tickers written to {}, time elapsed: {:?}",
            self.name,
            time.elapsed()
        );

        if unprocessed > 0 {
            warn!("{unprocessed} tickers left unprocessed by {}", self.name);
            return Err(Error::Unprocessed {
                table: self.name.to_string(),
                count: unprocessed,
            });
        }

        Ok(written)
    }

    // Returns how many items were still unprocessed after the last attempt.
    async fn write_chunk(&self, chunk: Vec<Item>) -> Result<usize> {
        let mut pending = chunk;
        let mut attempt = 1;
        loop {
            pending = self
                .table
                .put_batch(self.name, pending)
                .await
                .map_err(|source| self.fail(source))?;

            if pending.is_empty() {
                return Ok(0);
            }
            if attempt == MAX_ATTEMPTS {
                return Ok(pending.len());
            }

            let backoff = BASE_BACKOFF * 2u32.pow(attempt - 1);
            debug!(
                "{} tickers unprocessed, retrying in {backoff:?} (attempt {attempt}/{MAX_ATTEMPTS})",
                pending.len()
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    fn fail(&self, source: BoxError) -> Error {
        error!("failed to write tickers to {}, error({source})", self.name);
        Error::Table {
            table: self.name.to_string(),
            source,
        }
    }
}
