//! The two ways a run can go.
//!
//! 1. local: fetch the SEC Company Tickers and dump them to the scratch path
//! 2. deployed: the same, then upload the dump to S3 and replay every ticker into DynamoDB
//!
//! Whether a failed stage ends the run is decided by [`Error::disposition`], in `settle` only.

use crate::config::Config;
use crate::error::{Disposition, Error, Result};
use crate::fs;
use crate::http::HttpClient;
use crate::sec::tickers::{self, Tickers};
use crate::store::{self, ObjectStore};
use crate::table::{TableWriter, TickerTable};
use std::fmt;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    LocalWrite,
    Upload,
    TableWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::LocalWrite => "local write",
            Stage::Upload => "upload",
            Stage::TableWrite => "table write",
        };
        f.write_str(name)
    }
}

/// What a finished run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Tickers fetched (and dumped).
    pub tickers: usize,
    /// Key of the uploaded object, when the run uploaded one.
    pub object_key: Option<String>,
    /// Tickers written to the table.
    pub written: usize,
}

/// Fetch the tickers and dump them to the scratch path.
pub async fn run_local(config: &Config, http: &HttpClient) -> Result<Outcome> {
    let time = Instant::now();
    let mut deferred = None;

    info!("fetching stocks list ...");
    let tickers = settle(
        Stage::Fetch,
        tickers::fetch(http, &config.source_url).await,
        &mut deferred,
    )?;

    info!("writing json file ...");
    settle(
        Stage::LocalWrite,
        fs::write_json_pretty(&config.scratch_path(), &tickers).await,
        &mut deferred,
    )?;

    info!(
        "{} tickers dumped to {}, time elapsed: {:?}",
        tickers.len(),
        config.scratch_path().display(),
        time.elapsed()
    );
    finish(
        Outcome {
            tickers: tickers.len(),
            ..Default::default()
        },
        deferred,
    )
}

/// Fetch, dump, upload the dump and write every ticker to the table.
pub async fn run_deployed<S, T>(
    config: &Config,
    http: &HttpClient,
    store: &S,
    table: &T,
    tui: bool,
) -> Result<Outcome>
where
    S: ObjectStore + Sync,
    T: TickerTable + Sync,
{
    let time = Instant::now();
    let bucket = config.bucket()?;
    let mut deferred = None;

    info!("fetching stocks list ...");
    let tickers: Tickers = settle(
        Stage::Fetch,
        tickers::fetch(http, &config.source_url).await,
        &mut deferred,
    )?;

    info!("writing json file ...");
    settle(
        Stage::LocalWrite,
        fs::write_json_pretty(&config.scratch_path(), &tickers).await,
        &mut deferred,
    )?;

    info!("uploading to S3 ...");
    let object_key = settle(
        Stage::Upload,
        store::upload_file(store, bucket, &config.scratch_dir, &config.file_name)
            .await
            .map(Some),
        &mut deferred,
    )?;

    info!("writing to DynamoDB ...");
    let written = settle(
        Stage::TableWrite,
        TableWriter::new(table, &config.table_name, config.table_write_mode)
            .tui(tui)
            .write(&tickers)
            .await,
        &mut deferred,
    )?;

    info!(
        "spider finished collecting {} tickers, time elapsed: {:?}",
        tickers.len(),
        time.elapsed()
    );
    finish(
        Outcome {
            tickers: tickers.len(),
            object_key,
            written,
        },
        deferred,
    )
}

/// Let a stage's failure end the run, or hold it back until the run is over.
fn settle<T: Default>(stage: Stage, result: Result<T>, deferred: &mut Option<Error>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match err.disposition() {
            Disposition::Abort => {
                error!("{stage} failed, aborting run, error({err})");
                Err(err)
            }
            Disposition::Continue => {
                warn!("{stage} incomplete, continuing run, error({err})");
                deferred.get_or_insert(err);
                Ok(T::default())
            }
        },
    }
}

fn finish(outcome: Outcome, deferred: Option<Error>) -> Result<Outcome> {
    match deferred {
        Some(err) => Err(err),
        None => Ok(outcome),
    }
}
