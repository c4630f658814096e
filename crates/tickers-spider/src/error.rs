use std::path::PathBuf;
use thiserror::Error;

/// Boxed error handed back by the storage clients.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a run of the spider can hit, grouped by the stage that raises it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {url}, error({source})")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse SEC Company Tickers, error({0})")]
    Decode(#[source] serde_json::Error),

    #[error("failed to write {}, error({source})", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload {key} to bucket {bucket}, error({source})")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to marshal ticker, error({0})")]
    Marshal(#[from] serde_dynamo::Error),

    #[error("failed to write to table {table}, error({source})")]
    Table {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("{count} tickers left unprocessed by table {table}")]
    Unprocessed { table: String, count: usize },
}

/// What a run does after a stage fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Stop the run immediately.
    Abort,
    /// Keep going, then fail the run once every stage is done.
    Continue,
}

impl Error {
    pub fn disposition(&self) -> Disposition {
        match self {
            // the records that did land are kept; a re-run overwrites all of them anyway
            Error::Unprocessed { .. } => Disposition::Continue,
            _ => Disposition::Abort,
        }
    }
}
