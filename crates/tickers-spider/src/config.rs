use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::error;

/// The SEC's list of every company ticker, keyed by array index.
pub const SOURCE_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// DynamoDB table receiving one item per ticker.
pub const TABLE_NAME: &str = "stocks";

/// Scratch directory; only lives as long as one Lambda invocation.
pub const SCRATCH_DIR: &str = "/tmp";

/// Name of the local dump, and the key it is uploaded under.
pub const FILE_NAME: &str = "tickers.json";

pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_USER_AGENT: &str = concat!("tickers-spider/", env!("CARGO_PKG_VERSION"));

/// Where the job is running, read from `ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `ENV=local`: fetch and write the local dump only.
    Local,
    /// Anything else: fetch, dump, upload and write the table.
    Deployed,
}

impl Mode {
    /// Read `ENV` alone, before the rest of the configuration.
    pub fn from_env() -> Self {
        Self::from_flag(dotenv::var("ENV").ok().as_deref())
    }

    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("local") => Mode::Local,
            _ => Mode::Deployed,
        }
    }
}

/// How tickers are written to the table, read from `TABLE_WRITE_MODE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableWriteMode {
    /// `BatchWriteItem`, 25 put requests per call.
    #[default]
    Batch,
    /// One `PutItem` call per ticker.
    Single,
}

impl FromStr for TableWriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "batch" => Ok(TableWriteMode::Batch),
            "single" => Ok(TableWriteMode::Single),
            other => Err(Error::Config(format!(
                "TABLE_WRITE_MODE must be `batch` or `single`, found `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,

    /// Target bucket for the dump; only needed when deployed.
    pub bucket: Option<String>,

    pub region: String,
    pub user_agent: String,
    pub table_write_mode: TableWriteMode,

    pub source_url: String,
    pub table_name: String,
    pub scratch_dir: PathBuf,
    pub file_name: String,
}

impl Config {
    /// Read the configuration from the process environment (and `.env`, if it has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build the configuration from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = Mode::from_flag(lookup("ENV").as_deref());
        let bucket = lookup("S3_FILES_BUCKET").filter(|bucket| !bucket.is_empty());
        let table_write_mode = match lookup("TABLE_WRITE_MODE") {
            Some(value) => value.parse().map_err(|err| {
                error!("invalid configuration, error({err})");
                err
            })?,
            None => TableWriteMode::default(),
        };

        Ok(Config {
            mode,
            bucket,
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            table_write_mode,
            source_url: SOURCE_URL.to_string(),
            table_name: TABLE_NAME.to_string(),
            scratch_dir: PathBuf::from(SCRATCH_DIR),
            file_name: FILE_NAME.to_string(),
        })
    }

    pub fn bucket(&self) -> Result<&str> {
        self.bucket.as_deref().ok_or_else(|| {
            let err = Error::Config("S3_FILES_BUCKET must be set".to_string());
            error!("invalid configuration, error({err})");
            err
        })
    }

    /// Full path of the local dump.
    pub fn scratch_path(&self) -> PathBuf {
        self.scratch_dir.join(&self.file_name)
    }
}
