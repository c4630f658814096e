use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, trace};

/// Serialize `value` as JSON indented by a single space and write it to `path`, truncating any
/// existing file.
///
/// Missing parent directories are created, as necessary.
pub async fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let fail = |source: std::io::Error| {
        error!("failed to write {}, error({source})", path.display());
        Error::LocalWrite {
            path: path.to_path_buf(),
            source,
        }
    };

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| fail(err.into()))?;

    // ensure the directory exists
    if let Some(dir) = path.parent() {
        trace!("checking directory path: {:?}", dir);
        tokio::fs::create_dir_all(dir).await.map_err(fail)?;
    }

    tokio::fs::write(path, &buffer).await.map_err(fail)?;
    debug!("{} bytes written to {}", buffer.len(), path.display());

    Ok(())
}

/// Reads a `.json` file from `path`.
///
/// ```no_run
/// # async fn run() -> std::io::Result<()> {
/// use tickers_spider::sec::tickers::Tickers;
///
/// let tickers: Tickers = tickers_spider::fs::read_json("/tmp/tickers.json".as_ref()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> std::io::Result<T> {
    let file = tokio::fs::read(path).await?;
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}

/// Read a whole file into memory; the buffer is sized from the file's metadata.
pub async fn read_sized(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let size = file.metadata().await?.len();
    let mut buffer = vec![0; size as usize];
    file.read_exact(&mut buffer).await?;
    trace!("read {size} bytes from {}", path.display());
    Ok(buffer)
}
