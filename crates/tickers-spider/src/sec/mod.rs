use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Every ticker, title and CIK published by the [SEC].
///
/// [SEC]: https://www.sec.gov/search-filings/edgar-application-programming-interfaces
pub mod tickers;

/// The SEC refuses requests without a `User-Agent`, so every client carries one.
pub fn build_client(user_agent: &str) -> Result<HttpClient> {
    reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .build()
        .map_err(|err| Error::Config(format!("failed to build reqwest client, error({err})")))
}
