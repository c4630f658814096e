use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use tracing::{debug, error};

// fetch
// ----------------------------------------------------------------------------

/// GET the SEC Company Tickers from `url` and decode the whole body.
pub async fn fetch(client: &HttpClient, url: &str) -> Result<Tickers> {
    debug!("fetching SEC Company Tickers from {url}");
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch data, error({err})");
            Error::Fetch {
                url: url.to_string(),
                source: err,
            }
        })?
        .bytes()
        .await
        .map_err(|err| {
            error!("failed to read response body, error({err})");
            Error::Fetch {
                url: url.to_string(),
                source: err,
            }
        })?;
    debug!("{} bytes received", body.len());

    decode(&body)
}

/// Decode a response body; one bad entry fails the whole batch.
pub fn decode(body: &[u8]) -> Result<Tickers> {
    serde_json::from_slice(body).map_err(|err| {
        error!("failed to parse JSON, error({err})");
        Error::Decode(err)
    })
}

// de
// ----------------------------------------------------------------------------

/// One company, exactly as the SEC publishes it. The field names double as the attribute names
/// in the local dump and in the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Ticker {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// The SEC's opaque keys (`"0"`, `"1"`, ...) mapped to their ticker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tickers(BTreeMap<String, Ticker>);

impl Tickers {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Ticker> {
        self.0.get(key)
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Ticker> {
        self.0.values()
    }
}

struct TickersVisitor;

impl<'de> Visitor<'de> for TickersVisitor {
    type Value = Tickers;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("map of tickers")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // each entry is in the form of:
        // `"0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
        //  "1": { ... },
        //  ...`
        let mut tickers = BTreeMap::new();
        while let Some((key, ticker)) = map.next_entry::<String, Ticker>()? {
            match tickers.entry(key) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(ticker);
                }
                btree_map::Entry::Occupied(entry) => {
                    return Err(de::Error::custom(format_args!(
                        "duplicate ticker key `{}`",
                        entry.key()
                    )));
                }
            }
        }
        Ok(Tickers(tickers))
    }
}

impl<'de> Deserialize<'de> for Tickers {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TickersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_entry() {
        let body = br#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"},
            "2": {"cik_str": 1045810, "ticker": "NVDA", "title": "NVIDIA CORP"}
        }"#;
        let tickers = decode(body).unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(
            tickers.get("1"),
            Some(&Ticker {
                cik_str: 789019,
                ticker: "MSFT".to_string(),
                title: "MICROSOFT CORP".to_string(),
            })
        );
    }

    #[test]
    fn empty_object_is_empty() {
        assert!(decode(b"{}").unwrap().is_empty());
    }

    #[test]
    fn one_bad_entry_fails_the_batch() {
        let body = br#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": "not a number", "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        assert!(matches!(decode(body), Err(Error::Decode(_))));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let body = br#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "0": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        let err = decode(body).unwrap_err();
        assert!(err.to_string().contains("duplicate ticker key `0`"));
    }

    #[test]
    fn a_list_is_not_a_map() {
        let body = br#"[{"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}]"#;
        assert!(matches!(decode(body), Err(Error::Decode(_))));
    }
}
