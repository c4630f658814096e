#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tickers_spider::error::BoxError;
use tickers_spider::store::{ObjectStore, PutObject};
use tickers_spider::table::{Item, TickerTable};
use tickers_spider::Config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const AAPL: &str = r#"{"0":{"cik_str":320193,"ticker":"AAPL","title":"Apple Inc."}}"#;

/// A response body of `n` tickers, keyed "0".."n".
pub fn tickers_json(n: usize) -> String {
    let entries: Vec<String> = (0..n)
        .map(|i| {
            format!(r#""{i}":{{"cik_str":{},"ticker":"TCK{i}","title":"Company {i} Inc."}}"#, 1000 + i)
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

/// A deployed config writing to `scratch`, fetching from `url`.
pub fn config(scratch: &Path, url: &str) -> Config {
    let mut config = Config::from_lookup(|key| match key {
        "ENV" => Some("prod".to_string()),
        "S3_FILES_BUCKET" => Some("test-files".to_string()),
        _ => None,
    })
    .unwrap();
    config.scratch_dir = scratch.to_path_buf();
    config.source_url = url.to_string();
    config
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .user_agent("tickers-spider-tests")
        .build()
        .unwrap()
}

/// Answer exactly one HTTP request with `status` and `body`; returns the URL to GET.
pub async fn serve_once(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // read until the end of the request headers
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/files/company_tickers.json")
}

/// Keeps every object it is handed.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<PutObject>>,
    pub fail: bool,
}

impl ObjectStore for MemoryStore {
    async fn put_object(&self, object: PutObject) -> Result<(), BoxError> {
        if self.fail {
            return Err("access denied".into());
        }
        self.objects.lock().unwrap().push(object);
        Ok(())
    }
}

/// Keeps every item it is handed, and can be told to throttle or fail.
#[derive(Default)]
pub struct MemoryTable {
    pub items: Mutex<Vec<(String, Item)>>,
    pub put_item_calls: Mutex<usize>,
    pub batch_sizes: Mutex<Vec<usize>>,
    /// Each batch call hands back this many items, while the budget lasts.
    pub throttle: usize,
    pub throttle_budget: Mutex<usize>,
    /// Fail the call after this many calls have succeeded.
    pub fail_after: Option<usize>,
}

impl MemoryTable {
    pub fn throttled(throttle: usize, budget: usize) -> Self {
        Self {
            throttle,
            throttle_budget: Mutex::new(budget),
            ..Default::default()
        }
    }

    pub fn failing_after(calls: usize) -> Self {
        Self {
            fail_after: Some(calls),
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Vec<Item> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        *self.put_item_calls.lock().unwrap() + self.batch_sizes.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<(), BoxError> {
        match self.fail_after {
            Some(limit) if self.calls() >= limit => Err("provisioned throughput exceeded".into()),
            _ => Ok(()),
        }
    }
}

impl TickerTable for MemoryTable {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), BoxError> {
        self.check_failure()?;
        *self.put_item_calls.lock().unwrap() += 1;
        self.items.lock().unwrap().push((table.to_string(), item));
        Ok(())
    }

    async fn put_batch(&self, table: &str, mut items: Vec<Item>) -> Result<Vec<Item>, BoxError> {
        self.check_failure()?;
        self.batch_sizes.lock().unwrap().push(items.len());

        let mut budget = self.throttle_budget.lock().unwrap();
        let held = self.throttle.min(*budget).min(items.len());
        *budget -= held;
        let unprocessed = items.split_off(items.len() - held);

        let mut stored = self.items.lock().unwrap();
        stored.extend(items.into_iter().map(|item| (table.to_string(), item)));
        Ok(unprocessed)
    }
}

pub fn item_strings(item: &Item) -> HashMap<&str, String> {
    item.iter()
        .map(|(key, value)| {
            let value = match value {
                aws_sdk_dynamodb::types::AttributeValue::N(n) => n.clone(),
                aws_sdk_dynamodb::types::AttributeValue::S(s) => s.clone(),
                other => format!("{other:?}"),
            };
            (key.as_str(), value)
        })
        .collect()
}
