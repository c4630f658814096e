use super::{Item, TickerTable};
use crate::error::BoxError;
use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};

#[derive(Clone, Debug)]
pub struct DynamoDb {
    inner: aws_sdk_dynamodb::Client,
}

impl DynamoDb {
    pub fn new(inner: aws_sdk_dynamodb::Client) -> Self {
        Self { inner }
    }
}

impl TickerTable for DynamoDb {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), BoxError> {
        self.inner
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    async fn put_batch(&self, table: &str, items: Vec<Item>) -> Result<Vec<Item>, BoxError> {
        let requests = items
            .into_iter()
            .map(|item| {
                PutRequest::builder()
                    .set_item(Some(item))
                    .build()
                    .map(|put| WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .inner
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await?;

        // hand back whatever the table throttled, for the caller to resubmit
        let unprocessed = output
            .unprocessed_items
            .and_then(|mut tables| tables.remove(table))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|request| request.put_request)
            .map(|put| put.item)
            .collect();

        Ok(unprocessed)
    }
}
