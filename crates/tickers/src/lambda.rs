use crate::spider::Spider;
use aws_lambda_events::event::eventbridge::EventBridgeEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;

/// JSON lines; CloudWatch stamps the time. Level from `RUST_LOG`, INFO by default.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .without_time()
        .init();
}

/// Hand over to the Lambda runtime; every scheduled event runs the deployed pipeline once.
pub(crate) async fn serve(spider: Spider) -> Result<(), Error> {
    let spider = Arc::new(spider);
    let func = service_fn(move |event: LambdaEvent<EventBridgeEvent>| {
        let spider = spider.clone();
        async move { handler(spider, event).await }
    });

    run(func).await
}

#[tracing::instrument(skip(spider, event))]
async fn handler(spider: Arc<Spider>, event: LambdaEvent<EventBridgeEvent>) -> Result<(), Error> {
    info!(
        "scheduled run triggered, event({:?}), request({})",
        event.payload.id, event.context.request_id
    );

    let outcome = spider.run(false).await?;
    info!(
        "{} tickers fetched, {:?} uploaded, {} written",
        outcome.tickers, outcome.object_key, outcome.written
    );

    Ok(())
}
