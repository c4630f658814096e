use aws_config::{BehaviorVersion, Region};
use tickers_spider::http::HttpClient;
use tickers_spider::pipeline::{self, Outcome};
use tickers_spider::sec;
use tickers_spider::store::S3;
use tickers_spider::table::DynamoDb;
use tickers_spider::Config;
use tracing::{debug, trace};

/// Everything a deployed run needs, built once per process.
pub(crate) struct Spider {
    config: Config,
    http: HttpClient,
    s3: S3,
    table: DynamoDb,
}

impl Spider {
    pub(crate) async fn connect(config: Config) -> anyhow::Result<Self> {
        let http = sec::build_client(&config.user_agent)?;

        trace!("loading AWS config for {}", config.region);
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let s3 = S3::new(aws_sdk_s3::Client::new(&sdk_config));
        let table = DynamoDb::new(aws_sdk_dynamodb::Client::new(&sdk_config));
        debug!("AWS clients initialised");

        Ok(Self {
            config,
            http,
            s3,
            table,
        })
    }

    /// Run the deployed pipeline once.
    pub(crate) async fn run(&self, tui: bool) -> tickers_spider::Result<Outcome> {
        pipeline::run_deployed(&self.config, &self.http, &self.s3, &self.table, tui).await
    }
}
