use clap::{Parser, Subcommand, ValueEnum};
use tickers_spider::Mode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// What to run.
    ///
    /// If no command is provided, `ENV` decides: `local` fetches, anything else starts the
    /// Lambda runtime.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Fetch the SEC Company Tickers and dump them to the scratch path.
    Fetch,

    /// Fetch, dump, upload to S3 and write to DynamoDB, once, without the Lambda runtime.
    Run,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

/// No command and not local: hand over to the Lambda runtime.
pub fn is_lambda(command: Option<Commands>, mode: Mode) -> bool {
    command.is_none() && mode == Mode::Deployed
}
