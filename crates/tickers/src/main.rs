#![recursion_limit = "256"]

mod cli;
mod lambda;
mod spider;

// remote imports
use clap::Parser;
use cli::{is_lambda, Cli, Commands, TraceLevel};
use spider::Spider;
use tickers_spider::{pipeline, sec, Config, Mode};
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// set the trace level for a terminal run
fn preprocess(trace_level: Level) {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

fn banner() {
    println!(
        "{bar}\n{name:^40}\n{bar}",
        bar = "=".repeat(40),
        name = "SEC Tickers"
    );
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let on_lambda = is_lambda(cli.command, Mode::from_env());

    // set the trace level
    match cli.trace {
        Some(trace_level) => preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        }),
        None if on_lambda => lambda::init_tracing(),
        None => {}
    }
    trace!("command line input recorded: {cli:?}");

    // after the subscriber, so a bad configuration is logged
    let config = Config::from_env()?;

    // if no trace level provided, print to the terminal instead
    let tui = cli.trace.is_none() && !on_lambda;

    if on_lambda {
        let spider = Spider::connect(config).await?;
        return lambda::serve(spider).await.map_err(|err| anyhow::anyhow!(err));
    }

    match cli.command.unwrap_or(Commands::Fetch) {
        // `tickers fetch`: download the tickers to the scratch path
        Commands::Fetch => {
            if tui {
                banner();
            }
            let http = sec::build_client(&config.user_agent)?;
            let outcome = pipeline::run_local(&config, &http).await?;
            if tui {
                println!(
                    "{} tickers written to {}",
                    outcome.tickers,
                    config.scratch_path().display()
                );
            }
        }

        // `tickers run`: the deployed pipeline, once
        Commands::Run => {
            if tui {
                banner();
            }
            let outcome = Spider::connect(config).await?.run(tui).await?;
            if tui {
                println!(
                    "{} tickers uploaded to {} and written to the table",
                    outcome.written,
                    outcome.object_key.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
