use anyhow::Result;
use clap::Parser;
use commands::handle_commands;
use tbatch::config::load_config;
mod cli;
mod commands;
mod history;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::TBatch::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from(args.verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(args.config.as_ref())?;
    handle_commands(&config, args.commands).await
}
