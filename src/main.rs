use clap::Parser;
use ragdesk::{cli, config, logging};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::init_config()?;
    logging::init_tracing(config.log_file.as_deref());
    tracing::debug!(
        api_base_url = %config.api_base_url,
        default_case_id = ?config.default_case_id,
        "Loaded configuration"
    );
    cli::run(cli, config).await
}
