use anyhow::Result;
use churn_predictor::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("churn_predictor=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
