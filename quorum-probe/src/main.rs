use quorum_probe::{run_probe, settings::Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let value = run_probe(&Settings::read()?).await?;
    println!("{value}");

    Ok(())
}
