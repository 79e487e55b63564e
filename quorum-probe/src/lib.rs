pub mod error;
pub mod settings;

use quorum_client::{ClientBuilder, QuorumClient};
use tracing::{info, instrument, warn};

use error::ProbeError;
use settings::Settings;

/// Connects to the configured node and asks it for its quorum state once.
#[instrument(
    name = "probe",
    skip(settings),
    fields(
        node.url = %settings.url(),
    )
)]
pub async fn run_probe(settings: &Settings) -> Result<i64, ProbeError> {
    let mut builder = ClientBuilder::new().with_url(settings.url());
    if let Some(read_timeout) = settings.read_timeout() {
        builder = builder.with_read_timeout(read_timeout);
    }

    let mut client = QuorumClient::new(builder.build().await?);

    match client.wait_quorum().await {
        Ok(value) => {
            info!("Quorum wait returned {}", value);
            Ok(value)
        }
        Err(e) => {
            warn!("Quorum wait failed: {}", e);
            Err(e.into())
        }
    }
}
