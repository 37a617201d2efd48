use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Shows the vendor dashboard figures
pub async fn execute(
    client: &BitposClient,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = client.dashboard_stats().await?;
    output::print_stats(&stats, config);
    Ok(())
}
