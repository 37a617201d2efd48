use clap::Subcommand;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Transaction history commands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Payments and top-ups of the logged-in customer
    Customer,
    /// Money received by the logged-in vendor
    Vendor,
}

pub async fn execute(
    client: &BitposClient,
    cmd: TransactionCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let transactions = match cmd {
        TransactionCommands::Customer => client.customer_transactions().await?,
        TransactionCommands::Vendor => client.vendor_transactions().await?,
    };
    output::print_transactions(&transactions, config);
    Ok(())
}
