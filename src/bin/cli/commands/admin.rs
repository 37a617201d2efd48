use clap::Subcommand;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Administration commands
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List every account with its wallet balance
    Users,
}

pub async fn execute(
    client: &BitposClient,
    cmd: AdminCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AdminCommands::Users => {
            let users = client.list_users().await?;
            output::print_users(&users, config);
        }
    }
    Ok(())
}
