use bitpos::dto::{LoginDto, SignupDto, UpdateProfileDto};
use bitpos::models::Role;
use clap::Subcommand;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Account commands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Create an account and print its token
    Signup {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(long)]
        name: String,
        /// CUSTOMER or VENDOR
        #[clap(long)]
        role: Role,
    },
    /// Log in and print a token
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Show the logged-in account
    Me,
    /// Change the name or email of the logged-in account
    Update {
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        email: Option<String>,
    },
}

/// Executes an account command
pub async fn execute(
    client: &BitposClient,
    cmd: AuthCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AuthCommands::Signup {
            email,
            password,
            name,
            role,
        } => {
            let auth = client
                .signup(&SignupDto {
                    email,
                    password,
                    name,
                    role,
                })
                .await?;
            output::print_auth(&auth, config);
        }
        AuthCommands::Login { email, password } => {
            let auth = client.login(&LoginDto { email, password }).await?;
            output::print_auth(&auth, config);
        }
        AuthCommands::Me => {
            let user = client.me().await?;
            output::print_user(&user, config);
        }
        AuthCommands::Update { name, email } => {
            let user = client.update_profile(&UpdateProfileDto { name, email }).await?;
            output::print_user(&user, config);
        }
    }
    Ok(())
}
