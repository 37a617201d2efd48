mod client;
mod commands;
mod output;

use bitpos::config;
use clap::{Parser, Subcommand};
use client::BitposClient;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the BitPOS point-of-sale server
#[derive(Parser, Debug)]
#[clap(name = "bitpos-cli", about = "CLI for the BitPOS server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "BITPOS_URL", global = true)]
    server_url: Option<String>,

    /// Bearer token printed by `auth login`
    #[clap(long, env = "BITPOS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs, tokens or amounts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign up, log in and manage the current account
    #[command(subcommand)]
    Auth(commands::auth::AuthCommands),
    /// Manage the vendor product catalog
    #[command(subcommand)]
    Product(commands::product::ProductCommands),
    /// Create QR orders
    #[command(subcommand)]
    Order(commands::order::OrderCommands),
    /// Balances, top-ups and payments
    #[command(subcommand)]
    Wallet(commands::wallet::WalletCommands),
    /// Transaction history
    #[command(subcommand)]
    Transactions(commands::transactions::TransactionCommands),
    /// Vendor dashboard figures
    Stats,
    /// Administration
    #[command(subcommand)]
    Admin(commands::admin::AdminCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > http://localhost:3000
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    if let Some(dir) = config::get_config_dir_path() {
        if let Ok(update) = config::config_from_file(Some(dir.join("config.toml"))) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://localhost:3000".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is bitpos running?\n  {}",
            err_string
        );
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = BitposClient::new(server_url, cli.token);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(&client, cmd, &output_config).await,
        Commands::Product(cmd) => commands::product::execute(&client, cmd, &output_config).await,
        Commands::Order(cmd) => commands::order::execute(&client, cmd, &output_config).await,
        Commands::Wallet(cmd) => commands::wallet::execute(&client, cmd, &output_config).await,
        Commands::Transactions(cmd) => {
            commands::transactions::execute(&client, cmd, &output_config).await
        }
        Commands::Stats => commands::stats::execute(&client, &output_config).await,
        Commands::Admin(cmd) => commands::admin::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
