use bitpos::dto::{
    AddFundsResponse, AdminUserView, AuthResponse, ChargeCardResponse, DashboardStats, OrderView,
    PayResponse, ProductView, QrOrderResponse, TransactionView, UserView,
};
use bitpos::money::BalanceView;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or tokens)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn balance_line(balance: &BalanceView) -> String {
    format!("{} BTC ({} sBTC)", balance.btc_formatted, balance.sbtc_formatted)
}

/// Prints the result of signup or login
///
/// In quiet mode only the token is printed, so it can be captured with
/// `export BITPOS_TOKEN=$(bitpos-cli -q auth login ...)`.
pub fn print_auth(auth: &AuthResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", auth.token);
                return;
            }
            print_user(&auth.user, config);
            println!("Token:   {}", auth.token);
        }
        OutputFormat::Json => print_json(auth),
    }
}

/// Prints a single user profile
pub fn print_user(user: &UserView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.id);
                return;
            }
            println!("ID:      {}", user.id);
            println!("Email:   {}", user.email);
            println!("Name:    {}", user.name);
            println!("Role:    {}", user.role);
            if let Some(created_at) = &user.created_at {
                println!("Created: {}", created_at);
            }
        }
        OutputFormat::Json => print_json(user),
    }
}

/// Prints a vendor's product catalog
pub fn print_products(products: &[ProductView], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if products.is_empty() {
                if !config.quiet {
                    println!("No products found.");
                }
                return;
            }
            if config.quiet {
                for product in products {
                    println!("{}", product.id);
                }
                return;
            }
            let max_id = products.iter().map(|p| p.id.len()).max().unwrap_or(2);
            let max_name = products.iter().map(|p| p.name.len()).max().unwrap_or(4).max(4);
            println!(
                "{:<id_w$}  {:<name_w$}  {:>12}  {:>14}",
                "ID",
                "NAME",
                "PRICE BTC",
                "PRICE sBTC",
                id_w = max_id,
                name_w = max_name
            );
            for product in products {
                println!(
                    "{:<id_w$}  {:<name_w$}  {:>12}  {:>14}",
                    product.id,
                    product.name,
                    product.price_btc.format(),
                    product.price_sbtc.format(),
                    id_w = max_id,
                    name_w = max_name
                );
            }
        }
        OutputFormat::Json => print_json(products),
    }
}

/// Prints a single product
pub fn print_product(product: &ProductView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", product.id);
                return;
            }
            println!("ID:          {}", product.id);
            println!("Name:        {}", product.name);
            if let Some(description) = &product.description {
                println!("Description: {}", description);
            }
            println!(
                "Price:       {} BTC ({} sBTC)",
                product.price_btc.format(),
                product.price_sbtc.format()
            );
            if let Some(url) = &product.image_url {
                println!("Image:       {}", url);
            }
            println!("Updated:     {}", product.updated_at);
        }
        OutputFormat::Json => print_json(product),
    }
}

fn print_order_lines(order: &OrderView) {
    println!("Order:   {} ({})", order.id, order.status);
    for item in &order.items {
        let name = item
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(item.product_id.as_str());
        println!("  {} x {} @ {} BTC", item.quantity, name, item.price_btc.format());
    }
    println!(
        "Total:   {} BTC ({} sBTC)",
        order.total_btc.format(),
        order.total_sbtc.format()
    );
}

/// Prints a newly created QR order along with the QR payload
pub fn print_qr_order(response: &QrOrderResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", response.qr_code_data);
                return;
            }
            print_order_lines(&response.order);
            println!("QR data: {}", response.qr_code_data);
        }
        OutputFormat::Json => print_json(response),
    }
}

/// Prints a wallet balance
pub fn print_balance(balance: &BalanceView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", balance.btc_formatted);
                return;
            }
            println!("Balance: {}", balance_line(balance));
        }
        OutputFormat::Json => print_json(balance),
    }
}

/// Prints the outcome of a customer top-up
pub fn print_add_funds(response: &AddFundsResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", response.balance.btc_formatted);
                return;
            }
            println!(
                "Added:   {} BTC ({} sBTC)",
                response.added.btc.format(),
                response.added.sbtc.format()
            );
            println!("Balance: {}", balance_line(&response.balance));
        }
        OutputFormat::Json => print_json(response),
    }
}

/// Prints the outcome of a vendor card charge
pub fn print_charge(response: &ChargeCardResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", response.balance.btc_formatted);
                return;
            }
            println!("Charged. Balance: {}", balance_line(&response.balance));
        }
        OutputFormat::Json => print_json(response),
    }
}

/// Prints a completed payment
pub fn print_payment(response: &PayResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", response.transaction.id);
                return;
            }
            print_order_lines(&response.order);
            println!("Paid:    transaction {}", response.transaction.id);
            println!("Balance: {}", balance_line(&response.new_balance));
        }
        OutputFormat::Json => print_json(response),
    }
}

/// Prints a transaction history, newest first
pub fn print_transactions(transactions: &[TransactionView], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if transactions.is_empty() {
                if !config.quiet {
                    println!("No transactions found.");
                }
                return;
            }
            if config.quiet {
                for tx in transactions {
                    println!("{}", tx.id);
                }
                return;
            }
            let max_id = transactions.iter().map(|t| t.id.len()).max().unwrap_or(2);
            println!(
                "{:<id_w$}  {:<9}  {:>12}  {:<25}  FROM",
                "ID",
                "TYPE",
                "AMOUNT BTC",
                "DATE",
                id_w = max_id
            );
            for tx in transactions {
                let from = tx
                    .sender
                    .as_ref()
                    .map(|s| s.name.as_str())
                    .unwrap_or(tx.sender_id.as_str());
                println!(
                    "{:<id_w$}  {:<9}  {:>12}  {:<25}  {}",
                    tx.id,
                    tx.kind.to_string(),
                    tx.amount_btc.format(),
                    tx.created_at.to_rfc3339(),
                    from,
                    id_w = max_id
                );
            }
        }
        OutputFormat::Json => print_json(transactions),
    }
}

/// Prints the vendor dashboard figures
pub fn print_stats(stats: &DashboardStats, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", stats.total_revenue.btc_formatted);
                return;
            }
            match &stats.wallet {
                Some(wallet) => println!("Wallet:       {}", balance_line(wallet)),
                None => println!("Wallet:       none"),
            }
            println!("Revenue:      {}", balance_line(&stats.total_revenue));
            println!("Transactions: {}", stats.total_transactions);
            println!("Products:     {}", stats.total_products);
        }
        OutputFormat::Json => print_json(stats),
    }
}

/// Prints every account with its wallet balance
pub fn print_users(users: &[AdminUserView], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if users.is_empty() {
                if !config.quiet {
                    println!("No users found.");
                }
                return;
            }
            if config.quiet {
                for user in users {
                    println!("{}", user.id);
                }
                return;
            }
            let max_id = users.iter().map(|u| u.id.len()).max().unwrap_or(2);
            let max_email = users.iter().map(|u| u.email.len()).max().unwrap_or(5).max(5);
            println!(
                "{:<id_w$}  {:<email_w$}  {:<8}  BALANCE BTC",
                "ID",
                "EMAIL",
                "ROLE",
                id_w = max_id,
                email_w = max_email
            );
            for user in users {
                let balance = user
                    .wallet
                    .as_ref()
                    .map(|w| w.btc_balance.format())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<id_w$}  {:<email_w$}  {:<8}  {}",
                    user.id,
                    user.email,
                    user.role.to_string(),
                    balance,
                    id_w = max_id,
                    email_w = max_email
                );
            }
        }
        OutputFormat::Json => print_json(users),
    }
}

/// Prints a confirmation for operations that return nothing else
pub fn print_done(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({ "success": true })),
    }
}
