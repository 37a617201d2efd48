/// BitPOS: a Bitcoin point-of-sale backend
///
/// Vendors keep a product catalog and ring up carts as pending orders
/// encoded in QR codes. Customers hold a BTC wallet, top it up with a demo
/// card, and pay vendors either by scanning a QR order or by submitting a
/// cart directly. Balances are kept in BTC; sBTC (BTC × 10,000,000) is
/// derived for display.
///
/// ### Modules
///
/// - `auth`: password hashing, bearer tokens and the caller extractors
/// - `config`: layered server configuration
/// - `db`: database connection management
/// - `dto`: request bodies, validation and response views
/// - `handlers`: HTTP handlers
/// - `models`: data structures stored in the database
/// - `money`: BTC and sBTC amounts
/// - `payments`: the demo card processor
/// - `repo`: repository layer, including the balance ledger
/// - `seed`: demo accounts and products
///
/// ### Web API
///
/// - `POST /api/auth/signup`, `POST /api/auth/login`, `GET|PATCH /api/auth/me`
/// - `GET /api/customer/balance`, `POST /api/customer/add-funds-card`,
///   `POST /api/customer/pay`, `GET /api/customer/transactions`
/// - `POST /api/vendor/add-product`, `GET /api/vendor/products`,
///   `PUT|DELETE /api/vendor/products/{id}`, `POST /api/vendor/create-qr-order`,
///   `GET /api/vendor/transactions`, `GET /api/vendor/dashboard/stats`,
///   `POST /api/vendor/charge-card`
/// - `GET /api/admin/list-users`
/// - `GET /health`

/// Authentication module
pub mod auth;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects module
pub mod dto;

/// Error types module
pub mod errors;

/// HTTP handlers module
pub mod handlers;

/// Logging setup module
pub mod logging;

/// Data models module
pub mod models;

/// Money types module
pub mod money;

/// Demo card processor module
pub mod payments;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Demo data module
pub mod seed;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::TokenKeys;
use crate::handlers::*;

/// Shared state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub keys: TokenKeys,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
/// * `keys` - The keys used to issue and verify bearer tokens
///
/// ### Returns
///
/// An Axum Router configured with all routes, permissive CORS, and the
/// application state
pub fn create_app(pool: Arc<db::DbPool>, keys: TokenKeys) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/me", get(get_profile_handler).patch(update_profile_handler));

    let customer_routes = Router::new()
        .route("/balance", get(get_balance_handler))
        .route("/add-funds-card", post(add_funds_card_handler))
        .route("/pay", post(pay_handler))
        .route("/transactions", get(list_customer_transactions_handler));

    let vendor_routes = Router::new()
        .route("/add-product", post(add_product_handler))
        .route("/products", get(list_products_handler))
        .route("/products/{id}", put(update_product_handler).delete(delete_product_handler))
        .route("/create-qr-order", post(create_qr_order_handler))
        .route("/transactions", get(list_vendor_transactions_handler))
        .route("/dashboard/stats", get(dashboard_stats_handler))
        .route("/charge-card", post(charge_card_handler));

    let admin_routes = Router::new().route("/list-users", get(list_users_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/customer", customer_routes)
        .nest("/api/vendor", vendor_routes)
        .nest("/api/admin", admin_routes)
        .layer(CorsLayer::permissive())
        .with_state(AppState { pool, keys })
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if a migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    Ok(())
}
