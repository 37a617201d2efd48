use crate::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::dto::CartItemDto;
use crate::models::{Product, Role, User};
use crate::money::Btc;

/// Sets up a test database with migrations applied
///
/// Each call gets its own shared-cache in-memory database, so every
/// connection in the returned pool sees the same schema while tests stay
/// isolated from one another.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    Arc::new(pool)
}

/// Token keys with a fixed secret for tests
pub fn test_keys() -> auth::TokenKeys {
    auth::TokenKeys::new("test-secret", 168)
}

pub fn btc(amount: &str) -> Btc {
    amount.parse().expect("valid BTC amount")
}

/// Creates a user and wallet directly through the repository
///
/// Uses a cheap placeholder hash; tests that log in should go through
/// `repo::create_user` with a real hash instead.
pub fn create_test_user(pool: &db::DbPool, role: Role, balance: &str) -> User {
    let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
    let user = repo::create_user(
        pool,
        email,
        "not-a-real-hash".to_string(),
        "Test User".to_string(),
        role,
    )
    .expect("Failed to create user");
    if balance != "0" {
        repo::set_balance(pool, &user.get_id(), btc(balance)).expect("Failed to set balance");
    }
    user
}

pub fn create_test_product(pool: &db::DbPool, vendor: &User, name: &str, price: &str) -> Product {
    repo::create_product(
        pool,
        &vendor.get_id(),
        name.to_string(),
        None,
        btc(price),
        None,
    )
    .expect("Failed to create product")
}

/// One cart line at the product's current price
pub fn cart_line(product: &Product, quantity: i32) -> CartItemDto {
    CartItemDto::new(product.get_id(), quantity, product.get_price_btc())
}

/// BTC amounts from 0 to 1000 with at most eight decimals
pub fn arb_btc() -> impl Strategy<Value = Btc> {
    (0i64..=100_000_000_000i64).prop_map(|sats| Btc::new(Decimal::new(sats, 8)))
}

/// Strictly positive BTC amounts up to 1 BTC
pub fn arb_positive_btc() -> impl Strategy<Value = Btc> {
    (1i64..=100_000_000i64).prop_map(|sats| Btc::new(Decimal::new(sats, 8)))
}

pub fn arb_quantity() -> impl Strategy<Value = i32> {
    1i32..=50
}

/// Non-empty carts of up to five valid lines
pub fn arb_cart() -> impl Strategy<Value = Vec<CartItemDto>> {
    prop::collection::vec(
        (arb_positive_btc(), arb_quantity()).prop_map(|(price, quantity)| {
            CartItemDto::new(uuid::Uuid::new_v4().to_string(), quantity, price)
        }),
        1..=5,
    )
}

use diesel::sql_types::Text;
use diesel::{QueryableByName, RunQueryDsl};

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// The migrations create every table and the pool enforces foreign keys
#[test]
fn test_setup_test_db() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let table_names: Vec<TableName> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
            .load(&mut conn)
            .expect("Failed to load table names");

    let expected_tables = vec![
        "users", "wallets", "products", "orders", "order_items", "transactions",
        "__diesel_schema_migrations",
    ];
    for table in expected_tables {
        assert!(
            table_names.iter().any(|t| t.name == table),
            "Table '{}' not found in database",
            table
        );
    }

    let orphan = diesel::sql_query(
        "INSERT INTO wallets (id, user_id, btc_balance, created_at, updated_at) \
         VALUES ('w', 'missing-user', '0', '2025-01-01 00:00:00', '2025-01-01 00:00:00')",
    )
    .execute(&mut conn);
    assert!(orphan.is_err(), "foreign keys should be enforced");
}
