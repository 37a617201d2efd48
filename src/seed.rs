//! Demo data
//!
//! Creates a vendor with a small catalog and a customer, both with funded
//! wallets. Running it again leaves existing rows alone.

use anyhow::Result;
use tracing::{info, instrument};

use crate::auth::hash_password;
use crate::db::DbPool;
use crate::models::{Role, User};
use crate::money::Btc;
use crate::repo;

pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_VENDOR_EMAIL: &str = "vendor@example.com";
pub const DEMO_CUSTOMER_EMAIL: &str = "customer@example.com";

/// (name, description, price in BTC)
const DEMO_PRODUCTS: [(&str, &str, &str); 3] = [
    ("Blueberries", "Fresh organic blueberries", "0.00015"),
    ("Coffee", "Premium roast coffee", "0.00008"),
    ("Sandwich", "Delicious sandwich", "0.00012"),
];

/// The demo accounts after seeding
#[derive(Debug, Clone)]
pub struct SeededUsers {
    pub vendor: User,
    pub customer: User,
}

/// Inserts the demo accounts and products that are missing
#[instrument(skip(pool))]
pub fn seed_demo_data(pool: &DbPool) -> Result<SeededUsers> {
    let vendor = ensure_user(pool, DEMO_VENDOR_EMAIL, "Demo Vendor", Role::Vendor, "0.5")?;

    let existing: Vec<String> = repo::list_products_by_vendor(pool, &vendor.get_id())?
        .iter()
        .map(|product| product.get_name())
        .collect();
    for (name, description, price) in DEMO_PRODUCTS {
        if existing.iter().any(|existing| existing == name) {
            continue;
        }
        repo::create_product(
            pool,
            &vendor.get_id(),
            name.to_string(),
            Some(description.to_string()),
            price.parse::<Btc>()?,
            None,
        )?;
    }

    let customer = ensure_user(pool, DEMO_CUSTOMER_EMAIL, "Demo Customer", Role::Customer, "0.1")?;

    info!("Seeded vendor {} and customer {}", DEMO_VENDOR_EMAIL, DEMO_CUSTOMER_EMAIL);
    Ok(SeededUsers { vendor, customer })
}

fn ensure_user(pool: &DbPool, email: &str, name: &str, role: Role, balance: &str) -> Result<User> {
    if let Some(user) = repo::find_user_by_email(pool, email)? {
        return Ok(user);
    }

    let user = repo::create_user(
        pool,
        email.to_string(),
        hash_password(DEMO_PASSWORD)?,
        name.to_string(),
        role,
    )?;
    repo::set_balance(pool, &user.get_id(), balance.parse::<Btc>()?)?;
    Ok(user)
}
