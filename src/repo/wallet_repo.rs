use crate::db::DbPool;
use crate::models::Wallet;
use crate::money::Btc;
use crate::schema::wallets;
use anyhow::{Result, anyhow};
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, instrument};

/// Retrieves the wallet owned by `user_id`
///
/// ### Returns
///
/// A Result containing an Option with the Wallet if found
#[instrument(skip(pool))]
pub fn get_wallet(pool: &DbPool, user_id: &str) -> Result<Option<Wallet>> {
    let mut conn = pool.get()?;
    Ok(find_wallet(&mut conn, user_id)?)
}

/// Overwrites a wallet balance
///
/// Only used for seeding demo data and in tests; regular money movement
/// goes through the ledger functions.
///
/// ### Errors
///
/// Returns an error if the user has no wallet
#[instrument(skip(pool))]
pub fn set_balance(pool: &DbPool, user_id: &str, balance: Btc) -> Result<Wallet> {
    let mut conn = pool.get()?;
    write_balance(&mut conn, user_id, balance)?;
    debug!("Set balance of {} to {}", user_id, balance);
    find_wallet(&mut conn, user_id)?.ok_or_else(|| anyhow!("Wallet not found for user {}", user_id))
}

pub(crate) fn find_wallet(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> QueryResult<Option<Wallet>> {
    wallets::table
        .filter(wallets::user_id.eq(user_id))
        .select(Wallet::as_select())
        .first(conn)
        .optional()
}

pub(crate) fn write_balance(
    conn: &mut SqliteConnection,
    user_id: &str,
    balance: Btc,
) -> QueryResult<usize> {
    diesel::update(wallets::table.filter(wallets::user_id.eq(user_id)))
        .set((
            wallets::btc_balance.eq(balance),
            wallets::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_utils::{btc, create_test_user, setup_test_db};

    #[test]
    fn test_get_wallet_missing() {
        let pool = setup_test_db();
        assert!(get_wallet(&pool, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_set_balance() {
        let pool = setup_test_db();
        let user = create_test_user(&pool, Role::Customer, "0");

        let wallet = set_balance(&pool, &user.get_id(), btc("0.1")).unwrap();
        assert_eq!(wallet.get_balance(), btc("0.1"));
        assert_eq!(wallet.balance_view().sbtc_formatted, "1000000.00");

        let reloaded = get_wallet(&pool, &user.get_id()).unwrap().unwrap();
        assert_eq!(reloaded.get_balance(), btc("0.1"));
    }

    #[test]
    fn test_set_balance_without_wallet_fails() {
        let pool = setup_test_db();
        assert!(set_balance(&pool, "nobody", btc("1")).is_err());
    }

    #[test]
    fn test_balance_is_stored_exactly() {
        let pool = setup_test_db();
        let user = create_test_user(&pool, Role::Customer, "0");

        set_balance(&pool, &user.get_id(), btc("0.00000001")).unwrap();
        let wallet = get_wallet(&pool, &user.get_id()).unwrap().unwrap();
        assert_eq!(wallet.get_balance().format(), "0.00000001");
    }
}
