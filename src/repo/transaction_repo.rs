use crate::db::DbPool;
use crate::models::{Order, Transaction, TransactionRecord, TransactionStatus, TransactionType, User, Wallet};
use crate::money::Btc;
use crate::schema::{orders, products, transactions, users};
use anyhow::Result;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

use super::{find_wallet, load_items};

/// How many transactions a customer sees
pub const CUSTOMER_HISTORY_LIMIT: i64 = 50;
/// How many transactions a vendor sees
pub const VENDOR_HISTORY_LIMIT: i64 = 100;

/// Aggregates shown on the vendor dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct VendorStats {
    pub wallet: Option<Wallet>,
    /// Completed transactions received
    pub total_transactions: i64,
    /// Sum of completed payments received
    pub total_revenue: Btc,
    pub total_products: i64,
}

/// Lists transactions a customer sent or received, newest first
///
/// Each record carries both users and the paid order, if any.
#[instrument(skip(pool))]
pub fn list_customer_transactions(pool: &DbPool, user_id: &str) -> Result<Vec<TransactionRecord>> {
    let mut conn = pool.get()?;
    let rows = transactions::table
        .filter(
            transactions::sender_id
                .eq(user_id)
                .or(transactions::receiver_id.eq(user_id)),
        )
        .order(transactions::created_at.desc())
        .limit(CUSTOMER_HISTORY_LIMIT)
        .select(Transaction::as_select())
        .load(&mut conn)?;
    debug!("Found {} transactions", rows.len());
    Ok(build_records(&mut conn, rows, true)?)
}

/// Lists transactions a vendor received, newest first
///
/// Records carry the sender and the paid order; the receiver is the
/// vendor and is left out.
#[instrument(skip(pool))]
pub fn list_vendor_transactions(pool: &DbPool, vendor_id: &str) -> Result<Vec<TransactionRecord>> {
    let mut conn = pool.get()?;
    let rows = transactions::table
        .filter(transactions::receiver_id.eq(vendor_id))
        .order(transactions::created_at.desc())
        .limit(VENDOR_HISTORY_LIMIT)
        .select(Transaction::as_select())
        .load(&mut conn)?;
    debug!("Found {} transactions", rows.len());
    Ok(build_records(&mut conn, rows, false)?)
}

/// Computes the vendor dashboard figures
#[instrument(skip(pool))]
pub fn vendor_stats(pool: &DbPool, vendor_id: &str) -> Result<VendorStats> {
    let mut conn = pool.get()?;

    let wallet = find_wallet(&mut conn, vendor_id)?;

    let completed = transactions::table
        .filter(transactions::receiver_id.eq(vendor_id))
        .filter(transactions::status.eq(TransactionStatus::Completed));

    let total_transactions: i64 = completed.clone().count().get_result(&mut conn)?;

    // Amounts are stored as decimal text, so they are summed here rather than in SQL
    let total_revenue: Btc = completed
        .filter(transactions::type_.eq(TransactionType::Payment))
        .select(transactions::amount_btc)
        .load::<Btc>(&mut conn)?
        .into_iter()
        .sum();

    let total_products: i64 = products::table
        .filter(products::vendor_id.eq(vendor_id))
        .count()
        .get_result(&mut conn)?;

    Ok(VendorStats {
        wallet,
        total_transactions,
        total_revenue,
        total_products,
    })
}

fn build_records(
    conn: &mut SqliteConnection,
    rows: Vec<Transaction>,
    with_receiver: bool,
) -> QueryResult<Vec<TransactionRecord>> {
    let mut user_ids = BTreeSet::new();
    let mut order_ids = BTreeSet::new();
    for tx in &rows {
        user_ids.insert(tx.get_sender_id());
        if with_receiver {
            user_ids.insert(tx.get_receiver_id());
        }
        if let Some(order_id) = tx.get_order_id() {
            order_ids.insert(order_id);
        }
    }

    let users: HashMap<String, User> = users::table
        .filter(users::id.eq_any(user_ids))
        .select(User::as_select())
        .load(conn)?
        .into_iter()
        .map(|user| (user.get_id(), user))
        .collect();

    let orders = orders::table
        .filter(orders::id.eq_any(order_ids))
        .select(Order::as_select())
        .load(conn)?;
    let orders: HashMap<_, _> = load_items(conn, orders)?
        .into_iter()
        .map(|loaded| (loaded.order.get_id(), loaded))
        .collect();

    Ok(rows
        .into_iter()
        .map(|transaction| TransactionRecord {
            sender: users.get(&transaction.get_sender_id()).cloned(),
            receiver: if with_receiver {
                users.get(&transaction.get_receiver_id()).cloned()
            } else {
                None
            },
            order: transaction
                .get_order_id()
                .and_then(|order_id| orders.get(&order_id).cloned()),
            transaction,
        })
        .collect())
}
