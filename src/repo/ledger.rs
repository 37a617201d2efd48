//! Balance-changing operations
//!
//! Every function here runs in a single `BEGIN IMMEDIATE` transaction. The
//! write lock is taken before any balance is read, so concurrent payments
//! from the same wallet are serialized by SQLite and a check like
//! "balance ≥ total" still holds when the debit is written.

use crate::db::DbPool;
use crate::dto::{CartItemDto, cart_total};
use crate::models::{Order, OrderStatus, OrderWithItems, Transaction, Wallet};
use crate::money::Btc;
use crate::payments::{self, CardCharge, PaymentError};
use crate::schema::{orders, transactions};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{find_order, find_wallet, insert_order, load_cart_products, load_items, write_balance};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Wallet not found")]
    WalletNotFound,
    #[error("Vendor wallet not found")]
    VendorWalletNotFound,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Order not found")]
    OrderNotFound,
    #[error("Order does not belong to this vendor")]
    OrderVendorMismatch,
    #[error("Order already completed")]
    OrderAlreadyCompleted,
    #[error("Total does not match order total")]
    OrderTotalMismatch,
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Some products not found or not owned by vendor")]
    UnknownProducts,
    #[error("Total does not match cart total")]
    CartTotalMismatch,
    #[error("Cart total exceeds the maximum amount")]
    CartTotalTooLarge,
    #[error("Balance would exceed the maximum amount")]
    BalanceLimitExceeded,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error(transparent)]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// The result of a successful payment
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub order: OrderWithItems,
    pub transaction: Transaction,
    /// The customer's wallet after the debit
    pub customer_wallet: Wallet,
}

/// The result of a successful card top-up
#[derive(Debug, Clone)]
pub struct FundsAdded {
    pub charge: CardCharge,
    /// The wallet after the credit
    pub wallet: Wallet,
}

/// Moves `total_btc` from a customer's wallet to a vendor's
///
/// With `order_id` the referenced pending QR order is completed; otherwise
/// a completed order is created from `cart_items`. The debit, the credit,
/// the order change and the PAYMENT transaction are committed together or
/// not at all.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `customer_id` - The paying customer
/// * `vendor_id` - The vendor being paid
/// * `cart_items` - The cart, used only when `order_id` is `None`
/// * `total_btc` - The total the customer agreed to pay
/// * `order_id` - An optional pending order to complete
///
/// ### Errors
///
/// Checks run in this order and the first failure is returned:
/// - `WalletNotFound` if the customer has no wallet
/// - `InsufficientBalance` if the balance is below `total_btc`
/// - `VendorWalletNotFound` if the vendor has no wallet
/// - `OrderNotFound`, `OrderVendorMismatch`, `OrderAlreadyCompleted` or
///   `OrderTotalMismatch` for a bad `order_id`
/// - `EmptyCart`, `UnknownProducts`, `CartTotalTooLarge` or
///   `CartTotalMismatch` for a bad cart
/// - `InsufficientBalance` if the balance is below the order's own total
/// - `BalanceLimitExceeded` if the vendor's balance would pass [`MAX_BTC`](crate::money::MAX_BTC)
#[instrument(skip(pool, cart_items), fields(lines = cart_items.len(), total = %total_btc))]
pub fn pay_vendor(
    pool: &DbPool,
    customer_id: &str,
    vendor_id: &str,
    cart_items: &[CartItemDto],
    total_btc: Btc,
    order_id: Option<&str>,
) -> Result<PaymentReceipt, LedgerError> {
    let mut conn = pool.get()?;

    let receipt = conn.immediate_transaction::<_, LedgerError, _>(|conn| {
        let customer_wallet = find_wallet(conn, customer_id)?.ok_or(LedgerError::WalletNotFound)?;
        if customer_wallet.get_balance() < total_btc {
            debug!("Balance {} is below {}", customer_wallet.get_balance(), total_btc);
            return Err(LedgerError::InsufficientBalance);
        }
        let vendor_wallet =
            find_wallet(conn, vendor_id)?.ok_or(LedgerError::VendorWalletNotFound)?;

        let order = match order_id {
            Some(order_id) => complete_pending_order(conn, order_id, customer_id, vendor_id, total_btc)?,
            None => create_paid_order(conn, customer_id, vendor_id, cart_items, total_btc)?,
        };
        // The debit is the stored total, which may differ from `total_btc`
        // below the eighth decimal
        let amount = order.order.get_total_btc();
        if customer_wallet.get_balance() < amount {
            debug!("Balance {} is below order total {}", customer_wallet.get_balance(), amount);
            return Err(LedgerError::InsufficientBalance);
        }

        let vendor_balance = vendor_wallet
            .get_balance()
            .checked_add(amount)
            .ok_or(LedgerError::BalanceLimitExceeded)?;
        write_balance(conn, customer_id, customer_wallet.get_balance() - amount)?;
        write_balance(conn, vendor_id, vendor_balance)?;

        let transaction = Transaction::payment(
            customer_id.to_string(),
            vendor_id.to_string(),
            amount,
            order.order.get_id(),
        );
        diesel::insert_into(transactions::table)
            .values(&transaction)
            .execute(conn)?;

        let customer_wallet = find_wallet(conn, customer_id)?.ok_or(LedgerError::WalletNotFound)?;
        Ok(PaymentReceipt {
            order,
            transaction,
            customer_wallet,
        })
    });

    match &receipt {
        Ok(receipt) => info!(
            "Payment {} of {} for order {}",
            receipt.transaction.get_id(),
            receipt.transaction.get_amount_btc(),
            receipt.order.order.get_id()
        ),
        Err(e) => warn!("Payment rejected: {}", e),
    }
    receipt
}

/// Charges a card and credits the BTC to `user_id`'s wallet
///
/// The card is charged first; a declined card leaves the database
/// untouched. The credit and the ADD_FUNDS transaction are written in one
/// immediate transaction.
///
/// ### Errors
///
/// Returns `LedgerError::Payment` for a declined card,
/// `LedgerError::WalletNotFound` if the user has no wallet and
/// `LedgerError::BalanceLimitExceeded` if the credit would pass [`MAX_BTC`](crate::money::MAX_BTC)
#[instrument(skip(pool, card_number))]
pub fn add_funds_from_card(
    pool: &DbPool,
    user_id: &str,
    card_number: &str,
    amount_usd: Decimal,
) -> Result<FundsAdded, LedgerError> {
    let charge = payments::charge_card(card_number, amount_usd)?;
    let mut conn = pool.get()?;

    let wallet = conn.immediate_transaction::<_, LedgerError, _>(|conn| {
        let wallet = find_wallet(conn, user_id)?.ok_or(LedgerError::WalletNotFound)?;
        let balance = wallet
            .get_balance()
            .checked_add(charge.credited)
            .ok_or(LedgerError::BalanceLimitExceeded)?;
        write_balance(conn, user_id, balance)?;

        let transaction = Transaction::add_funds(user_id.to_string(), charge.credited, charge.description());
        diesel::insert_into(transactions::table)
            .values(&transaction)
            .execute(conn)?;

        find_wallet(conn, user_id)?.ok_or(LedgerError::WalletNotFound)
    })?;

    info!("Credited {} to {}", charge.credited, user_id);
    Ok(FundsAdded { charge, wallet })
}

fn complete_pending_order(
    conn: &mut SqliteConnection,
    order_id: &str,
    customer_id: &str,
    vendor_id: &str,
    total_btc: Btc,
) -> Result<OrderWithItems, LedgerError> {
    let mut order = find_order(conn, order_id)?.ok_or(LedgerError::OrderNotFound)?;
    if order.get_vendor_id() != vendor_id {
        return Err(LedgerError::OrderVendorMismatch);
    }
    if !order.is_pending() {
        return Err(LedgerError::OrderAlreadyCompleted);
    }
    // QR codes carry the total rounded to eight decimals
    if order.get_total_btc().rounded() != total_btc.rounded() {
        return Err(LedgerError::OrderTotalMismatch);
    }

    order.complete(customer_id.to_string());
    let updated = diesel::update(
        orders::table
            .find(order_id)
            .filter(orders::status.eq(OrderStatus::Pending)),
    )
    .set((
        orders::customer_id.eq(order.get_customer_id()),
        orders::status.eq(order.get_status()),
        orders::updated_at.eq(order.get_updated_at_raw()),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(LedgerError::OrderAlreadyCompleted);
    }

    let mut loaded = load_items(conn, vec![order])?;
    loaded.pop().ok_or(LedgerError::OrderNotFound)
}

fn create_paid_order(
    conn: &mut SqliteConnection,
    customer_id: &str,
    vendor_id: &str,
    cart_items: &[CartItemDto],
    total_btc: Btc,
) -> Result<OrderWithItems, LedgerError> {
    let products = load_cart_products(conn, vendor_id, cart_items)?;
    let cart_total = cart_total(cart_items).ok_or(LedgerError::CartTotalTooLarge)?;
    if cart_total.rounded() != total_btc.rounded() {
        debug!("Cart total {} differs from {}", cart_total, total_btc);
        return Err(LedgerError::CartTotalMismatch);
    }

    let order = Order::new_completed(vendor_id.to_string(), customer_id.to_string(), cart_total);
    insert_order(conn, order, cart_items, &products)
}


#[cfg(test)]
mod prop_tests;
