use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::ValidJson;
use crate::auth::CustomerUser;
use crate::db::DbPool;
use crate::dto::{
    AddFundsDto, AddFundsResponse, AddedAmounts, OrderView, PayDto, PayResponse, TransactionView,
};
use crate::errors::ApiError;
use crate::money::BalanceView;
use crate::repo;

/// Handler for `GET /api/customer/balance`
#[instrument(skip(pool, caller), fields(user_id = %caller.0.user_id))]
pub async fn get_balance_handler(
    State(pool): State<Arc<DbPool>>,
    caller: CustomerUser,
) -> Result<Json<BalanceView>, ApiError> {
    let wallet = repo::get_wallet(&pool, &caller.0.user_id)?
        .ok_or_else(|| ApiError::NotFound("Wallet not found".to_string()))?;
    debug!("Balance is {}", wallet.get_balance());
    Ok(Json(wallet.balance_view()))
}

/// Handler for topping up the caller's wallet with a card
///
/// This function handles POST requests to `/api/customer/add-funds-card`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `caller` - The authenticated customer
/// * `payload` - Card details and the USD amount to charge
///
/// ### Returns
///
/// The new balance and the amount credited
#[instrument(skip(pool, caller, payload), fields(user_id = %caller.0.user_id, amount = %payload.amount))]
pub async fn add_funds_card_handler(
    State(pool): State<Arc<DbPool>>,
    caller: CustomerUser,
    ValidJson(payload): ValidJson<AddFundsDto>,
) -> Result<Json<AddFundsResponse>, ApiError> {
    info!("Adding funds by card");

    let added = repo::add_funds_from_card(&pool, &caller.0.user_id, &payload.card_number, payload.amount)?;

    Ok(Json(AddFundsResponse {
        success: true,
        balance: added.wallet.balance_view(),
        added: AddedAmounts {
            btc: added.charge.credited,
            sbtc: added.charge.credited.to_sbtc(),
        },
    }))
}

/// Handler for paying a vendor
///
/// This function handles POST requests to `/api/customer/pay`. With an
/// `orderId` the pending QR order is paid; without one an order is created
/// from `cartItems`.
///
/// ### Returns
///
/// The completed order, the PAYMENT transaction and the caller's new balance
#[instrument(
    skip(pool, caller, payload),
    fields(user_id = %caller.0.user_id, vendor_id = %payload.vendor_id, total = %payload.total_btc)
)]
pub async fn pay_handler(
    State(pool): State<Arc<DbPool>>,
    caller: CustomerUser,
    ValidJson(payload): ValidJson<PayDto>,
) -> Result<Json<PayResponse>, ApiError> {
    info!("Paying vendor");

    let receipt = repo::pay_vendor(
        &pool,
        &caller.0.user_id,
        &payload.vendor_id,
        &payload.cart_items,
        payload.total_btc,
        payload.order_id.as_deref(),
    )?;

    info!("Paid order {}", receipt.order.order.get_id());
    Ok(Json(PayResponse {
        success: true,
        order: OrderView::from(&receipt.order),
        transaction: TransactionView::from(&receipt.transaction),
        new_balance: receipt.customer_wallet.balance_view(),
    }))
}

/// Handler for `GET /api/customer/transactions`
#[instrument(skip(pool, caller), fields(user_id = %caller.0.user_id))]
pub async fn list_customer_transactions_handler(
    State(pool): State<Arc<DbPool>>,
    caller: CustomerUser,
) -> Result<Json<Vec<TransactionView>>, ApiError> {
    let records = repo::list_customer_transactions(&pool, &caller.0.user_id)?;
    debug!("Returning {} transactions", records.len());
    Ok(Json(records.iter().map(TransactionView::from).collect()))
}
