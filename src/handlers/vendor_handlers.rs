use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::ValidJson;
use crate::auth::VendorUser;
use crate::db::DbPool;
use crate::dto::{
    ChargeCardDto, ChargeCardResponse, CreateProductDto, CreateQrOrderDto, DashboardStats,
    OrderView, ProductView, QrData, QrOrderResponse, SuccessResponse, TransactionView,
    UpdateProductDto, normalize_image_url,
};
use crate::errors::ApiError;
use crate::models::Product;
use crate::money::BalanceView;
use crate::repo::{self, ProductChanges};

/// Loads a product and checks that `vendor_id` owns it
fn owned_product(pool: &DbPool, vendor_id: &str, product_id: &str) -> Result<Product, ApiError> {
    let product = repo::get_product(pool, product_id)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    if product.get_vendor_id() != vendor_id {
        warn!("Vendor {} tried to modify product {}", vendor_id, product_id);
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }
    Ok(product)
}

/// Handler for adding a product to the caller's catalog
///
/// This function handles POST requests to `/api/vendor/add-product`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `caller` - The authenticated vendor
/// * `payload` - Name, optional description, BTC price and optional image URL
///
/// ### Returns
///
/// `201 Created` with the new product
#[instrument(skip(pool, caller, payload), fields(vendor_id = %caller.0.user_id, name = %payload.name))]
pub async fn add_product_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
    ValidJson(payload): ValidJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    info!("Creating product");

    let product = repo::create_product(
        &pool,
        &caller.0.user_id,
        payload.name,
        payload.description,
        payload.price_btc,
        normalize_image_url(payload.image_url),
    )?;

    Ok((StatusCode::CREATED, Json(ProductView::from(&product))))
}

/// Handler for `GET /api/vendor/products`
#[instrument(skip(pool, caller), fields(vendor_id = %caller.0.user_id))]
pub async fn list_products_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let products = repo::list_products_by_vendor(&pool, &caller.0.user_id)?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Handler for `PUT /api/vendor/products/{id}`
///
/// Only the fields present in the body change. An empty `imageUrl` removes
/// the image.
#[instrument(skip(pool, caller, payload), fields(vendor_id = %caller.0.user_id, product_id = %id))]
pub async fn update_product_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateProductDto>,
) -> Result<Json<ProductView>, ApiError> {
    owned_product(&pool, &caller.0.user_id, &id)?;

    let changes = ProductChanges {
        name: payload.name,
        description: payload.description,
        price_btc: payload.price_btc,
        image_url: payload.image_url.map(|url| normalize_image_url(Some(url))),
    };
    let product = repo::update_product(&pool, &id, changes)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    info!("Updated product");
    Ok(Json(ProductView::from(&product)))
}

/// Handler for `DELETE /api/vendor/products/{id}`
///
/// Products that appear on an order stay, so order history keeps its lines.
#[instrument(skip(pool, caller), fields(vendor_id = %caller.0.user_id, product_id = %id))]
pub async fn delete_product_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    owned_product(&pool, &caller.0.user_id, &id)?;

    if !repo::delete_product(&pool, &id)? {
        return Err(ApiError::Conflict(
            "Product is referenced by existing orders".to_string(),
        ));
    }

    info!("Deleted product");
    Ok(Json(SuccessResponse { success: true }))
}

/// Handler for creating a pending order to be paid by QR code
///
/// This function handles POST requests to `/api/vendor/create-qr-order`.
///
/// ### Returns
///
/// The order, the QR payload, and the payload as a JSON string ready to be
/// encoded in a QR code
#[instrument(skip(pool, caller, payload), fields(vendor_id = %caller.0.user_id, lines = payload.cart_items.len()))]
pub async fn create_qr_order_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
    ValidJson(payload): ValidJson<CreateQrOrderDto>,
) -> Result<Json<QrOrderResponse>, ApiError> {
    info!("Creating QR order");

    let order = repo::create_pending_order(&pool, &caller.0.user_id, &payload.cart_items)?;
    let qr_data = QrData::new(&order.order, &payload.cart_items);
    let qr_code_data =
        serde_json::to_string(&qr_data).map_err(|e| ApiError::Internal(e.into()))?;

    debug!("QR payload is {} bytes", qr_code_data.len());
    Ok(Json(QrOrderResponse {
        order: OrderView::from(&order),
        qr_data,
        qr_code_data,
    }))
}

/// Handler for `GET /api/vendor/transactions`
#[instrument(skip(pool, caller), fields(vendor_id = %caller.0.user_id))]
pub async fn list_vendor_transactions_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
) -> Result<Json<Vec<TransactionView>>, ApiError> {
    let records = repo::list_vendor_transactions(&pool, &caller.0.user_id)?;
    debug!("Returning {} transactions", records.len());
    Ok(Json(records.iter().map(TransactionView::from).collect()))
}

/// Handler for `GET /api/vendor/dashboard/stats`
#[instrument(skip(pool, caller), fields(vendor_id = %caller.0.user_id))]
pub async fn dashboard_stats_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = repo::vendor_stats(&pool, &caller.0.user_id)?;

    Ok(Json(DashboardStats {
        wallet: stats.wallet.as_ref().map(|wallet| wallet.balance_view()),
        total_transactions: stats.total_transactions,
        total_revenue: BalanceView::from(stats.total_revenue),
        total_products: stats.total_products,
    }))
}

/// Handler for `POST /api/vendor/charge-card`
///
/// Same demo card flow as a customer top-up, crediting the vendor's wallet.
#[instrument(skip(pool, caller, payload), fields(vendor_id = %caller.0.user_id, amount = %payload.amount))]
pub async fn charge_card_handler(
    State(pool): State<Arc<DbPool>>,
    caller: VendorUser,
    ValidJson(payload): ValidJson<ChargeCardDto>,
) -> Result<Json<ChargeCardResponse>, ApiError> {
    let added = repo::add_funds_from_card(&pool, &caller.0.user_id, &payload.card_number, payload.amount)?;

    info!("Charged card for {}", added.charge.credited);
    Ok(Json(ChargeCardResponse {
        success: true,
        balance: added.wallet.balance_view(),
    }))
}
