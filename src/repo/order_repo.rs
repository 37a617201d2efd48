use crate::db::DbPool;
use crate::dto::{CartItemDto, cart_total};
use crate::models::{Order, OrderItem, OrderWithItems, Product};
use crate::schema::{order_items, orders, products};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

use super::find_vendor_products;
use super::ledger::LedgerError;

/// Creates a pending order from a vendor's cart
///
/// Unit prices are taken from the cart as submitted. Every product must
/// belong to `vendor_id`.
///
/// ### Errors
///
/// Returns `LedgerError::EmptyCart` for an empty cart and
/// `LedgerError::UnknownProducts` if any product is missing or owned by
/// another vendor
#[instrument(skip(pool, cart_items), fields(lines = cart_items.len()))]
pub fn create_pending_order(
    pool: &DbPool,
    vendor_id: &str,
    cart_items: &[CartItemDto],
) -> Result<OrderWithItems, LedgerError> {
    let mut conn = pool.get()?;

    let order = conn.transaction(|conn| {
        let products = load_cart_products(conn, vendor_id, cart_items)?;
        let total = cart_total(cart_items).ok_or(LedgerError::CartTotalTooLarge)?;
        let order = Order::new_pending(vendor_id.to_string(), total);
        insert_order(conn, order, cart_items, &products)
    })?;

    info!(
        "Created pending order {} for {}",
        order.order.get_id(),
        order.order.get_total_btc()
    );
    Ok(order)
}

/// Retrieves an order with its lines and products
#[cfg(test)]
pub fn get_order_with_items(
    pool: &DbPool,
    order_id: &str,
) -> Result<Option<OrderWithItems>, LedgerError> {
    let mut conn = pool.get()?;
    let Some(order) = find_order(&mut conn, order_id)? else {
        return Ok(None);
    };
    let mut loaded = load_items(&mut conn, vec![order])?;
    Ok(loaded.pop())
}

/// Loads the products referenced by a cart, checking vendor ownership
pub(crate) fn load_cart_products(
    conn: &mut SqliteConnection,
    vendor_id: &str,
    cart_items: &[CartItemDto],
) -> Result<HashMap<String, Product>, LedgerError> {
    if cart_items.is_empty() {
        return Err(LedgerError::EmptyCart);
    }

    let product_ids: Vec<String> = cart_items
        .iter()
        .map(|item| item.product_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let products = find_vendor_products(conn, vendor_id, &product_ids)?;
    if products.len() != product_ids.len() {
        debug!(
            "Found {} of {} products for vendor {}",
            products.len(),
            product_ids.len(),
            vendor_id
        );
        return Err(LedgerError::UnknownProducts);
    }

    Ok(products
        .into_iter()
        .map(|product| (product.get_id(), product))
        .collect())
}

/// Inserts an order and one line per cart item
pub(crate) fn insert_order(
    conn: &mut SqliteConnection,
    order: Order,
    cart_items: &[CartItemDto],
    products: &HashMap<String, Product>,
) -> Result<OrderWithItems, LedgerError> {
    diesel::insert_into(orders::table).values(&order).execute(conn)?;

    let mut items = Vec::with_capacity(cart_items.len());
    for line in cart_items {
        let product = products
            .get(&line.product_id)
            .ok_or(LedgerError::UnknownProducts)?;
        let item = OrderItem::new(order.get_id(), line.product_id.clone(), line.quantity, line.price_btc);
        diesel::insert_into(order_items::table).values(&item).execute(conn)?;
        items.push((item, product.clone()));
    }

    Ok(OrderWithItems { order, items })
}

pub(crate) fn find_order(conn: &mut SqliteConnection, order_id: &str) -> QueryResult<Option<Order>> {
    orders::table
        .find(order_id)
        .select(Order::as_select())
        .first(conn)
        .optional()
}

/// Loads the lines and products of each order, preserving order
pub(crate) fn load_items(
    conn: &mut SqliteConnection,
    orders: Vec<Order>,
) -> QueryResult<Vec<OrderWithItems>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<(OrderItem, Product)> = OrderItem::belonging_to(&orders)
        .inner_join(products::table)
        .select((OrderItem::as_select(), Product::as_select()))
        .load(conn)?;

    let mut by_order: HashMap<String, Vec<(OrderItem, Product)>> = HashMap::new();
    for (item, product) in items {
        by_order.entry(item.get_order_id()).or_default().push((item, product));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.get_id()).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}
