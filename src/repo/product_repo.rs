use crate::db::DbPool;
use crate::models::Product;
use crate::money::Btc;
use crate::schema::{order_items, products};
use anyhow::Result;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// Fields of a product update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_btc: Option<Btc>,
    /// `Some(None)` clears the image
    pub image_url: Option<Option<String>>,
}

/// Creates a new product for a vendor
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `vendor_id` - The vendor selling the product
/// * `name` - The product name
/// * `description` - Optional description
/// * `price_btc` - Unit price in BTC
/// * `image_url` - Optional image URL
///
/// ### Returns
///
/// A Result containing the newly created Product if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool, description, image_url), fields(vendor_id = %vendor_id, name = %name))]
pub fn create_product(
    pool: &DbPool,
    vendor_id: &str,
    name: String,
    description: Option<String>,
    price_btc: Btc,
    image_url: Option<String>,
) -> Result<Product> {
    let mut conn = pool.get()?;

    let product = Product::new(vendor_id.to_string(), name, description, price_btc, image_url);
    diesel::insert_into(products::table)
        .values(&product)
        .execute(&mut conn)?;

    info!("Created product {}", product.get_id());
    Ok(product)
}

/// Retrieves a product by ID
#[instrument(skip(pool))]
pub fn get_product(pool: &DbPool, product_id: &str) -> Result<Option<Product>> {
    let mut conn = pool.get()?;
    let product = products::table
        .find(product_id)
        .select(Product::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(product)
}

/// Lists a vendor's products, newest first
#[instrument(skip(pool))]
pub fn list_products_by_vendor(pool: &DbPool, vendor_id: &str) -> Result<Vec<Product>> {
    let mut conn = pool.get()?;
    let result = products::table
        .filter(products::vendor_id.eq(vendor_id))
        .order(products::created_at.desc())
        .select(Product::as_select())
        .load(&mut conn)?;
    debug!("Found {} products", result.len());
    Ok(result)
}

/// Applies `changes` to a product and returns the stored result
///
/// ### Returns
///
/// The updated product, or `None` if it does not exist
#[instrument(skip(pool, changes))]
pub fn update_product(
    pool: &DbPool,
    product_id: &str,
    changes: ProductChanges,
) -> Result<Option<Product>> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let Some(mut product) = products::table
            .find(product_id)
            .select(Product::as_select())
            .first(conn)
            .optional()?
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            product.set_name(name);
        }
        if let Some(description) = changes.description {
            product.set_description(Some(description));
        }
        if let Some(price_btc) = changes.price_btc {
            product.set_price_btc(price_btc);
        }
        if let Some(image_url) = changes.image_url {
            product.set_image_url(image_url);
        }
        product.touch();

        diesel::update(&product).set(&product).execute(conn)?;
        info!("Updated product {}", product_id);
        Ok(Some(product))
    })
}

/// Deletes a product unless an order line still references it
///
/// ### Returns
///
/// `true` if the product was deleted, `false` if it is in use
#[instrument(skip(pool))]
pub fn delete_product(pool: &DbPool, product_id: &str) -> Result<bool> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let references: i64 = order_items::table
            .filter(order_items::product_id.eq(product_id))
            .count()
            .get_result(conn)?;
        if references > 0 {
            debug!("Product {} is referenced by {} order lines", product_id, references);
            return Ok(false);
        }

        diesel::delete(products::table.find(product_id)).execute(conn)?;
        info!("Deleted product {}", product_id);
        Ok(true)
    })
}

/// Loads the products in `product_ids` that belong to `vendor_id`
pub(crate) fn find_vendor_products(
    conn: &mut SqliteConnection,
    vendor_id: &str,
    product_ids: &[String],
) -> QueryResult<Vec<Product>> {
    products::table
        .filter(products::vendor_id.eq(vendor_id))
        .filter(products::id.eq_any(product_ids))
        .select(Product::as_select())
        .load(conn)
}
