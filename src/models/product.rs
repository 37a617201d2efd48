use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::money::{Btc, Sbtc};

/// An item a vendor sells, priced in BTC
#[derive(Queryable, Selectable, Insertable, Identifiable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct Product {
    /// Unique identifier for the product (UUID v4 as string)
    id: String,

    /// The vendor that owns this product
    vendor_id: String,

    name: String,

    description: Option<String>,

    /// Unit price in BTC, always positive
    price_btc: Btc,

    image_url: Option<String>,

    created_at: NaiveDateTime,

    updated_at: NaiveDateTime,
}

impl Product {
    /// Creates a new product
    ///
    /// ### Arguments
    ///
    /// * `vendor_id` - The vendor selling the product
    /// * `name` - The product name
    /// * `description` - Optional free text
    /// * `price_btc` - Unit price in BTC
    /// * `image_url` - Optional image location
    ///
    /// ### Returns
    ///
    /// A new `Product` with a fresh ID and timestamps set to now
    pub fn new(
        vendor_id: String,
        name: String,
        description: Option<String>,
        price_btc: Btc,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id,
            name,
            description,
            price_btc,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_vendor_id(&self) -> String {
        self.vendor_id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn get_price_btc(&self) -> Btc {
        self.price_btc
    }

    /// Gets the unit price in sBTC, derived from the BTC price
    pub fn get_price_sbtc(&self) -> Sbtc {
        self.price_btc.to_sbtc()
    }

    pub fn set_price_btc(&mut self, price_btc: Btc) {
        self.price_btc = price_btc;
    }

    pub fn get_image_url(&self) -> Option<String> {
        self.image_url.clone()
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    /// Marks the product as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}
