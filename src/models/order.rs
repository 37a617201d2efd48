use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::{OrderStatus, Product};
use crate::money::Btc;

/// A cart snapshot between a vendor and, once paid, a customer
#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Order {
    id: String,
    vendor_id: String,
    /// Set when the order is paid
    customer_id: Option<String>,
    total_btc: Btc,
    status: OrderStatus,
    /// Random identifier encoded in the QR code of a pending order
    qr_code_data: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Order {
    /// Creates a pending order that a customer pays by scanning its QR code
    pub fn new_pending(vendor_id: String, total_btc: Btc) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id,
            customer_id: None,
            total_btc,
            status: OrderStatus::Pending,
            qr_code_data: Some(Uuid::new_v4().to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an order that is already paid by `customer_id`
    pub fn new_completed(vendor_id: String, customer_id: String, total_btc: Btc) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id,
            customer_id: Some(customer_id),
            total_btc,
            status: OrderStatus::Completed,
            qr_code_data: None,
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

    pub fn get_customer_id(&self) -> Option<String> {
        self.customer_id.clone()
    }

    pub fn get_total_btc(&self) -> Btc {
        self.total_btc
    }

    pub fn get_status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn get_qr_code_data(&self) -> Option<String> {
        self.qr_code_data.clone()
    }

    /// Records payment by `customer_id`
    pub fn complete(&mut self, customer_id: String) {
        self.customer_id = Some(customer_id);
        self.status = OrderStatus::Completed;
        self.updated_at = Utc::now().naive_utc();
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    pub(crate) fn get_updated_at_raw(&self) -> NaiveDateTime {
        self.updated_at
    }
}

/// One line of an order, with the unit price captured at order time
#[derive(Queryable, Selectable, Insertable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItem {
    id: String,
    order_id: String,
    product_id: String,
    quantity: i32,
    price_btc: Btc,
}

impl OrderItem {
    pub fn new(order_id: String, product_id: String, quantity: i32, price_btc: Btc) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_id,
            product_id,
            quantity,
            price_btc,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_order_id(&self) -> String {
        self.order_id.clone()
    }

    pub fn get_product_id(&self) -> String {
        self.product_id.clone()
    }

    pub fn get_quantity(&self) -> i32 {
        self.quantity
    }

    pub fn get_price_btc(&self) -> Btc {
        self.price_btc
    }

    /// Unit price times quantity
    pub fn line_total(&self) -> Btc {
        self.price_btc.times(self.quantity)
    }
}

/// An order loaded together with its lines and the products they reference
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<(OrderItem, Product)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pending_has_qr_code() {
        let order = Order::new_pending("vendor-1".to_string(), "0.00023".parse().unwrap());

        assert!(order.is_pending());
        assert_eq!(order.get_customer_id(), None);
        let qr = order.get_qr_code_data().unwrap();
        assert!(Uuid::parse_str(&qr).is_ok());
        assert_ne!(qr, order.get_id());
    }

    #[test]
    fn test_complete_sets_customer() {
        let mut order = Order::new_pending("vendor-1".to_string(), "0.00023".parse().unwrap());
        order.complete("customer-1".to_string());

        assert_eq!(order.get_status(), OrderStatus::Completed);
        assert_eq!(order.get_customer_id().as_deref(), Some("customer-1"));
        assert!(order.get_updated_at() >= order.get_created_at());
    }

    #[test]
    fn test_new_completed_has_no_qr_code() {
        let order = Order::new_completed(
            "vendor-1".to_string(),
            "customer-1".to_string(),
            "0.001".parse().unwrap(),
        );
        assert_eq!(order.get_status(), OrderStatus::Completed);
        assert_eq!(order.get_qr_code_data(), None);
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem::new(
            "order-1".to_string(),
            "product-1".to_string(),
            3,
            "0.00008".parse().unwrap(),
        );
        assert_eq!(item.line_total().format(), "0.00024000");
    }
}
