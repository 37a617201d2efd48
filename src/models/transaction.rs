use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::{OrderWithItems, TransactionStatus, TransactionType, User};
use crate::money::Btc;

/// An immutable record of money moving from `sender_id` to `receiver_id`
///
/// Card top-ups are recorded with the same user as sender and receiver.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Transaction {
    id: String,
    sender_id: String,
    receiver_id: String,
    amount_btc: Btc,
    #[diesel(column_name = type_)]
    kind: TransactionType,
    status: TransactionStatus,
    order_id: Option<String>,
    description: Option<String>,
    created_at: NaiveDateTime,
}

impl Transaction {
    /// A completed payment from a customer to a vendor for `order_id`
    pub fn payment(sender_id: String, receiver_id: String, amount_btc: Btc, order_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id,
            receiver_id,
            amount_btc,
            kind: TransactionType::Payment,
            status: TransactionStatus::Completed,
            order_id: Some(order_id),
            description: Some("Payment to vendor".to_string()),
            created_at: Utc::now().naive_utc(),
        }
    }

    /// A completed top-up of `user_id`'s own wallet
    pub fn add_funds(user_id: String, amount_btc: Btc, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: user_id.clone(),
            receiver_id: user_id,
            amount_btc,
            kind: TransactionType::AddFunds,
            status: TransactionStatus::Completed,
            order_id: None,
            description: Some(description),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_sender_id(&self) -> String {
        self.sender_id.clone()
    }

    pub fn get_receiver_id(&self) -> String {
        self.receiver_id.clone()
    }

    pub fn get_amount_btc(&self) -> Btc {
        self.amount_btc
    }

    pub fn get_type(&self) -> TransactionType {
        self.kind
    }

    pub fn get_status(&self) -> TransactionStatus {
        self.status
    }

    pub fn get_order_id(&self) -> Option<String> {
        self.order_id.clone()
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// A transaction with the users on both ends and the order it paid for
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction: Transaction,
    pub sender: Option<User>,
    pub receiver: Option<User>,
    pub order: Option<OrderWithItems>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment() {
        let tx = Transaction::payment(
            "customer".to_string(),
            "vendor".to_string(),
            "0.0002".parse().unwrap(),
            "order".to_string(),
        );
        assert_eq!(tx.get_type(), TransactionType::Payment);
        assert_eq!(tx.get_status(), TransactionStatus::Completed);
        assert_eq!(tx.get_order_id().as_deref(), Some("order"));
        assert_eq!(tx.get_description().as_deref(), Some("Payment to vendor"));
    }

    #[test]
    fn test_add_funds_is_self_transfer() {
        let tx = Transaction::add_funds(
            "user".to_string(),
            "0.002".parse().unwrap(),
            "Added funds via card: $100".to_string(),
        );
        assert_eq!(tx.get_type(), TransactionType::AddFunds);
        assert_eq!(tx.get_sender_id(), tx.get_receiver_id());
        assert_eq!(tx.get_order_id(), None);
    }
}
