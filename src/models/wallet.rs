use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::money::{BalanceView, Btc};

/// The single balance record owned by each user
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Wallet {
    id: String,

    /// Owner of the wallet, unique per wallet
    user_id: String,

    /// Balance in BTC. sBTC is derived from it on the way out
    btc_balance: Btc,

    created_at: NaiveDateTime,

    updated_at: NaiveDateTime,
}

impl Wallet {
    /// Creates a wallet for `user_id` holding `balance`
    pub fn new(user_id: String, balance: Btc) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            btc_balance: balance,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_balance(&self) -> Btc {
        self.btc_balance
    }

    /// The balance as shown to clients
    pub fn balance_view(&self) -> BalanceView {
        BalanceView::from(self.btc_balance)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
