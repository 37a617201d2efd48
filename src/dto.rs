use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Order, OrderItem, OrderStatus, OrderWithItems, Product, Role, TransactionRecord,
    TransactionStatus, TransactionType, User, Wallet,
};
use crate::money::{self, BalanceView, Btc, MAX_BTC, MAX_CARD_CHARGE_USD, Sbtc};

/// Request bodies that must be checked before they reach the database
pub trait Validate {
    /// Returns the message for the first rule the body breaks
    fn validate(&self) -> Result<(), String>;
}

const MIN_PASSWORD_LEN: usize = 6;

fn validate_email(email: &str) -> Result<(), String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid { Ok(()) } else { Err("Invalid email".to_string()) }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    Ok(())
}

fn validate_uuid(value: &str, field: &str) -> Result<(), String> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| format!("{} must be a valid UUID", field))
}

fn validate_amount(amount: Btc, field: &str) -> Result<(), String> {
    if !amount.is_positive() {
        return Err(format!("{} must be positive", field));
    }
    if amount > MAX_BTC {
        return Err(format!("{} must not exceed {}", field, MAX_BTC));
    }
    Ok(())
}

fn validate_image_url(image_url: &Option<String>) -> Result<(), String> {
    match image_url.as_deref() {
        None | Some("") => Ok(()),
        Some(url) => reqwest::Url::parse(url)
            .map(|_| ())
            .map_err(|_| "imageUrl must be a valid URL".to_string()),
    }
}

fn validate_card(card_number: &str, amount: Decimal) -> Result<(), String> {
    if !(13..=19).contains(&card_number.chars().count()) {
        return Err("cardNumber must be 13 to 19 characters".to_string());
    }
    if amount <= Decimal::ZERO {
        return Err("amount must be positive".to_string());
    }
    if amount > MAX_CARD_CHARGE_USD {
        return Err(format!("amount must not exceed {}", MAX_CARD_CHARGE_USD));
    }
    Ok(())
}

/// An empty image URL means "no image"
pub fn normalize_image_url(image_url: Option<String>) -> Option<String> {
    image_url.filter(|url| !url.is_empty())
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignupDto {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl Validate for SignupDto {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        validate_name(&self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

impl Validate for LoginDto {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

/// Partial update of the caller's own profile
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateProfileDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Validate for UpdateProfileDto {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_btc: Btc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Validate for CreateProductDto {
    fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_amount(self.price_btc, "priceBtc")?;
        validate_image_url(&self.image_url)
    }
}

/// Partial product update; absent fields are left unchanged
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_btc: Option<Btc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Validate for UpdateProductDto {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price_btc {
            validate_amount(price, "priceBtc")?;
        }
        validate_image_url(&self.image_url)
    }
}

// ── Orders and payments ──────────────────────────────────────────────

/// One cart line as sent by clients
///
/// `priceSbtc` is accepted for compatibility but ignored; the server
/// derives it from `priceBtc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,
    pub quantity: i32,
    pub price_btc: Btc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_sbtc: Option<Sbtc>,
}

impl CartItemDto {
    pub fn new(product_id: String, quantity: i32, price_btc: Btc) -> Self {
        Self {
            product_id,
            quantity,
            price_btc,
            price_sbtc: Some(price_btc.to_sbtc()),
        }
    }

    pub fn line_total(&self) -> Btc {
        self.price_btc.times(self.quantity)
    }
}

impl Validate for CartItemDto {
    fn validate(&self) -> Result<(), String> {
        validate_uuid(&self.product_id, "productId")?;
        if self.quantity <= 0 {
            return Err("quantity must be a positive integer".to_string());
        }
        validate_amount(self.price_btc, "priceBtc")
    }
}

fn validate_cart(cart_items: &[CartItemDto]) -> Result<(), String> {
    cart_items.iter().try_for_each(|item| item.validate())?;
    match cart_total(cart_items) {
        Some(_) => Ok(()),
        None => Err(format!("Cart total must not exceed {}", MAX_BTC)),
    }
}

/// Sum of price times quantity over a cart
///
/// `None` if the total would pass [`MAX_BTC`].
pub fn cart_total(cart_items: &[CartItemDto]) -> Option<Btc> {
    cart_items
        .iter()
        .try_fold(Btc::ZERO, |total, item| total.checked_add(item.line_total()))
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrOrderDto {
    pub cart_items: Vec<CartItemDto>,
}

impl Validate for CreateQrOrderDto {
    fn validate(&self) -> Result<(), String> {
        if self.cart_items.is_empty() {
            return Err("Cart is empty".to_string());
        }
        validate_cart(&self.cart_items)
    }
}

/// A customer's payment to a vendor, either for a pending QR order
/// (`orderId` set) or for an ad-hoc cart
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayDto {
    pub vendor_id: String,
    #[serde(default)]
    pub cart_items: Vec<CartItemDto>,
    #[serde(rename = "totalBTC")]
    pub total_btc: Btc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sbtc: Option<Sbtc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl Validate for PayDto {
    fn validate(&self) -> Result<(), String> {
        validate_uuid(&self.vendor_id, "vendorId")?;
        validate_cart(&self.cart_items)?;
        validate_amount(self.total_btc, "totalBTC")
    }
}

impl From<QrData> for PayDto {
    fn from(qr: QrData) -> Self {
        Self {
            vendor_id: qr.vendor_id,
            cart_items: qr.cart_items,
            total_btc: qr.total_btc,
            total_sbtc: Some(qr.total_sbtc),
            order_id: Some(qr.order_id),
        }
    }
}

// ── Card top-ups ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddFundsDto {
    pub card_number: String,
    /// Amount charged in USD
    #[serde(with = "money::decimal_number")]
    pub amount: Decimal,
    pub card_holder_name: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl Validate for AddFundsDto {
    fn validate(&self) -> Result<(), String> {
        validate_card(&self.card_number, self.amount)?;
        if self.card_holder_name.trim().is_empty() {
            return Err("cardHolderName is required".to_string());
        }
        if !(3..=4).contains(&self.cvv.chars().count()) {
            return Err("cvv must be 3 or 4 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCardDto {
    pub card_number: String,
    /// Amount charged in USD
    #[serde(with = "money::decimal_number")]
    pub amount: Decimal,
}

impl Validate for ChargeCardDto {
    fn validate(&self) -> Result<(), String> {
        validate_card(&self.card_number, self.amount)
    }
}

// ── Response views ───────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Absent from login replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserView {
    /// The identity returned by login: id, email, name and role only
    pub fn identity(user: &User) -> Self {
        Self {
            created_at: None,
            ..Self::from(user)
        }
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.get_id(),
            email: user.get_email(),
            name: user.get_name(),
            role: user.get_role(),
            created_at: Some(user.get_created_at()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

/// The public identity of the other party in a transaction
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.get_id(),
            name: user.get_name(),
            email: user.get_email(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_btc: Btc,
    pub price_sbtc: Sbtc,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.get_id(),
            vendor_id: product.get_vendor_id(),
            name: product.get_name(),
            description: product.get_description(),
            price_btc: product.get_price_btc(),
            price_sbtc: product.get_price_sbtc(),
            image_url: product.get_image_url(),
            created_at: product.get_created_at(),
            updated_at: product.get_updated_at(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price_btc: Btc,
    pub price_sbtc: Sbtc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductView>,
}

impl OrderItemView {
    pub fn new(item: &OrderItem, product: Option<&Product>) -> Self {
        Self {
            id: item.get_id(),
            order_id: item.get_order_id(),
            product_id: item.get_product_id(),
            quantity: item.get_quantity(),
            price_btc: item.get_price_btc(),
            price_sbtc: item.get_price_btc().to_sbtc(),
            product: product.map(ProductView::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub vendor_id: String,
    pub customer_id: Option<String>,
    pub total_btc: Btc,
    pub total_sbtc: Sbtc,
    pub status: OrderStatus,
    pub qr_code_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    pub fn new(order: &Order, items: Vec<OrderItemView>) -> Self {
        Self {
            id: order.get_id(),
            vendor_id: order.get_vendor_id(),
            customer_id: order.get_customer_id(),
            total_btc: order.get_total_btc(),
            total_sbtc: order.get_total_btc().to_sbtc(),
            status: order.get_status(),
            qr_code_data: order.get_qr_code_data(),
            created_at: order.get_created_at(),
            updated_at: order.get_updated_at(),
            items,
        }
    }
}

impl From<&OrderWithItems> for OrderView {
    fn from(details: &OrderWithItems) -> Self {
        let items = details
            .items
            .iter()
            .map(|(item, product)| OrderItemView::new(item, Some(product)))
            .collect();
        OrderView::new(&details.order, items)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount_btc: Btc,
    pub amount_sbtc: Sbtc,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserSummary>,
    #[serde(default)]
    pub order: Option<OrderView>,
}

impl From<&crate::models::Transaction> for TransactionView {
    fn from(tx: &crate::models::Transaction) -> Self {
        Self {
            id: tx.get_id(),
            sender_id: tx.get_sender_id(),
            receiver_id: tx.get_receiver_id(),
            amount_btc: tx.get_amount_btc(),
            amount_sbtc: tx.get_amount_btc().to_sbtc(),
            kind: tx.get_type(),
            status: tx.get_status(),
            order_id: tx.get_order_id(),
            description: tx.get_description(),
            created_at: tx.get_created_at(),
            sender: None,
            receiver: None,
            order: None,
        }
    }
}

impl From<&TransactionRecord> for TransactionView {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            sender: record.sender.as_ref().map(UserSummary::from),
            receiver: record.receiver.as_ref().map(UserSummary::from),
            order: record.order.as_ref().map(OrderView::from),
            ..TransactionView::from(&record.transaction)
        }
    }
}

/// What a customer's app needs to pay a pending order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrData {
    pub vendor_id: String,
    pub order_id: String,
    pub cart_items: Vec<CartItemDto>,
    /// Order total rounded to eight decimals
    #[serde(rename = "totalBTC")]
    pub total_btc: Btc,
    /// Order total in sBTC rounded to two decimals
    pub total_sbtc: Sbtc,
}

impl QrData {
    pub fn new(order: &Order, cart_items: &[CartItemDto]) -> Self {
        let cart_items = cart_items
            .iter()
            .map(|item| CartItemDto::new(item.product_id.clone(), item.quantity, item.price_btc))
            .collect();
        Self {
            vendor_id: order.get_vendor_id(),
            order_id: order.get_id(),
            cart_items,
            total_btc: order.get_total_btc().rounded(),
            total_sbtc: order.get_total_btc().to_sbtc().rounded(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QrOrderResponse {
    pub order: OrderView,
    pub qr_data: QrData,
    /// `qrData` as a JSON string, ready to encode in a QR code
    pub qr_code_data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub success: bool,
    pub order: OrderView,
    pub transaction: TransactionView,
    pub new_balance: BalanceView,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddedAmounts {
    pub btc: Btc,
    pub sbtc: Sbtc,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddFundsResponse {
    pub success: bool,
    pub balance: BalanceView,
    pub added: AddedAmounts,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChargeCardResponse {
    pub success: bool,
    pub balance: BalanceView,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub wallet: Option<BalanceView>,
    pub total_transactions: i64,
    pub total_revenue: BalanceView,
    pub total_products: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub btc_balance: Btc,
    pub sbtc_balance: Sbtc,
}

impl From<&Wallet> for WalletSummary {
    fn from(wallet: &Wallet) -> Self {
        Self {
            btc_balance: wallet.get_balance(),
            sbtc_balance: wallet.get_balance().to_sbtc(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub wallet: Option<WalletSummary>,
}

impl AdminUserView {
    pub fn new(user: &User, wallet: Option<&Wallet>) -> Self {
        Self {
            id: user.get_id(),
            email: user.get_email(),
            name: user.get_name(),
            role: user.get_role(),
            created_at: user.get_created_at(),
            wallet: wallet.map(WalletSummary::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests;
