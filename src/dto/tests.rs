use super::*;
use serde_json::json;

fn btc(s: &str) -> Btc {
    s.parse().unwrap()
}

fn product_id() -> String {
    Uuid::new_v4().to_string()
}

#[test]
fn test_signup_validation() {
    let mut dto = SignupDto {
        email: "vendor@example.com".to_string(),
        password: "password123".to_string(),
        name: "Demo Vendor".to_string(),
        role: Role::Vendor,
    };
    assert!(dto.validate().is_ok());

    dto.password = "12345".to_string();
    assert_eq!(dto.validate(), Err("Password must be at least 6 characters".to_string()));

    dto.password = "123456".to_string();
    dto.email = "not-an-email".to_string();
    assert_eq!(dto.validate(), Err("Invalid email".to_string()));

    dto.email = "a@b.co".to_string();
    dto.name = "   ".to_string();
    assert_eq!(dto.validate(), Err("Name is required".to_string()));
}

#[test]
fn test_signup_rejects_unknown_role() {
    let result = serde_json::from_value::<SignupDto>(json!({
        "email": "a@b.co",
        "password": "password123",
        "name": "A",
        "role": "ADMIN",
    }));
    assert!(result.is_err());
}

#[test]
fn test_email_rules() {
    for good in ["a@b.co", "first.last@shop.example.com"] {
        assert!(validate_email(good).is_ok(), "{good}");
    }
    for bad in ["", "@b.co", "a@", "a@b", "a@.co", "a@b.", "a b@c.co"] {
        assert!(validate_email(bad).is_err(), "{bad}");
    }
}

#[test]
fn test_create_product_accepts_empty_image_url() {
    let dto: CreateProductDto = serde_json::from_value(json!({
        "name": "Coffee",
        "priceBtc": 0.00008,
        "imageUrl": "",
    }))
    .unwrap();
    assert!(dto.validate().is_ok());
    assert_eq!(normalize_image_url(dto.image_url), None);
}

#[test]
fn test_create_product_rejects_bad_input() {
    let bad_url = CreateProductDto {
        name: "Coffee".to_string(),
        description: None,
        price_btc: btc("0.00008"),
        image_url: Some("not a url".to_string()),
    };
    assert_eq!(bad_url.validate(), Err("imageUrl must be a valid URL".to_string()));

    let free = CreateProductDto {
        price_btc: Btc::ZERO,
        image_url: None,
        ..bad_url
    };
    assert_eq!(free.validate(), Err("priceBtc must be positive".to_string()));
}

#[test]
fn test_create_product_rejects_price_above_max() {
    let dto: CreateProductDto = serde_json::from_value(json!({
        "name": "Island",
        "priceBtc": 1e22,
    }))
    .unwrap();
    assert_eq!(dto.validate(), Err("priceBtc must not exceed 21000000".to_string()));

    let at_max = CreateProductDto {
        price_btc: MAX_BTC,
        ..dto
    };
    assert!(at_max.validate().is_ok());
}

#[test]
fn test_update_product_is_partial() {
    let dto: UpdateProductDto = serde_json::from_value(json!({"priceBtc": "0.0001"})).unwrap();
    assert!(dto.name.is_none());
    assert_eq!(dto.price_btc, Some(btc("0.0001")));
    assert!(dto.validate().is_ok());

    let negative = UpdateProductDto {
        price_btc: Some(btc("-1")),
        ..Default::default()
    };
    assert!(negative.validate().is_err());
}

#[test]
fn test_cart_item_validation() {
    let mut item = CartItemDto::new(product_id(), 2, btc("0.00015"));
    assert!(item.validate().is_ok());

    item.quantity = 0;
    assert_eq!(item.validate(), Err("quantity must be a positive integer".to_string()));

    item.quantity = 1;
    item.product_id = "abc".to_string();
    assert_eq!(item.validate(), Err("productId must be a valid UUID".to_string()));
}

#[test]
fn test_cart_item_rejects_fractional_quantity() {
    let result = serde_json::from_value::<CartItemDto>(json!({
        "productId": product_id(),
        "quantity": 1.5,
        "priceBtc": 0.0001,
    }));
    assert!(result.is_err());
}

#[test]
fn test_qr_order_requires_items() {
    let dto = CreateQrOrderDto { cart_items: vec![] };
    assert_eq!(dto.validate(), Err("Cart is empty".to_string()));
}

#[test]
fn test_cart_total() {
    let cart = vec![
        CartItemDto::new(product_id(), 2, btc("0.00015")),
        CartItemDto::new(product_id(), 1, btc("0.00008")),
    ];
    assert_eq!(cart_total(&cart), Some(btc("0.00038")));
}

#[test]
fn test_cart_total_above_max_is_rejected() {
    let cart = vec![CartItemDto::new(product_id(), 3, btc("10000000"))];
    assert_eq!(cart_total(&cart), None);

    let dto = CreateQrOrderDto { cart_items: cart };
    assert_eq!(dto.validate(), Err("Cart total must not exceed 21000000".to_string()));
}

#[test]
fn test_pay_dto_wire_names() {
    let vendor_id = Uuid::new_v4().to_string();
    let dto: PayDto = serde_json::from_value(json!({
        "vendorId": vendor_id,
        "cartItems": [{
            "productId": product_id(),
            "quantity": 2,
            "priceBtc": 0.00015,
            "priceSbtc": 1500,
        }],
        "totalBTC": 0.0003,
        "totalSbtc": 3000,
    }))
    .unwrap();

    assert_eq!(dto.total_btc, btc("0.0003"));
    assert_eq!(dto.order_id, None);
    assert!(dto.validate().is_ok());

    let value = serde_json::to_value(&dto).unwrap();
    assert!(value.get("totalBTC").is_some());
    assert!(value.get("orderId").is_none());
}

#[test]
fn test_pay_dto_cart_defaults_to_empty() {
    let dto: PayDto = serde_json::from_value(json!({
        "vendorId": Uuid::new_v4().to_string(),
        "totalBTC": 0.0003,
        "orderId": Uuid::new_v4().to_string(),
    }))
    .unwrap();
    assert!(dto.cart_items.is_empty());
    assert!(dto.validate().is_ok());
}

#[test]
fn test_pay_dto_rejects_bad_vendor_and_total() {
    let mut dto = PayDto {
        vendor_id: "vendor".to_string(),
        cart_items: vec![],
        total_btc: btc("0.1"),
        total_sbtc: None,
        order_id: None,
    };
    assert_eq!(dto.validate(), Err("vendorId must be a valid UUID".to_string()));

    dto.vendor_id = Uuid::new_v4().to_string();
    dto.total_btc = Btc::ZERO;
    assert_eq!(dto.validate(), Err("totalBTC must be positive".to_string()));

    dto.total_btc = btc("1e28");
    assert_eq!(dto.validate(), Err("totalBTC must not exceed 21000000".to_string()));
}

#[test]
fn test_add_funds_validation() {
    let mut dto: AddFundsDto = serde_json::from_value(json!({
        "cardNumber": "4242424242424242",
        "amount": 100,
        "cardHolderName": "Demo Customer",
        "expiryDate": "12/30",
        "cvv": "123",
    }))
    .unwrap();
    assert_eq!(dto.amount, Decimal::from(100));
    assert!(dto.validate().is_ok());

    dto.cvv = "12".to_string();
    assert_eq!(dto.validate(), Err("cvv must be 3 or 4 characters".to_string()));

    dto.cvv = "1234".to_string();
    dto.card_number = "4242".to_string();
    assert_eq!(dto.validate(), Err("cardNumber must be 13 to 19 characters".to_string()));
}

#[test]
fn test_charge_card_requires_positive_amount() {
    let dto = ChargeCardDto {
        card_number: "4242424242424242".to_string(),
        amount: Decimal::ZERO,
    };
    assert_eq!(dto.validate(), Err("amount must be positive".to_string()));
}

#[test]
fn test_charge_card_rejects_amount_above_max() {
    let mut dto: ChargeCardDto = serde_json::from_value(json!({
        "cardNumber": "4242424242424242",
        "amount": 1e28,
    }))
    .unwrap();
    assert_eq!(dto.validate(), Err("amount must not exceed 1000000000".to_string()));

    dto.amount = MAX_CARD_CHARGE_USD;
    assert!(dto.validate().is_ok());
}

#[test]
fn test_product_view_derives_sbtc() {
    let product = Product::new(
        "vendor-1".to_string(),
        "Blueberries".to_string(),
        None,
        btc("0.00015"),
        None,
    );
    let value = serde_json::to_value(ProductView::from(&product)).unwrap();

    assert_eq!(value["priceBtc"], json!(0.00015));
    assert_eq!(value["priceSbtc"], json!(1500.0));
    assert_eq!(value["vendorId"], "vendor-1");
    assert!(value["imageUrl"].is_null());
}

#[test]
fn test_qr_data_rounds_totals() {
    let order = Order::new_pending("vendor-1".to_string(), btc("0.000380004"));
    let cart = vec![CartItemDto {
        product_id: product_id(),
        quantity: 1,
        price_btc: btc("0.000380004"),
        price_sbtc: None,
    }];
    let qr = QrData::new(&order, &cart);

    assert_eq!(qr.total_btc, btc("0.00038"));
    assert_eq!(qr.total_sbtc.format(), "3800.04");
    assert_eq!(qr.cart_items[0].price_sbtc, Some(btc("0.000380004").to_sbtc()));

    let value = serde_json::to_value(&qr).unwrap();
    assert_eq!(value["orderId"], order.get_id());
    assert!(value.get("totalBTC").is_some());
}

#[test]
fn test_qr_data_converts_to_payment() {
    let order = Order::new_pending(Uuid::new_v4().to_string(), btc("0.0003"));
    let cart = vec![CartItemDto::new(product_id(), 2, btc("0.00015"))];
    let qr = QrData::new(&order, &cart);

    let text = serde_json::to_string(&qr).unwrap();
    let pay = PayDto::from(serde_json::from_str::<QrData>(&text).unwrap());

    assert_eq!(pay.order_id, Some(order.get_id()));
    assert_eq!(pay.total_btc, btc("0.0003"));
    assert!(pay.validate().is_ok());
}

#[test]
fn test_transaction_view_uses_type_key() {
    let tx = crate::models::Transaction::add_funds(
        "user-1".to_string(),
        btc("0.002"),
        "Added funds via card: $100".to_string(),
    );
    let value = serde_json::to_value(TransactionView::from(&tx)).unwrap();

    assert_eq!(value["type"], "ADD_FUNDS");
    assert_eq!(value["status"], "COMPLETED");
    assert_eq!(value["amountSbtc"], json!(20000.0));
    assert!(value["order"].is_null());
    assert!(value.get("sender").is_none());
}

#[test]
fn test_admin_user_view_without_wallet() {
    let user = User::new(
        "a@b.co".to_string(),
        "hash".to_string(),
        "A".to_string(),
        Role::Customer,
    );
    let view = AdminUserView::new(&user, None);
    let value = serde_json::to_value(&view).unwrap();

    assert_eq!(value["role"], "CUSTOMER");
    assert!(value["wallet"].is_null());
    assert!(value.get("password").is_none());
}

#[test]
fn test_login_identity_omits_created_at() {
    let user = User::new(
        "a@b.co".to_string(),
        "hash".to_string(),
        "A".to_string(),
        Role::Vendor,
    );

    let full = serde_json::to_value(UserView::from(&user)).unwrap();
    assert!(full["createdAt"].is_string());

    let identity = serde_json::to_value(UserView::identity(&user)).unwrap();
    assert_eq!(
        identity,
        json!({"id": user.get_id(), "email": "a@b.co", "name": "A", "role": "VENDOR"})
    );
}
