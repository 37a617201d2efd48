use super::*;
use crate::models::Role;
use crate::repo::{create_product, get_wallet};
use crate::test_utils::{arb_btc, arb_positive_btc, arb_quantity, create_test_user, setup_test_db};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A payment either moves exactly the cart total from customer to vendor
    /// or fails with insufficient balance and moves nothing
    #[test]
    fn prop_payment_conserves_money(
        starting in arb_btc(),
        vendor_starting in arb_btc(),
        lines in prop::collection::vec((arb_positive_btc(), arb_quantity()), 1..=4),
    ) {
        let pool = setup_test_db();
        let customer = create_test_user(&pool, Role::Customer, &starting.to_string());
        let vendor = create_test_user(&pool, Role::Vendor, &vendor_starting.to_string());

        let cart: Vec<CartItemDto> = lines
            .iter()
            .enumerate()
            .map(|(i, (price, quantity))| {
                let product = create_product(&pool, &vendor.get_id(), format!("Item {}", i), None, *price, None)
                    .unwrap();
                CartItemDto::new(product.get_id(), *quantity, *price)
            })
            .collect();
        let total = cart_total(&cart).unwrap();

        let result = pay_vendor(&pool, &customer.get_id(), &vendor.get_id(), &cart, total, None);

        let customer_after = get_wallet(&pool, &customer.get_id()).unwrap().unwrap().get_balance();
        let vendor_after = get_wallet(&pool, &vendor.get_id()).unwrap().unwrap().get_balance();
        prop_assert_eq!(customer_after + vendor_after, starting + vendor_starting);

        if starting >= total {
            let receipt = result.unwrap();
            prop_assert_eq!(receipt.transaction.get_amount_btc(), total);
            prop_assert_eq!(customer_after, starting - total);
        } else {
            prop_assert!(matches!(result, Err(LedgerError::InsufficientBalance)));
            prop_assert_eq!(customer_after, starting);
        }
    }
}
