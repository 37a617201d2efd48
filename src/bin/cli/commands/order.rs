use std::collections::HashMap;

use bitpos::dto::{CartItemDto, CreateQrOrderDto};
use bitpos::money::Btc;
use clap::Subcommand;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Order commands for vendors
#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// Ring up a cart as a pending order and print its QR payload
    Create {
        /// A cart line as PRODUCT_ID:QUANTITY, repeatable
        #[clap(long = "item", required = true)]
        items: Vec<String>,
    },
}

/// Parses a `PRODUCT_ID:QUANTITY` cart line
pub fn parse_cart_line(line: &str) -> Result<(String, i32), String> {
    let (product_id, quantity) = line
        .rsplit_once(':')
        .ok_or_else(|| format!("Expected PRODUCT_ID:QUANTITY, got '{}'", line))?;
    if product_id.is_empty() {
        return Err(format!("Missing product ID in '{}'", line));
    }
    let quantity: i32 = quantity
        .parse()
        .map_err(|_| format!("Invalid quantity in '{}'", line))?;
    if quantity < 1 {
        return Err(format!("Quantity must be at least 1 in '{}'", line));
    }
    Ok((product_id.to_string(), quantity))
}

/// Builds cart items priced from the vendor's current catalog
pub fn price_cart(
    lines: &[(String, i32)],
    prices: &HashMap<String, Btc>,
) -> Result<Vec<CartItemDto>, String> {
    lines
        .iter()
        .map(|(product_id, quantity)| {
            let price = prices
                .get(product_id)
                .ok_or_else(|| format!("Unknown product {}", product_id))?;
            Ok(CartItemDto::new(product_id.clone(), *quantity, *price))
        })
        .collect()
}

/// Executes an order command
pub async fn execute(
    client: &BitposClient,
    cmd: OrderCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        OrderCommands::Create { items } => {
            let lines = items
                .iter()
                .map(|line| parse_cart_line(line))
                .collect::<Result<Vec<_>, _>>()?;
            let prices: HashMap<String, Btc> = client
                .list_products()
                .await?
                .into_iter()
                .map(|product| (product.id, product.price_btc))
                .collect();
            let cart_items = price_cart(&lines, &prices)?;

            let response = client.create_qr_order(&CreateQrOrderDto { cart_items }).await?;
            output::print_qr_order(&response, config);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_line() {
        assert_eq!(parse_cart_line("abc:2"), Ok(("abc".to_string(), 2)));
        assert!(parse_cart_line("abc").is_err());
        assert!(parse_cart_line(":2").is_err());
        assert!(parse_cart_line("abc:0").is_err());
        assert!(parse_cart_line("abc:two").is_err());
    }

    #[test]
    fn test_price_cart_uses_catalog_prices() {
        let prices = HashMap::from([("coffee".to_string(), "0.00008".parse::<Btc>().unwrap())]);

        let cart = price_cart(&[("coffee".to_string(), 3)], &prices).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(cart[0].price_btc, "0.00008".parse::<Btc>().unwrap());
        assert_eq!(cart[0].price_sbtc.unwrap().format(), "800.00");

        assert!(price_cart(&[("tea".to_string(), 1)], &prices).is_err());
    }
}
