use bitpos::dto::{AddFundsDto, CartItemDto, ChargeCardDto, PayDto, QrData, cart_total};
use bitpos::money::Btc;
use clap::Subcommand;
use rust_decimal::Decimal;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Wallet commands
#[derive(Subcommand, Debug)]
pub enum WalletCommands {
    /// Show the logged-in customer's balance
    Balance,
    /// Top up the customer wallet with a demo card (numbers starting with 4242 succeed)
    AddFunds {
        #[clap(long)]
        card_number: String,
        /// Amount in USD
        #[clap(long)]
        amount: Decimal,
        #[clap(long)]
        holder: String,
        /// MM/YY
        #[clap(long)]
        expiry: String,
        #[clap(long)]
        cvv: String,
    },
    /// Top up the vendor wallet with a demo card
    ChargeCard {
        #[clap(long)]
        card_number: String,
        /// Amount in USD
        #[clap(long)]
        amount: Decimal,
    },
    /// Pay a vendor, either from a scanned QR payload or from an explicit cart
    Pay {
        /// The QR payload printed by `order create`
        #[clap(long, conflicts_with_all = ["vendor_id", "items", "total", "order_id"])]
        qr: Option<String>,
        #[clap(long, required_unless_present = "qr")]
        vendor_id: Option<String>,
        /// A cart line as PRODUCT_ID:QUANTITY:PRICE_BTC, repeatable
        #[clap(long = "item")]
        items: Vec<String>,
        /// Total in BTC; defaults to the sum of the cart lines
        #[clap(long)]
        total: Option<Btc>,
        /// Pay an existing pending order
        #[clap(long)]
        order_id: Option<String>,
    },
}

/// Parses a `PRODUCT_ID:QUANTITY:PRICE_BTC` cart line
pub fn parse_priced_line(line: &str) -> Result<CartItemDto, String> {
    let mut parts = line.split(':');
    let (Some(product_id), Some(quantity), Some(price), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("Expected PRODUCT_ID:QUANTITY:PRICE_BTC, got '{}'", line));
    };
    let quantity: i32 = quantity
        .parse()
        .map_err(|_| format!("Invalid quantity in '{}'", line))?;
    let price: Btc = price
        .parse()
        .map_err(|_| format!("Invalid price in '{}'", line))?;
    Ok(CartItemDto::new(product_id.to_string(), quantity, price))
}

/// Turns a scanned QR payload into a payment for its pending order
pub fn pay_from_qr(qr: &str) -> Result<PayDto, String> {
    let data: QrData = serde_json::from_str(qr).map_err(|e| format!("Invalid QR data: {}", e))?;
    Ok(PayDto::from(data))
}

/// Executes a wallet command
pub async fn execute(
    client: &BitposClient,
    cmd: WalletCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        WalletCommands::Balance => {
            let balance = client.balance().await?;
            output::print_balance(&balance, config);
        }
        WalletCommands::AddFunds {
            card_number,
            amount,
            holder,
            expiry,
            cvv,
        } => {
            let response = client
                .add_funds(&AddFundsDto {
                    card_number,
                    amount,
                    card_holder_name: holder,
                    expiry_date: expiry,
                    cvv,
                })
                .await?;
            output::print_add_funds(&response, config);
        }
        WalletCommands::ChargeCard {
            card_number,
            amount,
        } => {
            let response = client
                .charge_card(&ChargeCardDto {
                    card_number,
                    amount,
                })
                .await?;
            output::print_charge(&response, config);
        }
        WalletCommands::Pay {
            qr,
            vendor_id,
            items,
            total,
            order_id,
        } => {
            let dto = match (qr, vendor_id) {
                (Some(qr), _) => pay_from_qr(&qr)?,
                (None, Some(vendor_id)) => {
                    let cart_items = items
                        .iter()
                        .map(|line| parse_priced_line(line))
                        .collect::<Result<Vec<_>, _>>()?;
                    let total_btc = match total {
                        Some(total) => total,
                        None => cart_total(&cart_items).ok_or("Cart total is too large")?,
                    };
                    PayDto {
                        vendor_id,
                        cart_items,
                        total_btc,
                        total_sbtc: Some(total_btc.to_sbtc()),
                        order_id,
                    }
                }
                (None, None) => return Err("Either --qr or --vendor-id is required".into()),
            };
            let response = client.pay(&dto).await?;
            output::print_payment(&response, config);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priced_line() {
        let item = parse_priced_line("p1:2:0.00008").unwrap();
        assert_eq!(item.product_id, "p1");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total(), "0.00016".parse::<Btc>().unwrap());

        assert!(parse_priced_line("p1:2").is_err());
        assert!(parse_priced_line("p1:2:abc").is_err());
        assert!(parse_priced_line("p1:2:0.1:extra").is_err());
    }

    #[test]
    fn test_pay_from_qr() {
        let qr = r#"{
            "vendorId": "v1",
            "orderId": "o1",
            "cartItems": [{"productId": "p1", "quantity": 2, "priceBtc": 0.00008}],
            "totalBTC": 0.00016,
            "totalSbtc": 1600
        }"#;
        let dto = pay_from_qr(qr).unwrap();
        assert_eq!(dto.vendor_id, "v1");
        assert_eq!(dto.order_id.as_deref(), Some("o1"));
        assert_eq!(dto.total_btc, "0.00016".parse::<Btc>().unwrap());
        assert_eq!(dto.cart_items.len(), 1);

        assert!(pay_from_qr("not json").is_err());
    }
}
