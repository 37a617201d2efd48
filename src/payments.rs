/// Demo card processor
///
/// No payment network is contacted. Card numbers starting with `4242`
/// are approved and every other number is declined. Approved charges
/// credit BTC at a fixed demo rate.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::money::Btc;

/// Prefix of the card numbers the demo processor approves
pub const DEMO_CARD_PREFIX: &str = "4242";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Payment failed. Please use a card starting with 4242 for demo.")]
    Declined,
}

/// An approved card charge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCharge {
    /// The amount charged to the card, in USD
    pub amount_usd: Decimal,
    /// The BTC to credit for the charge
    pub credited: Btc,
}

impl CardCharge {
    /// Description stored on the ADD_FUNDS transaction
    pub fn description(&self) -> String {
        format!("Added funds via card: ${}", self.amount_usd.normalize())
    }
}

/// Charges `amount_usd` to a card
///
/// ### Errors
///
/// Returns `PaymentError::Declined` unless the card number starts with `4242`
#[instrument(skip(card_number), fields(card_last4 = %last_four(card_number)))]
pub fn charge_card(card_number: &str, amount_usd: Decimal) -> Result<CardCharge, PaymentError> {
    if !card_number.starts_with(DEMO_CARD_PREFIX) {
        warn!("Card declined");
        return Err(PaymentError::Declined);
    }

    let credited = Btc::from_usd(amount_usd);
    info!("Card approved for ${}, crediting {} BTC", amount_usd, credited.format());
    Ok(CardCharge {
        amount_usd,
        credited,
    })
}

fn last_four(card_number: &str) -> &str {
    let start = card_number
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(index, _)| index);
    &card_number[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_card_is_approved() {
        let charge = charge_card("4242424242424242", Decimal::from(100)).unwrap();
        assert_eq!(charge.credited, "0.002".parse().unwrap());
        assert_eq!(charge.description(), "Added funds via card: $100");
    }

    #[test]
    fn test_other_cards_are_declined() {
        assert_eq!(charge_card("4111111111111111", Decimal::from(100)), Err(PaymentError::Declined));
        assert_eq!(charge_card("", Decimal::ONE), Err(PaymentError::Declined));
        assert_eq!(
            PaymentError::Declined.to_string(),
            "Payment failed. Please use a card starting with 4242 for demo."
        );
    }

    #[test]
    fn test_description_keeps_cents() {
        let charge = charge_card("4242000000000000", "12.50".parse().unwrap()).unwrap();
        assert_eq!(charge.description(), "Added funds via card: $12.5");
    }

    #[test]
    fn test_last_four() {
        assert_eq!(last_four("4242424242421234"), "1234");
        assert_eq!(last_four("42"), "42");
    }
}
