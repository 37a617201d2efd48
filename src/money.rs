/// Money amounts
///
/// Wallet balances, prices and transaction amounts are BTC values held as
/// exact decimals. sBTC is not a separate ledger: it is the same amount
/// expressed in units of 1/10,000,000 BTC and is always derived from BTC.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of sBTC in one BTC
pub const BTC_TO_SBTC_RATIO: u32 = 10_000_000;

/// Decimal places shown for BTC amounts
pub const BTC_DISPLAY_DECIMALS: u32 = 8;

/// Decimal places shown for sBTC amounts
pub const SBTC_DISPLAY_DECIMALS: u32 = 2;

const SBTC_PER_BTC: Decimal = Decimal::from_parts(BTC_TO_SBTC_RATIO, 0, 0, false, 0);

/// Demo conversion used for card top-ups: 1 USD buys 0.00002 BTC
const USD_TO_BTC_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 5);

/// Upper bound for any price, cart total or wallet balance
pub const MAX_BTC: Btc = Btc(Decimal::from_parts(21_000_000, 0, 0, false, 0));

/// Upper bound for a single demo card charge
pub const MAX_CARD_CHARGE_USD: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount: {0:?}")]
pub struct ParseAmountError(String);

/// Parses plain (`0.00015`) or exponent (`1.5e-4`) decimal notation
fn parse_decimal(text: &str) -> Result<Decimal, ParseAmountError> {
    let trimmed = text.trim();
    let parsed = if trimmed.contains(|c: char| c == 'e' || c == 'E') {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|_| ParseAmountError(text.to_string()))
}

/// Rounds half away from zero and pads to exactly `dp` places
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

fn to_json_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Accepts either a JSON number or a decimal string
pub fn deserialize_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number.to_string(),
        Raw::Text(text) => text,
    };
    parse_decimal(&text).map_err(serde::de::Error::custom)
}

/// Serde adapter for plain decimals (e.g. USD amounts) sent as JSON numbers
///
/// Use with `#[serde(with = "crate::money::decimal_number")]`.
pub mod decimal_number {
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_json_number(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        super::deserialize_decimal(deserializer)
    }
}

/// An amount of BTC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct Btc(Decimal);

impl Btc {
    pub const ZERO: Btc = Btc(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// The same amount in sBTC
    pub fn to_sbtc(&self) -> Sbtc {
        Sbtc(self.0.saturating_mul(SBTC_PER_BTC))
    }

    /// Unit price times a line quantity
    pub fn times(&self, quantity: i32) -> Btc {
        Btc(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Adds two amounts, returning `None` if the sum would pass [`MAX_BTC`]
    pub fn checked_add(&self, other: Btc) -> Option<Btc> {
        self.0
            .checked_add(other.0)
            .map(Btc)
            .filter(|sum| *sum <= MAX_BTC)
    }

    /// Fixed eight-decimal representation, e.g. `0.00015000`
    pub fn format(&self) -> String {
        fixed(self.0, BTC_DISPLAY_DECIMALS)
    }

    /// The amount rounded to the eight displayed decimals
    pub fn rounded(&self) -> Btc {
        Btc(self.0.round_dp_with_strategy(BTC_DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
    }

    /// The displayed value as a float, i.e. the rounded amount
    pub fn display_value(&self) -> f64 {
        to_json_number(self.rounded().0)
    }

    /// Converts a demo card charge in USD into BTC
    pub fn from_usd(usd: Decimal) -> Btc {
        Btc(usd * USD_TO_BTC_RATE)
    }
}

impl fmt::Display for Btc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Btc {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Btc)
    }
}

// Saturating, so aggregates never panic. Balance changes go through
// `checked_add`.
impl Add for Btc {
    type Output = Btc;

    fn add(self, rhs: Btc) -> Btc {
        Btc(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Btc {
    type Output = Btc;

    fn sub(self, rhs: Btc) -> Btc {
        Btc(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Btc {
    fn sum<I: Iterator<Item = Btc>>(iter: I) -> Self {
        iter.fold(Btc::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Btc> for Btc {
    fn sum<I: Iterator<Item = &'a Btc>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Btc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_json_number(self.0))
    }
}

impl<'de> Deserialize<'de> for Btc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_decimal(deserializer).map(Btc)
    }
}

impl FromSql<Text, Sqlite> for Btc {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(text.parse::<Btc>()?)
    }
}

impl ToSql<Text, Sqlite> for Btc {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.normalize().to_string());
        Ok(IsNull::No)
    }
}

/// An amount of sBTC, always derived from a [`Btc`] amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sbtc(Decimal);

impl Sbtc {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn to_btc(&self) -> Btc {
        Btc(self.0 / SBTC_PER_BTC)
    }

    /// Fixed two-decimal representation, e.g. `1500.00`
    pub fn format(&self) -> String {
        fixed(self.0, SBTC_DISPLAY_DECIMALS)
    }

    pub fn rounded(&self) -> Sbtc {
        Sbtc(self.0.round_dp_with_strategy(SBTC_DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn display_value(&self) -> f64 {
        to_json_number(self.rounded().0)
    }
}

impl fmt::Display for Sbtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Sbtc {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Sbtc)
    }
}

impl Serialize for Sbtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_json_number(self.0))
    }
}

impl<'de> Deserialize<'de> for Sbtc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_decimal(deserializer).map(Sbtc)
    }
}

/// A balance as shown to clients: rounded numbers plus fixed-width strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub btc: f64,
    pub sbtc: f64,
    pub btc_formatted: String,
    pub sbtc_formatted: String,
}

impl From<Btc> for BalanceView {
    fn from(btc: Btc) -> Self {
        let sbtc = btc.to_sbtc();
        Self {
            btc: btc.display_value(),
            sbtc: sbtc.display_value(),
            btc_formatted: btc.format(),
            sbtc_formatted: sbtc.format(),
        }
    }
}
