// 🪙 Cash - Coin and Banknote value objects
//
// Cash is Money you can hold: strictly positive value, a currency,
// and the year it was minted (stamped once, never changed).
//
// Rules:
// - Coin: any positive value, fractions included (0.01, 2.5, 0.000001)
// - Banknote: only {1, 2, 5} x 10^n for n >= 0 (1, 2, 5, 10, 20, 50, ...)
// - Adding cash yields Money, never Coin or Banknote

use crate::error::{Result, ValidationError};
use crate::money::{validate_currency, Monetary};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// CASH CAPABILITY
// ============================================================================

/// A physical monetary item a wallet can hold.
///
/// The wallet depends only on this trait, so new kinds of cash can be
/// deposited without the wallet knowing about them.
pub trait Cash: Monetary {
    /// Year the item was minted
    fn year(&self) -> i32;
}

/// Wrap any cash as the shared handle a wallet stores
pub fn share<C: Cash + 'static>(cash: C) -> Arc<dyn Cash> {
    Arc::new(cash)
}

/// Current calendar year, used as the default mint year
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn validate_positive(context: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::new(
            context,
            "value",
            format!("Must be positive, got {}", value),
        ));
    }
    Ok(())
}

/// Check the banknote denomination rule: {1, 2, 5} x 10^n, n >= 0
pub fn is_banknote_denomination(value: Decimal) -> bool {
    if value <= Decimal::ZERO || !value.fract().is_zero() {
        return false;
    }

    let mut leading = value.trunc();
    while leading >= Decimal::TEN && (leading % Decimal::TEN).is_zero() {
        leading /= Decimal::TEN;
    }

    leading == Decimal::ONE || leading == Decimal::from(2) || leading == Decimal::from(5)
}

#[derive(Deserialize)]
struct CashRecord {
    value: Decimal,
    currency: String,
    year: i32,
}

// ============================================================================
// COIN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CashRecord")]
pub struct Coin {
    value: Decimal,
    currency: String,
    year: i32,
}

impl Coin {
    /// Mint a coin this year
    pub fn new(value: Decimal, currency: impl Into<String>) -> Result<Self> {
        Coin::minted(value, currency, current_year())
    }

    /// Mint a coin with an explicit year
    pub fn minted(value: Decimal, currency: impl Into<String>, year: i32) -> Result<Self> {
        let currency = currency.into();
        validate_positive("Coin", value)?;
        validate_currency("Coin", &currency)?;

        Ok(Coin {
            value,
            currency,
            year,
        })
    }
}

impl Monetary for Coin {
    fn value(&self) -> Decimal {
        self.value
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

impl Cash for Coin {
    fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} coin ({})",
            self.value.normalize(),
            self.currency,
            self.year
        )
    }
}

impl TryFrom<CashRecord> for Coin {
    type Error = ValidationError;

    fn try_from(record: CashRecord) -> Result<Self> {
        Coin::minted(record.value, record.currency, record.year)
    }
}

// ============================================================================
// BANKNOTE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CashRecord")]
pub struct Banknote {
    value: Decimal,
    currency: String,
    year: i32,
}

impl Banknote {
    /// Print a banknote this year
    pub fn new(value: Decimal, currency: impl Into<String>) -> Result<Self> {
        Banknote::minted(value, currency, current_year())
    }

    /// Print a banknote with an explicit year
    pub fn minted(value: Decimal, currency: impl Into<String>, year: i32) -> Result<Self> {
        let currency = currency.into();
        validate_positive("Banknote", value)?;

        if !is_banknote_denomination(value) {
            return Err(ValidationError::new(
                "Banknote",
                "value",
                format!("Must be 1, 2 or 5 times a power of ten, got {}", value),
            ));
        }

        validate_currency("Banknote", &currency)?;

        Ok(Banknote {
            value,
            currency,
            year,
        })
    }
}

impl Monetary for Banknote {
    fn value(&self) -> Decimal {
        self.value
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

impl Cash for Banknote {
    fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for Banknote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} note ({})",
            self.value.normalize(),
            self.currency,
            self.year
        )
    }
}

impl TryFrom<CashRecord> for Banknote {
    type Error = ValidationError;

    fn try_from(record: CashRecord) -> Result<Self> {
        Banknote::minted(record.value, record.currency, record.year)
    }
}

// ============================================================================
// CASH ITEM (what a factory produces)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashItem {
    Coin(Coin),
    Banknote(Banknote),
}

impl CashItem {
    pub fn is_coin(&self) -> bool {
        matches!(self, CashItem::Coin(_))
    }

    pub fn is_banknote(&self) -> bool {
        matches!(self, CashItem::Banknote(_))
    }

    /// Wrap as a shared handle ready for `Wallet::deposit`
    pub fn into_shared(self) -> Arc<dyn Cash> {
        match self {
            CashItem::Coin(coin) => Arc::new(coin),
            CashItem::Banknote(note) => Arc::new(note),
        }
    }
}

impl Monetary for CashItem {
    fn value(&self) -> Decimal {
        match self {
            CashItem::Coin(coin) => coin.value(),
            CashItem::Banknote(note) => note.value(),
        }
    }

    fn currency(&self) -> &str {
        match self {
            CashItem::Coin(coin) => coin.currency(),
            CashItem::Banknote(note) => note.currency(),
        }
    }
}

impl Cash for CashItem {
    fn year(&self) -> i32 {
        match self {
            CashItem::Coin(coin) => coin.year(),
            CashItem::Banknote(note) => note.year(),
        }
    }
}

impl fmt::Display for CashItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashItem::Coin(coin) => fmt::Display::fmt(coin, f),
            CashItem::Banknote(note) => fmt::Display::fmt(note, f),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
