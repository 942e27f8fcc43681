// 💰 Money - immutable value object (value + currency)
//
// Money is the base kind every cash item reduces to:
// - value is never negative
// - currency is a non-empty label ("Baht", "Ringgit", ...)
// - adding two same-currency amounts always yields a plain Money

use crate::error::{Result, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MONETARY CAPABILITY
// ============================================================================

/// Anything that has a value and a currency.
///
/// Money, Coin, Banknote and any foreign cash type implement this, so
/// addition and the wallet work on the capability instead of concrete types.
pub trait Monetary: fmt::Debug + Send + Sync {
    fn value(&self) -> Decimal;

    fn currency(&self) -> &str;

    /// Add another same-currency amount.
    ///
    /// The result is always a base `Money`, whatever the operand types are.
    fn add(&self, other: &dyn Monetary) -> Result<Money> {
        if self.currency() != other.currency() {
            return Err(ValidationError::new(
                "Money.add",
                "currency",
                format!(
                    "Cannot add {} to {}",
                    other.currency(),
                    self.currency()
                ),
            ));
        }

        let sum = self.value().checked_add(other.value()).ok_or_else(|| {
            ValidationError::new(
                "Money.add",
                "value",
                format!("Sum overflows: {} + {}", self.value(), other.value()),
            )
        })?;

        Money::new(sum, self.currency())
    }
}

// ============================================================================
// MONEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRecord")]
pub struct Money {
    value: Decimal,
    currency: String,
}

impl Money {
    /// Create money, rejecting negative values and empty currencies
    pub fn new(value: Decimal, currency: impl Into<String>) -> Result<Self> {
        let currency = currency.into();
        validate_currency("Money", &currency)?;

        if value < Decimal::ZERO {
            return Err(ValidationError::new(
                "Money",
                "value",
                format!("Must not be negative, got {}", value),
            ));
        }

        Ok(Money { value, currency })
    }

    /// Zero in the given currency
    pub fn zero(currency: impl Into<String>) -> Result<Self> {
        Money::new(Decimal::ZERO, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl Monetary for Money {
    fn value(&self) -> Decimal {
        self.value
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.currency)
    }
}

#[derive(Deserialize)]
struct MoneyRecord {
    value: Decimal,
    currency: String,
}

impl TryFrom<MoneyRecord> for Money {
    type Error = ValidationError;

    fn try_from(record: MoneyRecord) -> Result<Self> {
        Money::new(record.value, record.currency)
    }
}

/// Currency must be a non-empty label
pub(crate) fn validate_currency(context: &str, currency: &str) -> Result<()> {
    if currency.trim().is_empty() {
        return Err(ValidationError::new(
            context,
            "currency",
            "Required field is empty",
        ));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
