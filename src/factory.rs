// 🏭 Money Factory - one factory per country, lazily created
//
// Each country factory knows:
// - the currency name it stamps on everything it makes
// - which coin values are legal tender
// - which banknote denominations are legal tender
//
// Factories live in a keyed registry. The same country code always returns
// the same instance (Arc::ptr_eq); different codes never share one.

use crate::cash::{is_banknote_denomination, Banknote, CashItem, Coin};
use crate::error::{Result, ValidationError};
use crate::money::validate_currency;
use anyhow::Context as AnyhowContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

// ============================================================================
// COUNTRY TABLE (factory configuration)
// ============================================================================

/// Legal tender for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTable {
    /// Country code, e.g. "TH", "MY"
    pub code: String,

    /// Currency stamped on every item, e.g. "Baht"
    pub currency: String,

    /// Valid coin values
    pub coins: Vec<Decimal>,

    /// Valid banknote denominations (each must follow the banknote rule)
    pub banknotes: Vec<Decimal>,
}

/// Build decimals from (mantissa, scale) pairs: (25, 2) is 0.25
fn amounts(pairs: &[(i64, u32)]) -> Vec<Decimal> {
    pairs
        .iter()
        .map(|&(mantissa, scale)| Decimal::new(mantissa, scale))
        .collect()
}

impl CountryTable {
    /// Thailand: Baht
    pub fn thailand() -> Self {
        CountryTable {
            code: "TH".to_string(),
            currency: "Baht".to_string(),
            coins: amounts(&[(25, 2), (50, 2), (1, 0), (2, 0), (5, 0), (10, 0)]),
            banknotes: amounts(&[(20, 0), (50, 0), (100, 0), (500, 0), (1000, 0)]),
        }
    }

    /// Malaysia: Ringgit
    pub fn malaysia() -> Self {
        CountryTable {
            code: "MY".to_string(),
            currency: "Ringgit".to_string(),
            coins: amounts(&[(1, 2), (5, 2), (10, 2), (20, 2), (50, 2)]),
            banknotes: amounts(&[(1, 0), (5, 0), (10, 0), (20, 0), (50, 0), (100, 0)]),
        }
    }

    /// Tables every registry starts with
    pub fn builtin() -> Vec<Self> {
        vec![CountryTable::thailand(), CountryTable::malaysia()]
    }

    /// Check that the table can only ever produce valid cash
    pub fn validate(&self) -> Result<()> {
        let context = format!("CountryTable[{}]", self.code);

        if normalize_code(&self.code).is_empty() {
            return Err(ValidationError::new(
                &context,
                "code",
                "Required field is empty",
            ));
        }

        validate_currency(&context, &self.currency)?;

        if let Some(bad) = self.coins.iter().find(|v| **v <= Decimal::ZERO) {
            return Err(ValidationError::new(
                &context,
                "coins",
                format!("Coin values must be positive, got {}", bad),
            ));
        }

        if let Some(bad) = self
            .banknotes
            .iter()
            .find(|v| !is_banknote_denomination(**v))
        {
            return Err(ValidationError::new(
                &context,
                "banknotes",
                format!("Not a valid banknote denomination: {}", bad),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON array of tables
    pub fn from_json(json: &str) -> anyhow::Result<Vec<Self>> {
        let tables: Vec<CountryTable> =
            serde_json::from_str(json).context("Failed to parse country table JSON")?;

        for table in &tables {
            table
                .validate()
                .with_context(|| format!("Invalid country table: {}", table.code))?;
        }

        Ok(tables)
    }

    /// Load tables from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Self>> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read country table file: {:?}", path.as_ref()))?;

        CountryTable::from_json(&content)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

// ============================================================================
// MONEY FACTORY
// ============================================================================

/// Creates valid coins and banknotes for one country
#[derive(Debug)]
pub struct MoneyFactory {
    table: CountryTable,
}

impl MoneyFactory {
    /// Process-wide factory for a country code.
    ///
    /// Created on first request and reused afterwards.
    pub fn get_instance(country_code: &str) -> Result<Arc<MoneyFactory>> {
        FactoryRegistry::global().get(country_code)
    }

    fn from_table(table: CountryTable) -> Result<Self> {
        table.validate()?;
        Ok(MoneyFactory { table })
    }

    pub fn country_code(&self) -> &str {
        &self.table.code
    }

    pub fn currency(&self) -> &str {
        &self.table.currency
    }

    pub fn coin_values(&self) -> &[Decimal] {
        &self.table.coins
    }

    pub fn banknote_values(&self) -> &[Decimal] {
        &self.table.banknotes
    }

    /// Make a coin or banknote of this country's currency.
    ///
    /// Coin values are checked before banknote denominations.
    pub fn create_cash(&self, value: Decimal) -> Result<CashItem> {
        if self.table.coins.contains(&value) {
            return Ok(CashItem::Coin(Coin::new(value, self.currency())?));
        }

        if self.table.banknotes.contains(&value) {
            return Ok(CashItem::Banknote(Banknote::new(value, self.currency())?));
        }

        Err(ValidationError::new(
            format!("MoneyFactory[{}]", self.country_code()),
            "value",
            format!("{} is not a valid {} coin or banknote", value, self.currency()),
        ))
    }
}

// ============================================================================
// FACTORY REGISTRY
// ============================================================================

#[derive(Default)]
struct RegistryState {
    tables: HashMap<String, CountryTable>,
    instances: HashMap<String, Arc<MoneyFactory>>,
}

/// Keyed cache of country factories.
///
/// Tests build their own registry; `MoneyFactory::get_instance` uses the
/// process-wide one.
pub struct FactoryRegistry {
    state: Mutex<RegistryState>,
}

lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: FactoryRegistry = FactoryRegistry::new();
}

impl FactoryRegistry {
    /// Registry knowing the built-in countries, with no factories created yet
    pub fn new() -> Self {
        let tables = CountryTable::builtin()
            .into_iter()
            .map(|table| (normalize_code(&table.code), table))
            .collect();

        FactoryRegistry {
            state: Mutex::new(RegistryState {
                tables,
                instances: HashMap::new(),
            }),
        }
    }

    /// Registry with no countries at all
    pub fn empty() -> Self {
        FactoryRegistry {
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static FactoryRegistry {
        &GLOBAL_REGISTRY
    }

    /// Install a country table.
    ///
    /// A country whose factory already exists keeps its table, so the
    /// instance handed out earlier stays the only one for that code.
    pub fn register(&self, table: CountryTable) -> Result<()> {
        table.validate()?;
        let code = normalize_code(&table.code);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.instances.contains_key(&code) {
            return Err(ValidationError::new(
                "FactoryRegistry",
                "country_code",
                format!("Factory for {} already created", code),
            ));
        }

        log::debug!("Registered country table {} ({})", code, table.currency);
        state.tables.insert(code, table);
        Ok(())
    }

    /// Get the factory for a country, creating it on first use
    pub fn get(&self, country_code: &str) -> Result<Arc<MoneyFactory>> {
        let code = normalize_code(country_code);

        // check-then-create under one lock
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(factory) = state.instances.get(&code) {
            return Ok(Arc::clone(factory));
        }

        let table = state.tables.get(&code).cloned().ok_or_else(|| {
            ValidationError::new(
                "FactoryRegistry",
                "country_code",
                format!("Unknown country code: {:?}", country_code),
            )
        })?;

        let factory = Arc::new(MoneyFactory::from_table(table)?);
        log::debug!(
            "Created money factory for {} ({})",
            code,
            factory.currency()
        );
        state.instances.insert(code, Arc::clone(&factory));

        Ok(factory)
    }

    /// Country codes this registry can build factories for
    pub fn country_codes(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut codes: Vec<String> = state.tables.keys().cloned().collect();
        codes.sort();
        codes
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
