// Cash Wallet - Core Library
// Money value objects, country money factories, and a wallet that makes exact change

pub mod error;
pub mod money;
pub mod cash;
pub mod factory;
pub mod wallet;

// Re-export commonly used types
pub use error::ValidationError;
pub use money::{Monetary, Money};
pub use cash::{
    Cash, CashItem, Coin, Banknote,
    share, current_year, is_banknote_denomination,
};
pub use factory::{CountryTable, FactoryRegistry, MoneyFactory};
pub use wallet::{Wallet, find_exact_subset};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_factory_cash_into_wallet() {
        let _ = env_logger::builder().is_test(true).try_init();

        let factory = FactoryRegistry::new().get("TH").unwrap();
        let mut wallet = Wallet::new();

        let items: Vec<_> = [dec!(10), dec!(5), dec!(5), dec!(100)]
            .into_iter()
            .map(|value| factory.create_cash(value).unwrap().into_shared())
            .collect();
        wallet.deposit(items).unwrap();

        assert_eq!(
            wallet.balance("Baht").unwrap(),
            Money::new(dec!(120), "Baht").unwrap()
        );

        let change = wallet.withdraw(&Money::new(dec!(15), "Baht").unwrap()).unwrap();
        assert_eq!(change.len(), 2);
        assert_eq!(
            wallet.balance("Baht").unwrap(),
            Money::new(dec!(105), "Baht").unwrap()
        );
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
