// 👛 Wallet - holds cash, computes balances, makes exact change
//
// - deposit is all-or-nothing: one bad item and nothing is added
// - balance only counts items of the requested currency
// - withdraw picks items that add up EXACTLY to the amount, or touches nothing
//
// Withdrawal is a subset-sum search, not largest-first. Greedy fails on
// wallets like [1, 5, 10, 10] asked for 25.

use crate::cash::Cash;
use crate::error::{Result, ValidationError};
use crate::money::{Monetary, Money};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

// ============================================================================
// WALLET
// ============================================================================

/// An ordered bag of cash items.
///
/// Items keep insertion order and are never merged: two 5 Baht coins stay
/// two separate items.
#[derive(Debug, Default)]
pub struct Wallet {
    items: Vec<Arc<dyn Cash>>,
}

impl Wallet {
    /// Create an empty wallet
    pub fn new() -> Self {
        Wallet { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Snapshot of the items in insertion order.
    ///
    /// The returned Vec is a copy; changing it does not change the wallet.
    pub fn get_items(&self) -> Vec<Arc<dyn Cash>> {
        self.items.clone()
    }

    /// Distinct currencies held, in the order first deposited
    pub fn currencies(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            if !seen.iter().any(|c| c == item.currency()) {
                seen.push(item.currency().to_string());
            }
        }
        seen
    }

    /// Deposit one or more items.
    ///
    /// Every item is checked before any is added. If one fails, the wallet
    /// is left exactly as it was and the error names the offending item.
    pub fn deposit<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<dyn Cash>>,
    {
        let items: Vec<Arc<dyn Cash>> = items.into_iter().collect();

        for (position, item) in items.iter().enumerate() {
            if let Err(err) = validate_item(position, item.as_ref()) {
                log::warn!("Rejected deposit of {} item(s): {}", items.len(), err);
                return Err(err);
            }
        }

        log::debug!("Deposited {} item(s)", items.len());
        self.items.extend(items);
        Ok(())
    }

    /// Total value of all items in `currency`, as Money.
    ///
    /// A wallet with nothing in that currency has a balance of zero.
    pub fn balance(&self, currency: &str) -> Result<Money> {
        let total = self
            .items
            .iter()
            .filter(|item| item.currency() == currency)
            .try_fold(Decimal::ZERO, |total, item| {
                total.checked_add(item.value()).ok_or_else(|| {
                    ValidationError::new(
                        "Wallet.balance",
                        "value",
                        format!("Sum of {} items overflows", currency),
                    )
                })
            })?;

        Money::new(total, currency)
    }

    /// Take out items of the amount's currency whose values sum exactly to it.
    ///
    /// Returns the removed items (the same handles that were deposited, in
    /// wallet order), or `None` when no exact combination exists. On `None`
    /// the wallet is unchanged. An amount of zero succeeds with no items.
    pub fn withdraw(&mut self, amount: &Money) -> Option<Vec<Arc<dyn Cash>>> {
        let eligible: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.currency() == amount.currency())
            .map(|(index, _)| index)
            .collect();

        let values: Vec<Decimal> = eligible.iter().map(|&i| self.items[i].value()).collect();

        let picked = match find_exact_subset(&values, amount.value()) {
            Some(picked) => picked,
            None => {
                log::debug!(
                    "No exact combination for {} among {} item(s)",
                    amount,
                    values.len()
                );
                return None;
            }
        };

        let chosen: HashSet<usize> = picked.into_iter().map(|p| eligible[p]).collect();

        let mut withdrawn = Vec::with_capacity(chosen.len());
        let mut kept = Vec::with_capacity(self.items.len() - chosen.len());
        for (index, item) in std::mem::take(&mut self.items).into_iter().enumerate() {
            if chosen.contains(&index) {
                withdrawn.push(item);
            } else {
                kept.push(item);
            }
        }
        self.items = kept;

        log::debug!("Withdrew {} as {} item(s)", amount, withdrawn.len());
        Some(withdrawn)
    }
}

fn validate_item(position: usize, item: &dyn Cash) -> Result<()> {
    let context = format!("Wallet.deposit[item {}]", position);

    if item.value() <= Decimal::ZERO {
        return Err(ValidationError::new(
            context,
            "value",
            format!("Must be positive, got {}", item.value()),
        ));
    }

    if item.currency().trim().is_empty() {
        return Err(ValidationError::new(
            context,
            "currency",
            "Required field is empty",
        ));
    }

    Ok(())
}

// ============================================================================
// EXACT SUBSET SEARCH
// ============================================================================

/// Find positions in `values` whose values sum exactly to `target`.
///
/// Dynamic programming over reachable sums. Items are scanned in order and
/// each sum remembers only the first way it was reached, so the same input
/// always gives the same answer. Positions come back ascending.
pub fn find_exact_subset(values: &[Decimal], target: Decimal) -> Option<Vec<usize>> {
    if target.is_zero() {
        return Some(Vec::new());
    }
    if target < Decimal::ZERO {
        return None;
    }

    let total = values
        .iter()
        .filter(|v| **v > Decimal::ZERO)
        .fold(Decimal::ZERO, |total, v| total.saturating_add(*v));
    if total < target {
        return None;
    }

    // sum -> (sum before, position that reached it)
    let mut reached: BTreeMap<Decimal, Option<(Decimal, usize)>> = BTreeMap::new();
    reached.insert(Decimal::ZERO, None);

    for (position, &value) in values.iter().enumerate() {
        if value <= Decimal::ZERO || value > target {
            continue;
        }

        // sums reached before this item, so each item is used at most once
        let frontier: Vec<Decimal> = reached.keys().copied().collect();
        for sum in frontier {
            let next = match sum.checked_add(value) {
                Some(next) if next <= target => next,
                _ => break,
            };
            reached.entry(next).or_insert(Some((sum, position)));
        }

        if reached.contains_key(&target) {
            break;
        }
    }

    let mut picked = Vec::new();
    let mut cursor = target;
    loop {
        match reached.get(&cursor) {
            Some(Some((previous, position))) => {
                picked.push(*position);
                cursor = *previous;
            }
            Some(None) => break,
            None => return None,
        }
    }

    picked.reverse();
    Some(picked)
}

// ============================================================================
// TESTS
// ============================================================================
