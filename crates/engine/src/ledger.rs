//! Remaining capacity pools mutated by a processing run.
//!
//! Both ledgers are built once from the source records and then only ever
//! decrease. They belong to a single [`Allocator`](crate::Allocator); a new
//! run builds new ledgers.
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use serde::Serialize;

use crate::{Amount, Budget, BudgetId, BudgetItem, BudgetItemId, EngineError, ResultEngine};

fn debit(current: &mut Amount, amount: Amount, label: impl fmt::Display) -> ResultEngine<()> {
    *current = current
        .checked_sub(amount)
        .ok_or_else(|| EngineError::InvalidAmount(format!("{label} balance overflows")))?;
    Ok(())
}

/// Remaining balance per budget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BudgetLedger {
    balances: HashMap<BudgetId, Amount>,
}

impl BudgetLedger {
    /// Index budgets by id.
    ///
    /// A repeated id is an `ExistingKey` error rather than the later record
    /// silently replacing the earlier one.
    pub fn from_budgets(budgets: impl IntoIterator<Item = Budget>) -> ResultEngine<Self> {
        let mut balances = HashMap::new();
        for budget in budgets {
            match balances.entry(budget.id) {
                Entry::Occupied(_) => return Err(EngineError::ExistingKey(budget.id.to_string())),
                Entry::Vacant(slot) => {
                    slot.insert(budget.balance_remaining);
                }
            }
        }
        Ok(Self { balances })
    }

    pub fn contains(&self, id: BudgetId) -> bool {
        self.balances.contains_key(&id)
    }

    pub fn balance(&self, id: BudgetId) -> ResultEngine<Amount> {
        self.balances
            .get(&id)
            .copied()
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Subtract `amount` from the budget's balance and return the new balance.
    pub fn withdraw(&mut self, id: BudgetId, amount: Amount) -> ResultEngine<Amount> {
        let balance = self
            .balances
            .get_mut(&id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        debit(balance, amount, id)?;
        Ok(*balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BudgetId, Amount)> + '_ {
        self.balances.iter().map(|(id, balance)| (*id, *balance))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
struct ItemSlot {
    budget_id: BudgetId,
    capacity: Amount,
}

/// Remaining fundable capacity per budget item, plus the budget owning it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemLedger {
    items: HashMap<BudgetItemId, ItemSlot>,
}

impl ItemLedger {
    /// Derive `original_amount - funded_to_date` for every item.
    ///
    /// A repeated item id is an `ExistingKey` error rather than the later
    /// record silently replacing the earlier one.
    pub fn from_items(items: impl IntoIterator<Item = BudgetItem>) -> ResultEngine<Self> {
        let mut slots = HashMap::new();
        for item in items {
            let capacity = item.remaining_capacity()?;
            match slots.entry(item.id) {
                Entry::Occupied(_) => return Err(EngineError::ExistingKey(item.id.to_string())),
                Entry::Vacant(slot) => {
                    slot.insert(ItemSlot {
                        budget_id: item.budget_id,
                        capacity,
                    });
                }
            }
        }
        Ok(Self { items: slots })
    }

    fn slot(&self, id: BudgetItemId) -> ResultEngine<&ItemSlot> {
        self.items
            .get(&id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn capacity(&self, id: BudgetItemId) -> ResultEngine<Amount> {
        Ok(self.slot(id)?.capacity)
    }

    pub fn owner(&self, id: BudgetItemId) -> ResultEngine<BudgetId> {
        Ok(self.slot(id)?.budget_id)
    }

    /// Subtract `amount` from the item's capacity and return the new capacity.
    pub fn withdraw(&mut self, id: BudgetItemId, amount: Amount) -> ResultEngine<Amount> {
        let slot = self
            .items
            .get_mut(&id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        debit(&mut slot.capacity, amount, id)?;
        Ok(slot.capacity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BudgetItemId, BudgetId, Amount)> + '_ {
        self.items
            .iter()
            .map(|(id, slot)| (*id, slot.budget_id, slot.capacity))
    }
}
