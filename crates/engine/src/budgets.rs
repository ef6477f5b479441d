//! Budgets and the line items they fund.
use std::fmt;

use api_types::budget::{BudgetItemRecord, BudgetRecord};
use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetItemId(pub u64);

impl fmt::Display for BudgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "budget {}", self.0)
    }
}

impl fmt::Display for BudgetItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "budget item {}", self.0)
    }
}

/// A top-level pool of money funding one or more [`BudgetItem`]s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub amount: Amount,
    pub balance_remaining: Amount,
}

impl Budget {
    pub fn new(id: u64, amount: i64, balance_remaining: i64) -> Self {
        Self {
            id: BudgetId(id),
            amount: Amount::new(amount),
            balance_remaining: Amount::new(balance_remaining),
        }
    }
}

impl TryFrom<BudgetRecord> for Budget {
    type Error = EngineError;

    fn try_from(record: BudgetRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BudgetId(record.budget_id),
            amount: record.amount.parse()?,
            balance_remaining: record.balance_remaining.parse()?,
        })
    }
}

/// A line item under a budget with its own funding ceiling.
///
/// `funded_to_date` is the baseline reported by the budget service; the
/// engine never changes it. What is still fundable is tracked separately by
/// the [`ItemLedger`](crate::ItemLedger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: BudgetItemId,
    pub budget_id: BudgetId,
    pub original_amount: Amount,
    pub funded_to_date: Amount,
}

impl BudgetItem {
    pub fn new(id: u64, budget_id: u64, original_amount: i64, funded_to_date: i64) -> Self {
        Self {
            id: BudgetItemId(id),
            budget_id: BudgetId(budget_id),
            original_amount: Amount::new(original_amount),
            funded_to_date: Amount::new(funded_to_date),
        }
    }

    /// `original_amount - funded_to_date`. Negative for an over-funded item.
    pub fn remaining_capacity(&self) -> ResultEngine<Amount> {
        self.original_amount
            .checked_sub(self.funded_to_date)
            .ok_or_else(|| EngineError::InvalidAmount(format!("{} capacity overflows", self.id)))
    }
}

impl TryFrom<BudgetItemRecord> for BudgetItem {
    type Error = EngineError;

    fn try_from(record: BudgetItemRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BudgetItemId(record.budget_item_id),
            budget_id: BudgetId(record.budget_id),
            original_amount: record.original_amount.parse()?,
            funded_to_date: record.funded_to_date.parse()?,
        })
    }
}
