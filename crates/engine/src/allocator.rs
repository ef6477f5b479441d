//! The draw allocation run.
//!
//! An [`Allocator`] owns one [`ItemLedger`] and one [`BudgetLedger`] built
//! from the source records. [`Allocator::run`] walks the draw requests in
//! chronological order exactly once and either commits or skips each of them:
//!
//! - a committed request is deducted, in full, from its item's capacity and
//!   from its budget's balance;
//! - a skipped request is never looked at again in the same run.
//!
//! `run` consumes the allocator, so a run cannot be repeated on ledgers that
//! have already been drawn down.
use std::collections::BTreeMap;

use api_types::draw::Processed;
use serde::{Deserialize, Serialize};

use crate::{
    Amount, Budget, BudgetId, BudgetItem, BudgetLedger, DrawRequest, DrawRequestId, DrawSequencer,
    EngineError, ItemLedger, ResultEngine,
};

/// Which ceilings gate a commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Only the item's remaining capacity is checked. The budget balance is
    /// still decremented on every commit and may go negative.
    #[default]
    ItemCapacity,
    /// Both the item's capacity and the budget's remaining balance must
    /// cover the request.
    ItemAndBudget,
}

/// Committed draw request ids grouped by budget, in commit order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProcessingResult(BTreeMap<BudgetId, Vec<DrawRequestId>>);

impl ProcessingResult {
    fn push(&mut self, budget_id: BudgetId, request_id: DrawRequestId) {
        self.0.entry(budget_id).or_default().push(request_id);
    }

    /// Committed ids for `budget_id`, empty if nothing was committed.
    pub fn committed(&self, budget_id: BudgetId) -> &[DrawRequestId] {
        self.0.get(&budget_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BudgetId, &[DrawRequestId])> {
        self.0.iter().map(|(id, requests)| (*id, requests.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of committed draw requests across all budgets.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl From<ProcessingResult> for Processed {
    fn from(result: ProcessingResult) -> Self {
        result
            .0
            .into_iter()
            .map(|(budget_id, requests)| {
                (budget_id.0, requests.into_iter().map(|id| id.0).collect())
            })
            .collect()
    }
}

/// Outcome of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub processed: ProcessingResult,
    /// Requests that failed the drawability test, in evaluation order.
    pub skipped: Vec<DrawRequestId>,
    pub items: ItemLedger,
    pub budgets: BudgetLedger,
}

#[derive(Debug)]
pub struct Allocator {
    items: ItemLedger,
    budgets: BudgetLedger,
    policy: DrawPolicy,
}

impl Allocator {
    /// Return a builder for `Allocator`. Help to build the struct.
    pub fn builder() -> AllocatorBuilder {
        AllocatorBuilder::default()
    }

    pub fn policy(&self) -> DrawPolicy {
        self.policy
    }

    pub fn items(&self) -> &ItemLedger {
        &self.items
    }

    pub fn budgets(&self) -> &BudgetLedger {
        &self.budgets
    }

    /// Check that `request` draws a non-negative amount from an existing item
    /// owned by the budget it names. Owners are known to exist after `build`.
    fn validate(&self, request: &DrawRequest) -> ResultEngine<()> {
        if request.amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "{} has negative amount {}",
                request.id, request.amount
            )));
        }
        let owner = self.items.owner(request.budget_item_id)?;
        if owner != request.budget_id {
            return Err(EngineError::BudgetMismatch(format!(
                "{} names {} but {} belongs to {}",
                request.id, request.budget_id, request.budget_item_id, owner
            )));
        }
        Ok(())
    }

    /// Whether `request` fits the current ledgers under the active policy.
    pub fn is_drawable(&self, request: &DrawRequest) -> ResultEngine<bool> {
        let capacity = self.items.capacity(request.budget_item_id)?;
        let fits_item = request.amount <= capacity;

        Ok(match self.policy {
            DrawPolicy::ItemCapacity => fits_item,
            DrawPolicy::ItemAndBudget => {
                fits_item && request.amount <= self.budgets.balance(request.budget_id)?
            }
        })
    }

    fn commit(&mut self, request: &DrawRequest) -> ResultEngine<()> {
        let capacity = self
            .items
            .withdraw(request.budget_item_id, request.amount)?;
        let balance = self.budgets.withdraw(request.budget_id, request.amount)?;

        tracing::debug!(
            "committed {} ({}) on {}: item capacity {capacity}, budget balance {balance}",
            request.id,
            request.amount,
            request.budget_item_id
        );
        if balance < Amount::ZERO {
            tracing::warn!("{} balance went negative: {balance}", request.budget_id);
        }
        Ok(())
    }

    /// Process every request once, in chronological order.
    ///
    /// Any lookup error aborts the run; no partial result is returned.
    pub fn run(mut self, requests: Vec<DrawRequest>) -> ResultEngine<Settlement> {
        let mut processed = ProcessingResult::default();
        let mut skipped = Vec::new();

        for request in DrawSequencer::order(requests) {
            self.validate(&request)?;

            if self.is_drawable(&request)? {
                self.commit(&request)?;
                processed.push(request.budget_id, request.id);
            } else {
                tracing::debug!(
                    "skipped {} ({}) on {} dated {}",
                    request.id,
                    request.amount,
                    request.budget_item_id,
                    request.effective_date
                );
                skipped.push(request.id);
            }
        }

        tracing::info!(
            "draw run finished: {} committed, {} skipped",
            processed.len(),
            skipped.len()
        );

        Ok(Settlement {
            processed,
            skipped,
            items: self.items,
            budgets: self.budgets,
        })
    }
}

#[derive(Debug, Default)]
pub struct AllocatorBuilder {
    budgets: Vec<Budget>,
    items: Vec<BudgetItem>,
    policy: DrawPolicy,
}

impl AllocatorBuilder {
    pub fn budgets(mut self, budgets: Vec<Budget>) -> AllocatorBuilder {
        self.budgets = budgets;
        self
    }

    pub fn items(mut self, items: Vec<BudgetItem>) -> AllocatorBuilder {
        self.items = items;
        self
    }

    pub fn policy(mut self, policy: DrawPolicy) -> AllocatorBuilder {
        self.policy = policy;
        self
    }

    /// Construct `Allocator`, deriving fresh ledgers.
    ///
    /// Fails if an item belongs to a budget that was not supplied.
    pub fn build(self) -> ResultEngine<Allocator> {
        let budgets = BudgetLedger::from_budgets(self.budgets)?;
        let items = ItemLedger::from_items(self.items)?;

        if let Some((item_id, budget_id, _)) = items
            .iter()
            .find(|(_, owner, _)| !budgets.contains(*owner))
        {
            return Err(EngineError::KeyNotFound(format!("{budget_id} of {item_id}")));
        }

        Ok(Allocator {
            items,
            budgets,
            policy: self.policy,
        })
    }
}
