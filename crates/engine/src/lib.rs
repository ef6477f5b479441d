//! Allocation of construction-loan budget funds to draw requests.
//!
//! A run takes the budgets, their items and the outstanding draw requests,
//! orders the requests by effective date and commits each one that still fits
//! its item's remaining capacity. See [`Allocator`] for the details and
//! [`process`] for the one-call entry point working on wire records.

use api_types::snapshot::Snapshot;

pub use allocator::{Allocator, AllocatorBuilder, DrawPolicy, ProcessingResult, Settlement};
pub use budgets::{Budget, BudgetId, BudgetItem, BudgetItemId};
pub use draws::{DrawRequest, DrawRequestId, EffectiveDate};
pub use error::EngineError;
pub use ledger::{BudgetLedger, ItemLedger};
pub use money::Amount;
pub use sequencer::DrawSequencer;

mod allocator;
mod budgets;
mod draws;
mod error;
mod ledger;
mod money;
mod sequencer;

type ResultEngine<T> = Result<T, EngineError>;

/// Run one allocation over raw service records.
///
/// Every amount and date is parsed before the first request is evaluated, so
/// a bad record fails the run without touching any ledger.
pub fn process(snapshot: Snapshot, policy: DrawPolicy) -> ResultEngine<Settlement> {
    let budgets = snapshot
        .budgets
        .into_iter()
        .map(Budget::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;
    let items = snapshot
        .items
        .into_iter()
        .map(BudgetItem::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;
    let requests = snapshot
        .draw_requests
        .into_iter()
        .map(DrawRequest::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    tracing::info!(
        "processing {} draw requests against {} budgets ({} items), policy {policy:?}",
        requests.len(),
        budgets.len(),
        items.len()
    );

    Allocator::builder()
        .budgets(budgets)
        .items(items)
        .policy(policy)
        .build()?
        .run(requests)
}
