//! Wire records exchanged with the budget and draw services.
//!
//! Amounts travel as decimal strings of whole units (`"126000"`) and dates as
//! `MM/DD/YYYY` strings. They are kept verbatim here; the engine parses them
//! when a run is set up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod budget {
    use super::*;

    /// A budget as returned by `GET /budgets`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetRecord {
        pub budget_id: u64,
        pub amount: String,
        pub balance_remaining: String,
    }

    /// A budget line item as returned by `GET /items`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetItemRecord {
        pub budget_id: u64,
        pub budget_item_id: u64,
        pub funded_to_date: String,
        pub original_amount: String,
    }
}

pub mod draw {
    use super::*;

    /// An outstanding draw request as returned by `GET /requests`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DrawRequestRecord {
        pub draw_request_id: u64,
        pub budget_id: u64,
        pub budget_item_id: u64,
        pub amount: String,
        /// `MM/DD/YYYY`, month and day may be a single digit.
        pub effective_date: String,
    }

    /// Committed draw request ids grouped by budget id, in commit order.
    ///
    /// Serialized as `{"1": [10, 20]}`.
    pub type Processed = BTreeMap<u64, Vec<u64>>;
}

pub mod snapshot {
    use super::{
        budget::{BudgetItemRecord, BudgetRecord},
        draw::DrawRequestRecord,
        *,
    };

    /// The three collections of one processing run, stored together.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Snapshot {
        pub budgets: Vec<BudgetRecord>,
        pub items: Vec<BudgetItemRecord>,
        pub draw_requests: Vec<DrawRequestRecord>,
    }
}
