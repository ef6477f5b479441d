//! Draw requests and their effective dates.
use std::{fmt, str::FromStr};

use api_types::draw::DrawRequestRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Amount, BudgetId, BudgetItemId, EngineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawRequestId(pub u64);

impl fmt::Display for DrawRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw request {}", self.0)
    }
}

/// Calendar day a draw request takes effect. No time of day.
///
/// Parsed from `MM/DD/YYYY`; month and day may be written with one digit
/// (`10/5/2015`), the year always has four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectiveDate(NaiveDate);

impl EffectiveDate {
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for EffectiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%m/%d/%Y"))
    }
}

impl FromStr for EffectiveDate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || EngineError::InvalidDate(format!("expected MM/DD/YYYY, got {s:?}"));

        let parts: Vec<&str> = trimmed.split('/').collect();
        let [month, day, year] = parts.as_slice() else {
            return Err(malformed());
        };
        let digits = |part: &str, min: usize, max: usize| {
            (min..=max).contains(&part.len()) && part.chars().all(|c| c.is_ascii_digit())
        };
        if !digits(*month, 1, 2) || !digits(*day, 1, 2) || !digits(*year, 4, 4) {
            return Err(malformed());
        }

        NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
            .map(Self)
            .map_err(|err| EngineError::InvalidDate(format!("{s:?}: {err}")))
    }
}

/// A request to draw `amount` against one budget item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub id: DrawRequestId,
    pub budget_id: BudgetId,
    pub budget_item_id: BudgetItemId,
    pub amount: Amount,
    pub effective_date: EffectiveDate,
}

impl TryFrom<DrawRequestRecord> for DrawRequest {
    type Error = EngineError;

    fn try_from(record: DrawRequestRecord) -> Result<Self, Self::Error> {
        let amount: Amount = record.amount.parse()?;
        // A negative draw would raise the item's capacity.
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "draw request {} has negative amount {amount}",
                record.draw_request_id
            )));
        }

        Ok(Self {
            id: DrawRequestId(record.draw_request_id),
            budget_id: BudgetId(record.budget_id),
            budget_item_id: BudgetItemId(record.budget_item_id),
            amount,
            effective_date: record.effective_date.parse()?,
        })
    }
}
