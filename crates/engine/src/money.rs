use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed amount of money in **whole units**.
///
/// Budgets, items and draw requests all carry whole-unit amounts, so there is
/// no fractional part to track. The value is signed because an over-funded
/// budget item has a negative remaining capacity.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(126_000);
/// assert_eq!(amount.units(), 126000);
/// assert_eq!(amount.to_string(), "126000");
/// ```
///
/// Parsing from the services' string fields (whole units only):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("2500".parse::<Amount>().unwrap().units(), 2500);
/// assert_eq!("-40".parse::<Amount>().unwrap().units(), -40);
/// assert!("12.50".parse::<Amount>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from whole units.
    #[must_use]
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    /// Returns the raw value in whole units.
    #[must_use]
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a whole-unit decimal string such as `"126000"`.
    ///
    /// An optional leading `+`/`-` is accepted, surrounding whitespace is
    /// ignored. Anything else that is not an ASCII digit is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, digits) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngineError::InvalidAmount(format!("invalid amount: {s}")));
        }

        let units: i64 = digits
            .parse()
            .map_err(|_| EngineError::InvalidAmount(format!("amount too large: {s}")))?;

        Ok(Amount(if negative { -units } else { units }))
    }
}
