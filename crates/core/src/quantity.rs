//! Stock quantity value object.

use core::cmp::Ordering;
use core::ops::{Add, Sub};
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A numeric stock level or delta.
///
/// Mirrors a JSON number: whole quantities stay exact integers, anything that
/// involves a fraction is carried as `f64`. Whole arithmetic that would
/// overflow `i64` degrades to `Fractional` rather than wrapping.
///
/// Equality and ordering are by numeric value, so `Whole(7) == Fractional(7.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Whole(i64),
    Fractional(f64),
}

impl Quantity {
    pub const ZERO: Quantity = Quantity::Whole(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Whole(n) => n as f64,
            Quantity::Fractional(f) => f,
        }
    }

    /// NaN and infinities are not quantities.
    pub fn is_finite(self) -> bool {
        match self {
            Quantity::Whole(_) => true,
            Quantity::Fractional(f) => f.is_finite(),
        }
    }

    pub fn is_positive(self) -> bool {
        self > Quantity::ZERO
    }

    /// Reject non-finite values.
    pub fn ensure_numeric(self) -> DomainResult<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(DomainError::validation(format!(
                "invalid quantity: {self}. Must be numeric."
            )))
        }
    }
}

impl ValueObject for Quantity {}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Quantity::Whole(a), Quantity::Whole(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Quantity::Whole(a), Quantity::Whole(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Quantity::Whole(a), Quantity::Whole(b)) => a
                .checked_add(b)
                .map(Quantity::Whole)
                .unwrap_or(Quantity::Fractional(a as f64 + b as f64)),
            (a, b) => Quantity::Fractional(a.as_f64() + b.as_f64()),
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Quantity::Whole(a), Quantity::Whole(b)) => a
                .checked_sub(b)
                .map(Quantity::Whole)
                .unwrap_or(Quantity::Fractional(a as f64 - b as f64)),
            (a, b) => Quantity::Fractional(a.as_f64() - b.as_f64()),
        }
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(Quantity::Whole(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Quantity::Fractional(f)),
            _ => Err(DomainError::validation(format!(
                "invalid quantity: {s:?}. Must be numeric."
            ))),
        }
    }
}

/// Dynamic input: only JSON numbers are quantities.
impl TryFrom<&JsonValue> for Quantity {
    type Error = DomainError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        let invalid = || {
            DomainError::validation(format!("invalid quantity: {value}. Must be numeric."))
        };
        match value {
            JsonValue::Number(n) => match n.as_i64() {
                Some(whole) => Ok(Quantity::Whole(whole)),
                None => n.as_f64().map(Quantity::Fractional).ok_or_else(invalid),
            },
            _ => Err(invalid()),
        }
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Quantity::Whole(n) => write!(f, "{n}"),
            // `{:?}` keeps the decimal point on integral floats ("7.0").
            Quantity::Fractional(x) => write!(f, "{x:?}"),
        }
    }
}
