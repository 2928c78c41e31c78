use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-point day count with 2 decimal places, stored as a scaled integer.
///
/// Half days are exact, so summing leave entries never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Days(i64);

impl Days {
    const SCALE: i64 = 100;

    pub const ZERO: Days = Days(0);
    pub const HALF: Days = Days(Self::SCALE / 2);
    pub const ONE: Days = Days(Self::SCALE);

    /// Largest magnitude accepted from user input or storage.
    const LIMIT: f64 = 1_000_000.0;

    pub fn from_float(value: f64) -> Self {
        Days((value * Self::SCALE as f64).round() as i64)
    }

    /// Like [`Days::from_float`], but `None` for non-finite values and
    /// magnitudes above one million days.
    pub fn try_from_float(value: f64) -> Option<Self> {
        (value.is_finite() && value.abs() <= Self::LIMIT).then(|| Days::from_float(value))
    }

    pub fn from_scaled(value: i64) -> Self {
        Days(value)
    }

    pub const fn whole(days: i64) -> Self {
        Days(days * Self::SCALE)
    }

    pub fn to_float(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        // one decimal unless the hundredths are significant
        if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}

impl FromStr for Days {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Days::try_from_float)
            .ok_or_else(|| format!("'{}' is not a valid number of days", s.trim()))
    }
}

impl std::ops::Add for Days {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Days(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Days {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Days(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Days {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Days {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Days {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Days::ZERO, |acc, days| acc + days)
    }
}

impl<'a> Sum<&'a Days> for Days {
    fn sum<I: Iterator<Item = &'a Days>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_float())
    }
}

impl<'de> Deserialize<'de> for Days {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Days::try_from_float(value).ok_or_else(|| {
            serde::de::Error::custom(format!("day count {value} is out of range"))
        })
    }
}
