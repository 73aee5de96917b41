use std::fmt;

use serde::{Deserialize, Serialize};

/// An `Amount` represents a unit value of money in GBP, stored as a signed
/// integer count of pence. A single `Amount` of 1 is the same as a single
/// penny. The type is `Copy` and every operation returns a new value.
///
/// On the wire an `Amount` is a bare JSON integer (pence), never an object
/// or a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

/// One penny, the minor currency unit.
pub const PENNY: Amount = Amount(1);

/// One pound. Exactly 100 pence, always.
pub const POUND: Amount = Amount(100);

impl Amount {
    /// The maximum representable `Amount`.
    pub const MAX: Amount = Amount(i64::MAX);

    /// The minimum representable `Amount`.
    pub const MIN: Amount = Amount(i64::MIN);

    /// Creates an `Amount` from an integer count of pence.
    pub const fn from_pence(pence: i64) -> Self {
        Amount(pence)
    }

    /// Creates an `Amount` from a float count of pounds.
    ///
    /// The result is `pounds * 100` truncated toward zero by the float to
    /// integer conversion, not arithmetically rounded: `0.01` becomes 1
    /// penny, `-0.01` becomes -1 penny, and values smaller than a penny in
    /// magnitude collapse to zero. Values beyond the `i64` domain saturate
    /// at [`Amount::MAX`] / [`Amount::MIN`].
    pub fn from_pounds(pounds: f64) -> Self {
        const PENNIES_IN_POUND: f64 = 100.0;

        Amount((pounds * PENNIES_IN_POUND) as i64)
    }

    /// An `Amount` of zero pence.
    pub const fn zero() -> Self {
        Amount(0)
    }

    /// The integer pence representation of the `Amount`.
    pub const fn pence(self) -> i64 {
        self.0
    }

    /// The float pounds representation of the `Amount`.
    ///
    /// Computed from the truncated whole-pound part plus the remainder over
    /// 100 rather than a single float division, so values near the `i64`
    /// boundary keep the exact whole part the integer arithmetic produced.
    pub fn pounds(self) -> f64 {
        let whole = self.0 / 100;
        let remainder = self.0 % 100;

        whole as f64 + remainder as f64 / 100.0
    }

    /// Rounds up to the nearest pound.
    pub fn ceil(self) -> Self {
        Self::from_pounds(self.pounds().ceil())
    }

    /// Rounds down to the nearest pound.
    pub fn floor(self) -> Self {
        Self::from_pounds(self.pounds().floor())
    }

    /// Rounds to the nearest pound, halves away from zero.
    ///
    /// Rounding goes through [`Amount::pounds`], so near the limits of f64
    /// precision it inherits float rounding artifacts. That is accepted
    /// behaviour, not something callers should try to correct for.
    pub fn round(self) -> Self {
        Self::from_pounds(self.pounds().round())
    }

    /// Drops the fractional pound part of the `Amount`.
    pub fn trunc(self) -> Self {
        Self::from_pounds(self.pounds().trunc())
    }
}

/// Returns the larger of the two `Amount`s.
pub fn max(a: Amount, b: Amount) -> Amount {
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the smaller of the two `Amount`s.
pub fn min(a: Amount, b: Amount) -> Amount {
    if a < b {
        a
    } else {
        b
    }
}

impl fmt::Display for Amount {
    /// Formats as a human readable value, eg. `-£3.50`.
    ///
    /// The integer part carries thousands separators and the fractional
    /// part is always exactly two digits, zero padded. The sign is computed
    /// on a widened copy so [`Amount::MIN`] formats without overflowing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pence = i128::from(self.0);
        let (sign, magnitude) = if pence < 0 { ("-", -pence) } else { ("", pence) };

        let whole = magnitude / 100;
        let fraction = magnitude % 100;

        write!(f, "{sign}£{}.{fraction:02}", group_thousands(whole))
    }
}

/// Inserts a comma every three digits from the right.
fn group_thousands(n: i128) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
