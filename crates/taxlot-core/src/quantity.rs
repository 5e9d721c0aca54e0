//! Exact quantity type used for every amount, price and cost basis.
//!
//! A [`Quantity`] wraps an arbitrary-precision rational number, so sums of
//! thousands of lot fragments never accumulate rounding error. Quantities are
//! parsed from decimal text (`"0.125"`, `"1e-8"`, `"-3"`) or from fractions
//! (`"110/3"`), and are only rounded when rendered for display.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Largest decimal exponent accepted when parsing (`1e9999` is rejected).
const MAX_EXPONENT: i64 = 1_000;

/// Error returned when text cannot be read as an exact quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The input was empty or whitespace only.
    #[error("empty quantity")]
    Empty,
    /// The input is not a decimal number or fraction.
    #[error("'{0}' is not a number")]
    Malformed(String),
    /// A fraction with a zero denominator.
    #[error("'{0}' has a zero denominator")]
    ZeroDenominator(String),
    /// The decimal exponent is too large to expand.
    #[error("'{0}' has an exponent out of range")]
    ExponentOutOfRange(String),
    /// A negative value where only non-negative quantities are allowed.
    #[error("'{0}' is negative")]
    Negative(String),
    /// A zero value where a divisor is required.
    #[error("'{0}' must not be zero")]
    Zero(String),
}

/// An exact rational quantity.
///
/// # Examples
///
/// ```
/// use taxlot_core::Quantity;
///
/// let half: Quantity = "0.5".parse().unwrap();
/// let third: Quantity = "1/3".parse().unwrap();
///
/// let sum = &half + &third;
/// assert_eq!(sum, "5/6".parse().unwrap());
/// assert_eq!(sum.to_fixed(2), "0.83");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(BigRational);

impl Quantity {
    /// The zero quantity.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    /// Create a quantity from a whole number.
    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// Create a quantity `numer / denom`. Returns `None` when `denom` is zero.
    #[must_use]
    pub fn from_fraction(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Self(BigRational::new(BigInt::from(numer), BigInt::from(denom))))
    }

    /// Check if the quantity is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the quantity is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Check if the quantity is strictly less than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Exact division, `None` when `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &divisor.0))
        }
    }

    /// Parse text that must denote a quantity `>= 0`.
    pub fn parse_non_negative(text: &str) -> Result<Self, QuantityError> {
        let value: Self = text.parse()?;
        if value.is_negative() {
            return Err(QuantityError::Negative(text.trim().to_string()));
        }
        Ok(value)
    }

    /// Render with exactly `places` fractional digits.
    ///
    /// Rounds to nearest, halves away from zero. A value that rounds to zero
    /// is rendered without a sign.
    ///
    /// ```
    /// use taxlot_core::Quantity;
    ///
    /// let q: Quantity = "2/3".parse().unwrap();
    /// assert_eq!(q.to_fixed(2), "0.67");
    /// assert_eq!(Quantity::from_integer(-5).to_fixed(2), "-5.00");
    /// ```
    #[must_use]
    pub fn to_fixed(&self, places: u32) -> String {
        let scale = BigInt::from(10u32).pow(places);
        let scaled = self.0.numer().abs() * &scale;
        let denom = self.0.denom();
        let mut whole = &scaled / denom;
        if (scaled % denom) * 2u32 >= *denom {
            whole += 1u32;
        }

        let mut digits = whole.to_string();
        let places = places as usize;
        if digits.len() <= places {
            digits.insert_str(0, &"0".repeat(places + 1 - digits.len()));
        }

        let mut out = String::with_capacity(digits.len() + 2);
        if self.is_negative() && !whole.is_zero() {
            out.push('-');
        }
        let split = digits.len() - places;
        out.push_str(&digits[..split]);
        if places > 0 {
            out.push('.');
            out.push_str(&digits[split..]);
        }
        out
    }

    /// Render like [`to_fixed`](Self::to_fixed), then drop trailing zeros and
    /// a dangling decimal point.
    ///
    /// ```
    /// use taxlot_core::Quantity;
    ///
    /// let q: Quantity = "0.60".parse().unwrap();
    /// assert_eq!(q.to_trimmed(8), "0.6");
    /// assert_eq!(Quantity::from_integer(100).to_trimmed(8), "100");
    /// ```
    #[must_use]
    pub fn to_trimmed(&self, places: u32) -> String {
        let fixed = self.to_fixed(places);
        if !fixed.contains('.') {
            return fixed;
        }
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(QuantityError::Empty);
        }

        if let Some((numer, denom)) = text.split_once('/') {
            let numer = parse_integer(numer, true).ok_or_else(|| malformed(text))?;
            let denom = parse_integer(denom, false).ok_or_else(|| malformed(text))?;
            if denom.is_zero() {
                return Err(QuantityError::ZeroDenominator(text.to_string()));
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }

        parse_decimal(text).map(Self)
    }
}

fn malformed(text: &str) -> QuantityError {
    QuantityError::Malformed(text.to_string())
}

/// Parse `[+-]digits`; the sign is only accepted when `signed` is set.
fn parse_integer(text: &str, signed: bool) -> Option<BigInt> {
    let (negative, digits) = split_sign(text);
    if (negative || digits.len() != text.len()) && !signed {
        return None;
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Parse `[+-]int[.frac][(e|E)[+-]exp]` exactly.
fn parse_decimal(text: &str) -> Result<BigRational, QuantityError> {
    let (negative, body) = split_sign(text);

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => {
            let exp_text = &body[pos + 1..];
            let exp = parse_integer(exp_text, true).ok_or_else(|| malformed(text))?;
            let exp = exp
                .to_i64()
                .filter(|e| e.abs() <= MAX_EXPONENT)
                .ok_or_else(|| QuantityError::ExponentOutOfRange(text.to_string()))?;
            (&body[..pos], exp)
        }
        None => (body, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(malformed(text));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(malformed(text));
    }

    let digits = format!("{int_part}{frac_part}");
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| malformed(text))?;
    let numer = if negative { -magnitude } else { magnitude };

    // value = digits * 10^(exponent - frac_len)
    let shift = exponent - frac_part.len() as i64;
    let ten = BigInt::from(10u32);
    let ratio = match shift.cmp(&0) {
        Ordering::Equal => BigRational::from_integer(numer),
        Ordering::Greater => BigRational::from_integer(numer * ten.pow(shift as u32)),
        Ordering::Less => BigRational::new(numer, ten.pow(shift.unsigned_abs() as u32)),
    };
    Ok(ratio)
}

impl fmt::Display for Quantity {
    /// Exact rendering: an integer, or `numer/denom` in lowest terms.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Quantity> for &Quantity {
            type Output = Quantity;
            fn $method(self, rhs: &Quantity) -> Quantity {
                Quantity((&self.0).$method(&rhs.0))
            }
        }

        impl $trait<Quantity> for Quantity {
            type Output = Quantity;
            fn $method(self, rhs: Quantity) -> Quantity {
                Quantity(self.0.$method(rhs.0))
            }
        }

        impl $trait<&Quantity> for Quantity {
            type Output = Quantity;
            fn $method(self, rhs: &Quantity) -> Quantity {
                Quantity(self.0.$method(&rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl AddAssign<&Quantity> for Quantity {
    fn add_assign(&mut self, rhs: &Quantity) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Quantity> for Quantity {
    fn sub_assign(&mut self, rhs: &Quantity) {
        self.0 -= &rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc + q)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc + q)
    }
}
