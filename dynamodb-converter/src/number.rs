/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Arbitrary-precision number types represented as validated decimal strings.
//!
//! These types do not perform arithmetic. They carry the exact digits stored in an `N`
//! attribute so that numbers wider than any native type survive a round trip. Parse the
//! string with your preferred big number library to compute with it.

use std::fmt;
use std::str::FromStr;

/// The string was not a valid decimal number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid {kind}")]
pub struct InvalidNumber {
    input: String,
    kind: &'static str,
}

/// An integer of any width, represented as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigInteger(String);

impl Default for BigInteger {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl FromStr for BigInteger {
    type Err = InvalidNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
        if is_digits(digits) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidNumber {
                input: s.to_string(),
                kind: "integer",
            })
        }
    }
}

impl TryFrom<String> for BigInteger {
    type Error = InvalidNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl AsRef<str> for BigInteger {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decimal of any precision, represented as a string.
///
/// Accepts an optional sign, digits with an optional fractional part, and an optional
/// exponent: `-12.50`, `.5`, `1e-130`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal(String);

impl Default for BigDecimal {
    fn default() -> Self {
        Self("0.0".to_string())
    }
}

impl FromStr for BigDecimal {
    type Err = InvalidNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_decimal(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidNumber {
                input: s.to_string(),
                kind: "decimal",
            })
        }
    }
}

impl TryFrom<String> for BigDecimal {
    type Error = InvalidNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl AsRef<str> for BigDecimal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            (whole.is_empty() || is_digits(whole))
                && (fraction.is_empty() || is_digits(fraction))
                && !(whole.is_empty() && fraction.is_empty())
        }
        None => is_digits(mantissa),
    };
    let exponent_ok = match exponent {
        Some(exponent) => is_digits(exponent.strip_prefix(['-', '+']).unwrap_or(exponent)),
        None => true,
    };
    mantissa_ok && exponent_ok
}

/// Number attributes hold at most this many significant digits.
pub(crate) const MAX_PRECISION: usize = 38;

/// Significant digits of a decimal number, ignoring leading and trailing zeros.
pub(crate) fn significant_digits(text: &str) -> Option<usize> {
    let canonical = canonical(text)?;
    canonical
        .trim_start_matches('-')
        .split('e')
        .next()
        .map(str::len)
}

/// Canonical text of a decimal number, equal for every spelling of the same value:
/// `1`, `+1.0` and `0.1e1` all give `1e0`. Returns `None` if `text` is not a decimal or
/// its exponent is out of range.
pub(crate) fn canonical(text: &str) -> Option<String> {
    if !is_decimal(text) {
        return None;
    }
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{}{}", whole, fraction);
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some("0".to_string());
    }
    let trimmed = significant.trim_end_matches('0');
    let exponent = exponent
        .checked_sub(i64::try_from(fraction.len()).ok()?)?
        .checked_add(i64::try_from(significant.len() - trimmed.len()).ok()?)?;
    let sign = if negative { "-" } else { "" };
    Some(format!("{}{}e{}", sign, trimmed, exponent))
}
