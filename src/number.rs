// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Number Literals
//!
//! This module provides the numeric literal grammar shared by the tokenizer, the grammar
//! validator and configuration loading: an optional leading `-`, a run of digits, and an
//! optional decimal point followed by more digits.
//!
//! Parsed values are held as arbitrary precision rationals, so arithmetic in the stepper
//! never overflows or loses precision. The original digit text is preserved alongside the
//! value, which lets the display layer reproduce what the user typed (leading zeros,
//! a trailing decimal point, the width of the fraction).
//!
//! ## Examples
//!
//! ```
//! use quantity_input::number::{NumberParserBuilder, NumberValue};
//! use chumsky::prelude::*;
//!
//! let parser = NumberParserBuilder::new().negative(true).fractional(true).build();
//!
//! let value = parser.parse("0815").into_result().unwrap();
//! assert_eq!(value, NumberValue::new_integer(815));
//! assert_eq!(value.to_string(), "0815");
//!
//! let value = parser.parse("-1.50").into_result().unwrap();
//! assert_eq!(value.base(), "1");
//! assert_eq!(value.fraction(), Some("50"));
//! assert!(value.is_negative());
//! ```

use chumsky::{error::Rich, prelude::*};
use num::{One, Signed, Zero};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Maximum number of fraction digits produced when rendering a computed value.
pub const MAX_FRACTION_DIGITS: usize = 12;

/// Errors produced when a string is not a complete numeric literal.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NumberError {
    #[error("invalid number literal {input:?}: {message}")]
    Invalid { input: String, message: String },
}

/// A parsed numeric value with arbitrary precision.
///
/// Equality compares the numeric value only, so `"0815"` and `"815"` are equal numbers
/// even though they display differently.
#[derive(Debug, Clone)]
pub struct NumberValue {
    /// The calculated arbitrary precision value.
    value: BigRational,

    /// How the number was written.
    format: NumberFormat,
}

impl PartialEq for NumberValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Describes how a number should be formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberFormat {
    /// A literal taken from source text.
    Literal {
        /// Whether the literal started with `-`. Kept separately so that `-0` survives.
        negative: bool,

        /// The digits before the decimal point, without sign.
        base: String,

        /// The digits after the decimal point, if a decimal point was written.
        fraction: Option<String>,
    },

    /// A value produced by arithmetic with no source formatting.
    Computed,
}

impl std::fmt::Display for NumberValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.format {
            NumberFormat::Literal { negative, base, fraction } => {
                if *negative {
                    write!(f, "-")?;
                }
                write!(f, "{}", base)?;
                if let Some(fraction) = fraction {
                    write!(f, ".{}", fraction)?;
                }
                Ok(())
            }
            NumberFormat::Computed => write!(f, "{}", to_decimal_string(&self.value, 0)),
        }
    }
}

impl NumberValue {
    /// Creates an integer literal value.
    pub fn new_integer<T: Into<BigInt>>(value: T) -> Self {
        let int_value = value.into();
        NumberValue {
            format: NumberFormat::Literal {
                negative: int_value.is_negative(),
                base: int_value.abs().to_string(),
                fraction: None,
            },
            value: BigRational::from_integer(int_value),
        }
    }

    /// Creates a value from literal components.
    ///
    /// The caller is responsible for `value` matching the components.
    pub fn new_literal(
        value: BigRational,
        negative: bool,
        base: String,
        fraction: Option<String>,
    ) -> Self {
        NumberValue { value, format: NumberFormat::Literal { negative, base, fraction } }
    }

    /// Creates a computed value from an arithmetic result.
    pub fn new_computed(value: BigRational) -> Self {
        NumberValue { value, format: NumberFormat::Computed }
    }

    /// Returns true if the value is mathematically an integer, regardless of how it was
    /// written (`"5.0"` is whole).
    pub fn is_whole(&self) -> bool {
        self.value.is_integer()
    }

    /// Checks if the value is mathematically negative.
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Returns true if the literal was written with a leading `-`.
    pub fn has_sign(&self) -> bool {
        matches!(self.format, NumberFormat::Literal { negative: true, .. })
    }

    /// Returns the digits before the decimal point, or an empty string for computed values.
    pub fn base(&self) -> &str {
        match &self.format {
            NumberFormat::Literal { base, .. } => base,
            NumberFormat::Computed => "",
        }
    }

    /// Returns the digits after the decimal point, if a decimal point was written.
    pub fn fraction(&self) -> Option<&str> {
        match &self.format {
            NumberFormat::Literal { fraction, .. } => fraction.as_deref(),
            NumberFormat::Computed => None,
        }
    }

    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    /// Converts the number to an f64 value.
    ///
    /// This may lose precision for very large numbers or long fractions.
    pub fn as_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }

    /// Rounds towards zero.
    pub fn to_integer(&self) -> BigInt {
        self.value.to_integer()
    }

    /// Returns the arbitrary precision rational value.
    pub fn to_rational(&self) -> BigRational {
        self.value.clone()
    }

    /// Gets a reference to the underlying rational value.
    pub fn as_rational(&self) -> &BigRational {
        &self.value
    }
}

impl FromStr for NumberValue {
    type Err = NumberError;

    /// Parses a complete literal, allowing a sign and a fraction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumberParserBuilder::new()
            .negative(true)
            .fractional(true)
            .build()
            .then_ignore(end())
            .parse(s)
            .into_result()
            .map_err(|errs| NumberError::Invalid {
                input: s.to_string(),
                message: errs.into_iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", "),
            })
    }
}

/// Renders a rational as a decimal string with at least `min_fraction` fraction digits.
///
/// Non-terminating fractions are truncated after [`MAX_FRACTION_DIGITS`] digits (or
/// `min_fraction`, whichever is larger).
pub fn to_decimal_string(value: &BigRational, min_fraction: usize) -> String {
    let limit = min_fraction.max(MAX_FRACTION_DIGITS);
    let magnitude = value.abs();
    let whole = magnitude.trunc();
    let mut rest = &magnitude - &whole;
    let ten = BigRational::from_integer(BigInt::from(10));

    let mut fraction = String::new();
    while fraction.len() < min_fraction || (!rest.is_zero() && fraction.len() < limit) {
        rest *= ten.clone();
        let digit = rest.trunc();
        fraction.push_str(&digit.to_integer().to_string());
        rest -= digit;
    }

    let mut out = String::new();
    if value.is_negative() && !(whole.is_zero() && fraction.chars().all(|c| c == '0')) {
        out.push('-');
    }
    out.push_str(&whole.to_integer().to_string());
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Builder for configuring and creating a number literal parser.
///
/// By default only unsigned integers are accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberParserBuilder {
    allow_negative: bool,
    allow_fractional: bool,
}

impl NumberParserBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether a leading `-` is allowed.
    pub fn negative(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    /// Configure whether a decimal point is allowed.
    pub fn fractional(mut self, allow: bool) -> Self {
        self.allow_fractional = allow;
        self
    }

    /// Build the configured number parser.
    ///
    /// Unlike a typical integer grammar, leading zeros are accepted (`"0815"`), since the
    /// input comes from a free-text field.
    pub fn build<'a>(self) -> impl Parser<'a, &'a str, NumberValue, extra::Err<Rich<'a, char>>> {
        let sign = just('-').or_not().map(|s| s.is_some());
        let digits = text::digits(10).to_slice();
        let fraction = just('.')
            .ignore_then(text::digits(10).to_slice().or_not().map(|opt| opt.unwrap_or("")))
            .or_not();

        let allow_negative = self.allow_negative;
        let allow_fractional = self.allow_fractional;

        sign.then(digits).then(fraction).try_map(
            move |((negative, base), fraction): ((bool, &str), Option<&str>), span| {
                if negative && !allow_negative {
                    return Err(Rich::<char, _>::custom(span, "Negative numbers not allowed"));
                }
                if fraction.is_some() && !allow_fractional {
                    return Err(Rich::<char, _>::custom(span, "Fractional numbers not allowed"));
                }

                let fraction_digits = fraction.unwrap_or("");
                let mantissa = format!("{}{}", base, fraction_digits);
                let mut numerator = BigInt::from_str(&mantissa)
                    .map_err(|_| Rich::<char, _>::custom(span, "Failed to parse number"))?;
                if negative {
                    numerator = -numerator;
                }
                let denominator = BigInt::from(10).pow(fraction_digits.len() as u32);
                let value = if denominator.is_one() {
                    BigRational::from_integer(numerator)
                } else {
                    BigRational::new(numerator, denominator)
                };

                Ok(NumberValue::new_literal(
                    value,
                    negative,
                    base.to_string(),
                    fraction.map(str::to_string),
                ))
            },
        )
    }
}
