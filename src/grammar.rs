// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Grammar Validation
//!
//! Decides whether a token sequence is a legal quantity expression and, if so, pairs every
//! number with its unit.
//!
//! Two grammars are supported:
//!
//! * [`Mode::SingleUnit`] accepts a number followed by at most one unit word (`"512 MB"`).
//! * [`Mode::MultiUnit`] accepts several number/unit pairs with units going from largest to
//!   smallest (`"1h 20min"`).
//!
//! Number tokens separated only by whitespace are read as one digit-grouped number, so
//! `"1 000 MB"` is a thousand megabytes.
//!
//! ## Examples
//!
//! ```
//! use quantity_input::grammar::{validate, Mode};
//! use quantity_input::error::ValidationErrorKind;
//! use quantity_input::token::tokenize;
//! use quantity_input::units::UnitConfig;
//!
//! let config = UnitConfig::durations();
//!
//! let parse = validate(&tokenize("1 h 20 min"), &config, Mode::MultiUnit).unwrap();
//! assert_eq!(parse.quantities().len(), 2);
//! assert_eq!(parse.active_unit(), config.find("min").unwrap());
//!
//! let err = validate(&tokenize("20 min 1 h"), &config, Mode::MultiUnit).unwrap_err();
//! assert_eq!(err.kind(), ValidationErrorKind::UnitsOutOfOrder);
//! ```

use crate::error::{ValidationError, ValidationErrorKind};
use crate::number::NumberValue;
use crate::token::Token;
use crate::units::UnitConfig;
use crate::Spanned;
use num::Zero;
use num_rational::BigRational;
use std::ops::Range;
use std::str::FromStr;

/// Which unit grammar to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// At most one unit word.
    #[default]
    SingleUnit,

    /// Several units, strictly from largest to smallest, each preceded by a number.
    MultiUnit,
}

/// A number paired with the unit it is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: NumberValue,
    unit: usize,

    /// Token indices of the number, including whitespace inside a digit group.
    number_tokens: Range<usize>,

    /// Token index of the unit word; `None` when the unit came from the default.
    unit_token: Option<usize>,
}

impl Quantity {
    pub fn value(&self) -> &NumberValue {
        &self.value
    }

    /// Index into the [`UnitConfig`].
    pub fn unit(&self) -> usize {
        self.unit
    }

    pub fn number_tokens(&self) -> Range<usize> {
        self.number_tokens.clone()
    }

    pub fn unit_token(&self) -> Option<usize> {
        self.unit_token
    }

    /// The same source position holding a different value or unit.
    pub(crate) fn replaced(&self, value: NumberValue, unit: usize) -> Quantity {
        Quantity {
            value,
            unit,
            number_tokens: self.number_tokens.clone(),
            unit_token: self.unit_token,
        }
    }
}

/// An accepted quantity expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidParse {
    tokens: Vec<Spanned<Token>>,
    quantities: Vec<Quantity>,
    active_unit: usize,
}

impl ValidParse {
    /// The tokens the expression was parsed from.
    pub fn tokens(&self) -> &[Spanned<Token>] {
        &self.tokens
    }

    /// Quantities in the order they were written.
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// Unit of the last quantity: the smallest unit written in multi-unit mode, or the
    /// default unit when no unit word was given.
    pub fn active_unit(&self) -> usize {
        self.active_unit
    }

    /// The quantity the stepper operates on.
    pub fn active_quantity(&self) -> Option<&Quantity> {
        self.quantities.iter().find(|q| q.unit == self.active_unit)
    }

    /// The sum of all quantities expressed in `unit`.
    ///
    /// ```
    /// use quantity_input::{tokenize, validate, Mode, UnitConfig};
    /// use num_rational::BigRational;
    /// use num_bigint::BigInt;
    ///
    /// let config = UnitConfig::durations();
    /// let parse = validate(&tokenize("1h 30min"), &config, Mode::MultiUnit).unwrap();
    /// let minutes = parse.total_in(config.find("min").unwrap(), &config);
    /// assert_eq!(minutes, BigRational::from_integer(BigInt::from(90)));
    /// ```
    pub fn total_in(&self, unit: usize, config: &UnitConfig) -> BigRational {
        self.quantities.iter().fold(BigRational::zero(), |acc, q| {
            acc + config.convert(q.value.as_rational(), q.unit, unit)
        })
    }
}

/// Either an accepted expression or the reason it was rejected.
pub type ParseResult = Result<ValidParse, ValidationError>;

/// Validates token sequences against a unit table and a grammar mode.
///
/// The default unit (bound to numbers with no unit word) starts as the configuration's
/// default and can be overridden per call, typically with the unit currently selected next
/// to the input field.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    config: &'c UnitConfig,
    mode: Mode,
    default_unit: usize,
}

impl<'c> Validator<'c> {
    pub fn new(config: &'c UnitConfig) -> Self {
        Validator { config, mode: Mode::default(), default_unit: config.default_unit() }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Overrides the unit bound to unitless numbers. Out-of-range indices are ignored.
    pub fn default_unit(mut self, unit: usize) -> Self {
        if unit < self.config.len() {
            self.default_unit = unit;
        } else {
            tracing::warn!(unit, units = self.config.len(), "ignoring out-of-range default unit");
        }
        self
    }

    /// Validates `tokens`. Never panics; every rejection is an `Err`.
    pub fn validate(&self, tokens: &[Spanned<Token>]) -> ParseResult {
        let result = self.walk(tokens);
        match &result {
            Ok(parse) => tracing::trace!(
                quantities = parse.quantities.len(),
                active_unit = parse.active_unit,
                "accepted quantity expression"
            ),
            Err(err) => tracing::debug!(
                kind = ?err.kind(),
                span = ?err.span(),
                mode = ?self.mode,
                "rejected quantity expression"
            ),
        }
        result
    }

    fn walk(&self, tokens: &[Spanned<Token>]) -> ParseResult {
        use ValidationErrorKind::*;

        let Some(first) = tokens.iter().position(|(t, _)| !t.is_whitespace()) else {
            return Err(ValidationError::new(EmptyInput));
        };
        if !tokens[first].0.is_number() {
            return Err(ValidationError::at(MustStartWithNumber, tokens[first].clone()));
        }

        let fail = |kind, index: usize| Err(ValidationError::at(kind, tokens[index].clone()));

        let mut quantities = Vec::new();
        let mut units_seen: Vec<usize> = Vec::new();
        // Number tokens read since the last unit word.
        let mut pending: Option<Range<usize>> = None;

        for (index, (token, _)) in tokens.iter().enumerate().skip(first) {
            match token {
                Token::Whitespace(_) => {}

                Token::Number(number) => match pending.as_mut() {
                    Some(group) => {
                        // Continuation of a digit group: only the first part may carry a
                        // sign and only the last a decimal point.
                        if number.has_sign() || has_fraction(&tokens[group.clone()]) {
                            return fail(MalformedNumber, index);
                        }
                        group.end = index + 1;
                    }
                    None => {
                        if self.mode == Mode::SingleUnit && !units_seen.is_empty() {
                            let next = tokens[index + 1..].iter().find(|(t, _)| !t.is_whitespace());
                            if !next.is_some_and(|(t, _)| t.is_word()) {
                                return fail(NumberAfterUnit, index);
                            }
                        }
                        pending = Some(index..index + 1);
                    }
                },

                Token::Word(word) => {
                    let Some(unit) = self.config.find(word) else {
                        return fail(UnknownUnit, index);
                    };
                    if units_seen.contains(&unit) {
                        return fail(DuplicateUnit, index);
                    }
                    match self.mode {
                        Mode::SingleUnit if !units_seen.is_empty() => {
                            return fail(MultipleUnitsNotAllowed, index);
                        }
                        Mode::MultiUnit if pending.is_none() => {
                            return fail(ConsecutiveUnits, index);
                        }
                        Mode::MultiUnit if units_seen.last().is_some_and(|&prev| unit >= prev) => {
                            return fail(UnitsOutOfOrder, index);
                        }
                        _ => {}
                    }
                    let Some(group) = pending.take() else {
                        return fail(ConsecutiveUnits, index);
                    };

                    quantities.push(Quantity {
                        value: join_group(tokens, group.clone())?,
                        unit,
                        number_tokens: group,
                        unit_token: Some(index),
                    });
                    units_seen.push(unit);
                }
            }
        }

        // A trailing number without a unit word takes the default unit.
        if let Some(group) = pending {
            let unit = self.default_unit;
            if units_seen.contains(&unit) {
                return fail(DuplicateUnit, group.start);
            }
            if units_seen.last().is_some_and(|&prev| unit >= prev) {
                return fail(UnitsOutOfOrder, group.start);
            }
            quantities.push(Quantity {
                value: join_group(tokens, group.clone())?,
                unit,
                number_tokens: group,
                unit_token: None,
            });
        }

        if let [only] = quantities.as_slice() {
            if only.unit == 0 && !only.value.is_whole() {
                return fail(FractionalSmallestUnitNotAllowed, only.number_tokens.start);
            }
        }

        let active_unit = quantities.last().map_or(self.default_unit, |q| q.unit);
        Ok(ValidParse { tokens: tokens.to_vec(), quantities, active_unit })
    }
}

/// Validates `tokens` using the configuration's default unit.
pub fn validate(tokens: &[Spanned<Token>], config: &UnitConfig, mode: Mode) -> ParseResult {
    Validator::new(config).mode(mode).validate(tokens)
}

fn has_fraction(tokens: &[Spanned<Token>]) -> bool {
    tokens.iter().any(|(t, _)| matches!(t, Token::Number(n) if n.fraction().is_some()))
}

/// Reads the number tokens in `group` as one number.
fn join_group(tokens: &[Spanned<Token>], group: Range<usize>) -> Result<NumberValue, ValidationError> {
    let start = group.start;
    let mut numbers = tokens[group].iter().filter_map(|(t, _)| match t {
        Token::Number(n) => Some(n),
        _ => None,
    });

    let first = numbers.next().cloned();
    let rest: String = numbers.map(|n| n.to_string()).collect();
    match first {
        Some(first) if rest.is_empty() => Ok(first),
        Some(first) => NumberValue::from_str(&format!("{}{}", first, rest)).map_err(|_| {
            ValidationError::at(ValidationErrorKind::MalformedNumber, tokens[start].clone())
        }),
        None => Err(ValidationError::at(ValidationErrorKind::MalformedNumber, tokens[start].clone())),
    }
}
