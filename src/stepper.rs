// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Stepping
//!
//! Increments or decrements the active quantity of a [`ValidParse`] by its unit's step
//! size. When an increment reaches the unit's conversion threshold the quantity moves to
//! the next larger unit (a *promotion*), so `1023 MB` stepped up lands in `GB`.
//!
//! The stepper only accepts a [`ValidParse`]; invalid input has nothing to step.
//!
//! ```
//! use quantity_input::stepper::{step, Direction};
//! use quantity_input::{tokenize, validate, Mode, UnitConfig};
//!
//! let config = UnitConfig::binary_bytes();
//! let parse = validate(&tokenize("1023 mb"), &config, Mode::SingleUnit).unwrap();
//!
//! let result = step(&parse, Direction::Increment, &config);
//! assert!(result.unit_changed());
//! assert_eq!(config.units()[result.active_unit()].name(), "GB");
//! ```

use crate::grammar::{Quantity, ValidParse};
use crate::number::NumberValue;
use crate::units::UnitConfig;
use num::{Signed, Zero};
use num_rational::BigRational;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increment,
    Decrement,
}

/// What value a promoted quantity takes in the next larger unit.
///
/// With `n = 1023`, a step of `1` and a threshold of `1024`:
///
/// | rule                 | result   |
/// |----------------------|----------|
/// | `Remainder`          | 1023 GB  |
/// | `CandidateRemainder` | 0 GB     |
/// | `Carry`              | 1 GB     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Promotion {
    /// `n mod threshold`, using the value before the step.
    #[default]
    Remainder,

    /// `(n + step) mod threshold`.
    CandidateRemainder,

    /// `(n + step) / threshold`: the same amount expressed in the larger unit.
    Carry,
}

/// The quantities after one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    quantities: Vec<Quantity>,
    active_unit: usize,
    unit_changed: bool,
}

impl StepResult {
    /// All quantities; only the stepped one differs from the parse.
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// Unit of the stepped quantity after the step.
    pub fn active_unit(&self) -> usize {
        self.active_unit
    }

    pub fn active_quantity(&self) -> Option<&Quantity> {
        self.quantities.iter().find(|q| q.unit() == self.active_unit)
    }

    /// True when the step promoted the quantity to the next larger unit.
    pub fn unit_changed(&self) -> bool {
        self.unit_changed
    }

    fn unchanged(parse: &ValidParse) -> Self {
        StepResult {
            quantities: parse.quantities().to_vec(),
            active_unit: parse.active_unit(),
            unit_changed: false,
        }
    }
}

/// Configurable stepper.
///
/// By default promotions use [`Promotion::Remainder`] and decrements clamp at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stepper {
    promotion: Promotion,
    allow_negative: bool,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = promotion;
        self
    }

    /// Configure whether a decrement may go below zero.
    pub fn negative(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    /// Steps the active quantity of `parse` once in `direction`.
    ///
    /// `config` must be the configuration `parse` was validated with; if the active unit is
    /// not in `config` the parse is returned unchanged.
    pub fn step(&self, parse: &ValidParse, direction: Direction, config: &UnitConfig) -> StepResult {
        let quantities = parse.quantities();
        let Some(index) = quantities.iter().position(|q| q.unit() == parse.active_unit()) else {
            return StepResult::unchanged(parse);
        };
        let current = &quantities[index];
        let u = current.unit();
        let Some(unit) = config.unit(u) else {
            tracing::warn!(unit = u, "active unit is not configured; not stepping");
            return StepResult::unchanged(parse);
        };

        let n = current.value().as_rational();
        let candidate = match direction {
            Direction::Increment => n + unit.step_size(),
            Direction::Decrement => n - unit.step_size(),
        };

        // Promoting into a unit the expression already uses would duplicate it.
        let target_free = !quantities.iter().any(|q| q.unit() == u + 1);
        let threshold = unit.conversion_threshold().filter(|_| u < config.largest());

        if let Some(threshold) = threshold {
            if n < threshold && &candidate >= threshold {
                if target_free {
                    let value = match self.promotion {
                        Promotion::Remainder => n % threshold,
                        Promotion::CandidateRemainder => &candidate % threshold,
                        Promotion::Carry => &candidate / threshold,
                    };
                    tracing::debug!(
                        from = unit.name(),
                        to = config.units()[u + 1].name(),
                        value = %value,
                        rule = ?self.promotion,
                        "promoted quantity"
                    );
                    return replace(quantities, index, value, u + 1, true);
                }
                tracing::trace!(unit = unit.name(), "next unit already present; not promoting");
            }
        }

        let mut value = candidate;
        if !self.allow_negative {
            let floor = if n.is_negative() { n.clone() } else { BigRational::zero() };
            if value < floor {
                tracing::debug!(unit = unit.name(), floor = %floor, "clamped decrement");
                value = floor;
            }
        }
        replace(quantities, index, value, u, false)
    }
}

/// Steps with the default [`Stepper`] configuration.
pub fn step(parse: &ValidParse, direction: Direction, config: &UnitConfig) -> StepResult {
    Stepper::new().step(parse, direction, config)
}

fn replace(
    quantities: &[Quantity],
    index: usize,
    value: BigRational,
    unit: usize,
    unit_changed: bool,
) -> StepResult {
    let mut quantities = quantities.to_vec();
    quantities[index] = quantities[index].replaced(NumberValue::new_computed(value), unit);
    StepResult { quantities, active_unit: unit, unit_changed }
}
