// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Quantity Input
//!
//! [`QuantityInput`] bundles a [`UnitConfig`], a [`Mode`] and a [`Stepper`] into the
//! pipeline behind a quantity text field: tokenize, validate, and on an arrow key step and
//! render back into the user's formatting. It keeps no state between calls; the caller owns
//! the display string and the currently selected unit.
//!
//! ```
//! use quantity_input::{Direction, QuantityInput, UnitConfig};
//!
//! let field = QuantityInput::new(UnitConfig::binary_bytes());
//!
//! assert!(field.validate("512 MB").is_ok());
//! assert!(field.validate("512 lightyears").is_err());
//!
//! let stepped = field.step("1 000 mb", Direction::Increment).unwrap();
//! assert_eq!(stepped.text, "1 001 mb");
//! ```

use crate::error::ValidationError;
use crate::grammar::{Mode, ParseResult, ValidParse, Validator};
use crate::render::render;
use crate::stepper::{Direction, StepResult, Stepper};
use crate::token::tokenize;
use crate::units::UnitConfig;

/// The outcome of stepping a display string.
#[derive(Debug, Clone, PartialEq)]
pub struct Stepped {
    pub result: StepResult,

    /// The display string after the step, in the formatting of the input.
    pub text: String,
}

/// Validates and steps quantity expressions against one unit configuration.
#[derive(Debug, Clone)]
pub struct QuantityInput {
    config: UnitConfig,
    mode: Mode,
    stepper: Stepper,
}

impl QuantityInput {
    pub fn new(config: UnitConfig) -> Self {
        QuantityInput { config, mode: Mode::default(), stepper: Stepper::default() }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the stepping options.
    pub fn stepper(mut self, stepper: Stepper) -> Self {
        self.stepper = stepper;
        self
    }

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Validates `input`, binding a unitless number to the configured default unit.
    pub fn validate(&self, input: &str) -> ParseResult {
        self.validator().validate(&tokenize(input))
    }

    /// Validates `input`, binding a unitless number to `default_unit`.
    pub fn validate_with_unit(&self, input: &str, default_unit: usize) -> ParseResult {
        self.validator().default_unit(default_unit).validate(&tokenize(input))
    }

    /// Steps `input` once. Invalid input is returned as its validation error.
    pub fn step(&self, input: &str, direction: Direction) -> Result<Stepped, ValidationError> {
        Ok(self.step_parse(self.validate(input)?, direction))
    }

    /// Like [`QuantityInput::step`], with unitless input bound to `default_unit`.
    pub fn step_with_unit(
        &self,
        input: &str,
        default_unit: usize,
        direction: Direction,
    ) -> Result<Stepped, ValidationError> {
        Ok(self.step_parse(self.validate_with_unit(input, default_unit)?, direction))
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(&self.config).mode(self.mode)
    }

    fn step_parse(&self, parse: ValidParse, direction: Direction) -> Stepped {
        let result = self.stepper.step(&parse, direction, &self.config);
        let text = render(&parse, &result, &self.config);
        Stepped { result, text }
    }
}
