// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Quantity Input
//!
//! Validation and stepping for free-text quantity fields such as `"512 MB"` or
//! `"1h 20min"`, built on the [chumsky](https://github.com/zesterer/chumsky) parser
//! combinator library.
//!
//! ## Features
//!
//! * **Tokenizing** - Split any text into numbers, words and whitespace, keeping source spans.
//! * **Validation** - Check token sequences against a configurable unit table, in single-unit
//!   or multi-unit mode, with a precise error kind and the offending token.
//! * **Stepping** - Increment or decrement the active quantity, promoting to the next larger
//!   unit at its conversion threshold.
//! * **Format preservation** - Render a stepped value back into the user's own text, keeping
//!   digit grouping, fraction width and unit spelling.
//!
//! ## Usage
//!
//! ```rust
//! use quantity_input::{Direction, Mode, QuantityInput, UnitConfig, ValidationErrorKind};
//!
//! let field = QuantityInput::new(UnitConfig::durations()).mode(Mode::MultiUnit);
//!
//! let parse = field.validate("1h 20min").unwrap();
//! assert_eq!(parse.quantities().len(), 2);
//!
//! let err = field.validate("20min 1h").unwrap_err();
//! assert_eq!(err.kind(), ValidationErrorKind::UnitsOutOfOrder);
//!
//! let stepped = field.step("1h 20min", Direction::Increment).unwrap();
//! assert_eq!(stepped.text, "1h 21min");
//! ```
//!
//! ## Arbitrary-Precision Values
//!
//! Numbers are held as [`num_rational::BigRational`] alongside their original digits, so
//! stepping never overflows and never loses precision:
//!
//! ```rust
//! use quantity_input::{Direction, QuantityInput, UnitConfig};
//!
//! let field = QuantityInput::new(UnitConfig::binary_bytes());
//! let stepped = field.step("99999999999999999999999 TB", Direction::Increment).unwrap();
//! assert_eq!(stepped.text, "100000000000000000000000 TB");
//! ```

pub mod error;
pub mod grammar;
pub mod input;
pub mod number;
pub mod render;
pub mod stepper;
pub mod token;
pub mod units;

use chumsky::span::SimpleSpan;

/// A simple type alias for spans in the chumsky parser.
pub type Span = SimpleSpan;

/// A type representing a value along with its position in the source text.
pub type Spanned<T> = (T, Span);

// Re-export the public API
pub use error::{ValidationError, ValidationErrorKind};
pub use grammar::{validate, Mode, ParseResult, Quantity, ValidParse, Validator};
pub use input::{QuantityInput, Stepped};
pub use number::NumberValue;
pub use render::render;
pub use stepper::{step, Direction, Promotion, StepResult, Stepper};
pub use token::{tokenize, Token};
pub use units::{ConfigError, Unit, UnitConfig};
