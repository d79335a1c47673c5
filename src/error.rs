// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Validation errors for quantity expressions.
//!
//! Every malformed input is a value of [`ValidationError`], never a panic. The messages on
//! [`ValidationErrorKind`] are English defaults; user interfaces are expected to map the
//! kind to their own localized text.

use crate::token::Token;
use crate::{Span, Spanned};
use ariadne::{Config, Label, Report, ReportKind, Source};

/// Why a quantity expression was rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    #[error("please enter a value")]
    EmptyInput,

    #[error("the value must start with a number")]
    MustStartWithNumber,

    #[error("unknown unit")]
    UnknownUnit,

    #[error("each unit may only be used once")]
    DuplicateUnit,

    #[error("only one unit is allowed")]
    MultipleUnitsNotAllowed,

    #[error("every unit needs a number before it")]
    ConsecutiveUnits,

    #[error("units must go from largest to smallest")]
    UnitsOutOfOrder,

    #[error("a number after the unit is not allowed")]
    NumberAfterUnit,

    #[error("please use non-decimals with the smallest unit")]
    FractionalSmallestUnitNotAllowed,

    #[error("malformed number")]
    MalformedNumber,
}

/// A rejected quantity expression: the reason plus the token that triggered it, if any.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ValidationError {
    kind: ValidationErrorKind,
    token: Option<Spanned<Token>>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        ValidationError { kind, token: None }
    }

    pub fn at(kind: ValidationErrorKind, token: Spanned<Token>) -> Self {
        ValidationError { kind, token: Some(token) }
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// The offending token and where it sits in the input.
    pub fn token(&self) -> Option<&Spanned<Token>> {
        self.token.as_ref()
    }

    pub fn span(&self) -> Option<Span> {
        self.token.as_ref().map(|(_, span)| *span)
    }

    /// Renders a plain-text diagnostic for `input` pointing at the offending token. Errors
    /// without a token render as their message alone.
    ///
    /// ```
    /// use quantity_input::{validate, tokenize, Mode, UnitConfig};
    ///
    /// let input = "5 xyz";
    /// let err = validate(&tokenize(input), &UnitConfig::binary_bytes(), Mode::SingleUnit)
    ///     .unwrap_err();
    /// let report = err.report("field", input);
    /// assert!(report.contains("unknown unit"));
    /// assert!(report.contains("xyz"));
    /// ```
    pub fn report(&self, source_id: &str, input: &str) -> String {
        let Some((token, span)) = &self.token else {
            return self.to_string();
        };
        let range = span.into_range();

        let mut out = Vec::new();
        let written = Report::build(ReportKind::Error, (source_id, range.clone()))
            .with_config(Config::default().with_color(false))
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((source_id, range))
                    .with_message(format!("{:?} is not allowed here", token.text())),
            )
            .finish()
            .write((source_id, Source::from(input)), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::span::SimpleSpan;

    #[test]
    fn test_display_uses_kind_message() {
        let err = ValidationError::new(ValidationErrorKind::EmptyInput);
        assert_eq!(err.to_string(), "please enter a value");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_span_comes_from_token() {
        let err = ValidationError::at(
            ValidationErrorKind::UnknownUnit,
            (Token::Word("xyz".to_string()), SimpleSpan::from(2..5)),
        );
        assert_eq!(err.span().map(|s| s.into_range()), Some(2..5));
        assert_eq!(err.kind(), ValidationErrorKind::UnknownUnit);
    }

    #[test]
    fn test_report_without_token() {
        let err = ValidationError::new(ValidationErrorKind::EmptyInput);
        let report = err.report("input", "");
        assert!(report.contains("please enter a value"), "{}", report);
    }

    #[test]
    fn test_report_labels_token() {
        let err = ValidationError::at(
            ValidationErrorKind::MultipleUnitsNotAllowed,
            (Token::Word("gb".to_string()), SimpleSpan::from(5..7)),
        );
        let report = err.report("input", "5 mb gb");
        assert!(report.contains("only one unit is allowed"), "{}", report);
        assert!(report.contains("\"gb\" is not allowed here"), "{}", report);
    }
}
