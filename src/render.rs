// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Format Preservation
//!
//! Writes a [`StepResult`] back into the text the user typed, changing as little as
//! possible: whitespace inside a digit group stays in place counted from the right, the
//! fraction keeps its width, and unit words keep their spelling unless the unit changed.
//!
//! ```
//! use quantity_input::render::render;
//! use quantity_input::stepper::{step, Direction};
//! use quantity_input::{tokenize, validate, Mode, UnitConfig};
//!
//! let config = UnitConfig::binary_bytes();
//! let parse = validate(&tokenize("1 000  MiB"), &config, Mode::SingleUnit).unwrap();
//! let result = step(&parse, Direction::Increment, &config);
//!
//! assert_eq!(render(&parse, &result, &config), "1 001  MiB");
//! ```

use crate::grammar::ValidParse;
use crate::number::{to_decimal_string, NumberValue};
use crate::stepper::StepResult;
use crate::units::UnitConfig;
use num_rational::BigRational;

/// Renders `step` in the formatting of the text `parse` came from.
///
/// Unitless quantities stay unitless even when promoted; the caller tracks the selected
/// unit through [`StepResult::active_unit`].
pub fn render(parse: &ValidParse, step: &StepResult, config: &UnitConfig) -> String {
    let tokens = parse.tokens();
    let pairs: Vec<_> = parse.quantities().iter().zip(step.quantities()).collect();

    let mut out = String::new();
    let mut index = 0;
    while index < tokens.len() {
        if let Some((old, new)) = pairs.iter().find(|(old, _)| old.number_tokens().start == index) {
            let original: String =
                tokens[old.number_tokens()].iter().map(|(t, _)| t.text()).collect();
            if old.value() == new.value() {
                out.push_str(&original);
            } else {
                out.push_str(&regroup(&original, &format_like(new.value().as_rational(), old.value())));
            }
            index = old.number_tokens().end;
            continue;
        }

        let text = tokens[index].0.text();
        let renamed = pairs
            .iter()
            .find(|(old, new)| old.unit_token() == Some(index) && old.unit() != new.unit())
            .and_then(|(_, new)| config.unit(new.unit()));
        match renamed {
            Some(unit) => out.push_str(&match_case(&text, unit.name())),
            None => out.push_str(&text),
        }
        index += 1;
    }
    out
}

/// Formats `value` with the fraction width of `original`.
fn format_like(value: &BigRational, original: &NumberValue) -> String {
    let width = original.fraction().map_or(0, str::len);
    let mut text = to_decimal_string(value, width);
    if original.fraction() == Some("") && !text.contains('.') {
        text.push('.');
    }
    text
}

/// Writes `replacement` in the digit grouping of `original`. Only the integer digits are
/// regrouped; the sign goes in front of the group and the fraction after it.
fn regroup(original: &str, replacement: &str) -> String {
    let (negative, magnitude) = match replacement.strip_prefix('-') {
        Some(magnitude) => (true, magnitude),
        None => (false, replacement),
    };
    let original = original.trim_start_matches('-');
    let original_whole = original.split_once('.').map_or(original, |(whole, _)| whole);
    let (whole, fraction) = match magnitude.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (magnitude, None),
    };

    let mut out = String::with_capacity(original.len().max(replacement.len()));
    if negative {
        out.push('-');
    }
    out.push_str(&regroup_digits(original_whole, whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Lays the characters of `replacement` over `original` from the right, keeping
/// whitespace where it was. Whitespace left of the last replaced character is dropped and
/// surplus characters are prepended.
fn regroup_digits(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars().rev().peekable();
    let mut out: Vec<char> = Vec::with_capacity(original.len().max(replacement.len()));

    for c in original.chars().rev() {
        if c.is_whitespace() {
            if chars.peek().is_some() {
                out.push(c);
            }
        } else if let Some(r) = chars.next() {
            out.push(r);
        }
    }
    out.extend(chars);
    out.into_iter().rev().collect()
}

/// Writes `name` in the casing style of `original`.
fn match_case(original: &str, name: &str) -> String {
    let has_lower = original.chars().any(char::is_lowercase);
    let has_upper = original.chars().any(char::is_uppercase);
    match (has_lower, has_upper) {
        (true, false) => name.to_lowercase(),
        (false, true) => name.to_uppercase(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{validate, Mode, Validator};
    use crate::stepper::{step, Direction, Promotion, Stepper};
    use crate::token::tokenize;
    use crate::units::Unit;
    use test_case::test_case;

    fn step_text(input: &str, direction: Direction, stepper: Stepper, mode: Mode, config: &UnitConfig) -> String {
        let parse = validate(&tokenize(input), config, mode).expect("valid input");
        let result = stepper.step(&parse, direction, config);
        render(&parse, &result, config)
    }

    #[test_case("1 000", "1001", "1 001"; "group kept")]
    #[test_case("999", "1000", "1000"; "extra digit prepended")]
    #[test_case("1 000", "999", "999"; "leftover space dropped")]
    #[test_case("1 000.50", "1000.75", "1 000.75"; "fraction")]
    #[test_case("0815", "816", "816"; "leading zero replaced")]
    #[test_case("-1", "0", "0"; "sign dropped")]
    #[test_case("10 000 000", "10000001", "10 000 001"; "several groups")]
    #[test_case("-1 000", "-999", "-999"; "sign stays in front of shorter group")]
    #[test_case("1 000", "-500", "-500"; "sign added to shorter group")]
    #[test_case("-10 000", "-10001", "-10 001"; "sign kept with group")]
    #[test_case("1 000.5", "1000.75", "1 000.75"; "wider fraction keeps group")]
    #[test_case("1 000.", "1001.", "1 001."; "trailing point")]
    fn regroups_from_the_right(original: &str, replacement: &str, expected: &str) {
        assert_eq!(regroup(original, replacement), expected);
    }

    #[test_case("mb", "GB", "gb")]
    #[test_case("MB", "GB", "GB")]
    #[test_case("Mb", "GB", "GB")]
    #[test_case("min", "h", "h")]
    fn matches_case(original: &str, name: &str, expected: &str) {
        assert_eq!(match_case(original, name), expected);
    }

    #[test]
    fn keeps_unit_spelling() {
        let config = UnitConfig::binary_bytes();
        let text = step_text("512   Megabytes", Direction::Increment, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "513   Megabytes");
    }

    #[test]
    fn keeps_fraction_width() {
        let config = UnitConfig::builder()
            .unit(Unit::new("MB").threshold(1024))
            .unit(Unit::new("GB").step_rational(BigRational::new(1.into(), 4.into())).threshold(1024))
            .unit(Unit::new("TB"))
            .build()
            .unwrap();
        let text = step_text("1.50 GB", Direction::Increment, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "1.75 GB");
        let text = step_text("2. GB", Direction::Decrement, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "1.75 GB");
        let text = step_text("1. GB", Direction::Increment, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "1.25 GB");
    }

    #[test]
    fn keeps_trailing_point_for_whole_results() {
        let config = UnitConfig::binary_bytes();
        let text = step_text("5. kb", Direction::Increment, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "6. kb");
    }

    #[test]
    fn renames_promoted_unit() {
        let config = UnitConfig::binary_bytes();
        let carry = Stepper::new().promotion(Promotion::Carry);
        assert_eq!(step_text("1023 mb", Direction::Increment, carry, Mode::SingleUnit, &config), "1 gb");
        assert_eq!(step_text("1023MB", Direction::Increment, carry, Mode::SingleUnit, &config), "1GB");
        assert_eq!(
            step_text("1023 mb", Direction::Increment, Stepper::new(), Mode::SingleUnit, &config),
            "1023 gb"
        );
    }

    #[test]
    fn clamped_value_is_untouched() {
        let config = UnitConfig::binary_bytes();
        let text = step_text("0 B", Direction::Decrement, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "0 B");
        let text = step_text("00 B", Direction::Decrement, Stepper::new(), Mode::SingleUnit, &config);
        assert_eq!(text, "00 B");
    }

    #[test]
    fn multi_unit_only_rewrites_active_quantity() {
        let config = UnitConfig::durations();
        let text = step_text("1h  09min", Direction::Increment, Stepper::new(), Mode::MultiUnit, &config);
        assert_eq!(text, "1h  10min");

        let carry = Stepper::new().promotion(Promotion::Carry);
        let text = step_text("2 d 59 min", Direction::Increment, carry, Mode::MultiUnit, &config);
        assert_eq!(text, "2 d 1 h");
    }

    #[test]
    fn unitless_promotion_stays_unitless() {
        let config = UnitConfig::binary_bytes();
        let parse = validate(&tokenize("1023"), &config, Mode::SingleUnit).unwrap();
        let result = Stepper::new().promotion(Promotion::Carry).step(&parse, Direction::Increment, &config);
        assert_eq!(render(&parse, &result, &config), "1");
        assert_eq!(result.active_unit(), 3);

        let reparsed = Validator::new(&config)
            .default_unit(result.active_unit())
            .validate(&tokenize("1"))
            .unwrap();
        assert_eq!(reparsed.active_unit(), 3);
    }

    #[test]
    fn rendered_step_reparses_to_stepped_value() {
        let config = UnitConfig::binary_bytes();
        for input in ["1 000 mb", "7 KB", "0815 b", "1023 mb"] {
            let parse = validate(&tokenize(input), &config, Mode::SingleUnit).unwrap();
            let result = step(&parse, Direction::Increment, &config);
            let text = render(&parse, &result, &config);
            let reparsed = validate(&tokenize(&text), &config, Mode::SingleUnit).unwrap();
            assert_eq!(reparsed.quantities()[0].value(), result.quantities()[0].value(), "{}", text);
            assert_eq!(reparsed.active_unit(), result.active_unit(), "{}", text);
        }
    }
}
