// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Unit Configuration
//!
//! A [`UnitConfig`] is an ordered table of units, smallest magnitude first. Each unit knows
//! the words that name it, how far one step moves the number while it is selected, and the
//! value at which a quantity promotes to the next larger unit.
//!
//! The size of unit `u + 1` is defined as `scale(u) * threshold(u)`, so promoting at the
//! threshold and demoting by `1 / threshold` are inverses by construction.
//!
//! ## Examples
//!
//! ```
//! use quantity_input::units::{Unit, UnitConfig};
//!
//! let config = UnitConfig::builder()
//!     .unit(Unit::new("s").aliases(["sec", "seconds"]).step(5).threshold(60))
//!     .unit(Unit::new("min").aliases(["minutes"]).step(1).threshold(60))
//!     .unit(Unit::new("h").aliases(["hours"]))
//!     .default_unit("min")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.find("SEC"), Some(0));
//! assert_eq!(config.find("Hours"), Some(2));
//! assert_eq!(config.default_unit(), 1);
//! ```
//!
//! Configurations can also be loaded from TOML:
//!
//! ```
//! use quantity_input::units::UnitConfig;
//!
//! let config = UnitConfig::from_toml_str(r#"
//!     default_unit = "KB"
//!
//!     [[units]]
//!     name = "B"
//!     step_size = 1
//!     conversion_threshold = 1024
//!
//!     [[units]]
//!     name = "KB"
//!     aliases = ["kib", "kilobytes"]
//!     step_size = "0.5"
//! "#).unwrap();
//!
//! assert_eq!(config.len(), 2);
//! assert_eq!(config.find("kilobytes"), Some(1));
//! ```

use crate::number::NumberValue;
use num::{One, Signed};
use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Deserialize;
use std::str::FromStr;

/// Errors raised while building or loading a [`UnitConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("a unit configuration needs at least one unit")]
    Empty,

    #[error("unit {unit:?} has a non-positive step size")]
    NonPositiveStep { unit: String },

    #[error("unit {unit:?} needs a positive conversion threshold to promote to {next:?}")]
    MissingThreshold { unit: String, next: String },

    #[error("alias {alias:?} names both {first:?} and {second:?}")]
    AmbiguousAlias { alias: String, first: String, second: String },

    #[error("default unit {0:?} is not a configured unit")]
    UnknownDefault(String),

    #[error("invalid number in unit {unit:?}: {source}")]
    Number {
        unit: String,
        #[source]
        source: crate::number::NumberError,
    },

    #[error("failed to parse unit configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A single unit descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    name: String,
    aliases: Vec<String>,
    step: BigRational,
    threshold: Option<BigRational>,
}

impl Unit {
    /// Creates a unit with a step of one and no threshold.
    ///
    /// The name itself always matches, case-insensitively.
    pub fn new(name: impl Into<String>) -> Self {
        Unit {
            name: name.into(),
            aliases: Vec::new(),
            step: BigRational::one(),
            threshold: None,
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn step<T: Into<BigInt>>(self, step: T) -> Self {
        self.step_rational(BigRational::from_integer(step.into()))
    }

    pub fn step_rational(mut self, step: BigRational) -> Self {
        self.step = step;
        self
    }

    /// Value at which a quantity in this unit promotes to the next larger unit.
    pub fn threshold<T: Into<BigInt>>(self, threshold: T) -> Self {
        self.threshold_rational(BigRational::from_integer(threshold.into()))
    }

    pub fn threshold_rational(mut self, threshold: BigRational) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// The canonical display form.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn step_size(&self) -> &BigRational {
        &self.step
    }

    pub fn conversion_threshold(&self) -> Option<&BigRational> {
        self.threshold.as_ref()
    }

    /// Case-insensitive match against the name and every alias.
    pub fn matches(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.name.to_lowercase() == word || self.aliases.iter().any(|a| a.to_lowercase() == word)
    }
}

/// An ordered, validated table of units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConfig {
    units: Vec<Unit>,
    default_unit: usize,
}

impl UnitConfig {
    pub fn builder() -> UnitConfigBuilder {
        UnitConfigBuilder::default()
    }

    /// Bytes with binary multiples: B, KB, MB, GB, TB, promoting at 1024. Defaults to MB.
    pub fn binary_bytes() -> Self {
        Self::bytes(1024)
    }

    /// Bytes with decimal multiples: B, KB, MB, GB, TB, promoting at 1000. Defaults to MB.
    pub fn decimal_bytes() -> Self {
        Self::bytes(1000)
    }

    fn bytes(threshold: u32) -> Self {
        let units = vec![
            Unit::new("B").aliases(["byte", "bytes"]).threshold(threshold),
            Unit::new("KB").aliases(["k", "kib", "kilobyte", "kilobytes"]).threshold(threshold),
            Unit::new("MB").aliases(["m", "mib", "megabyte", "megabytes"]).threshold(threshold),
            Unit::new("GB").aliases(["g", "gib", "gigabyte", "gigabytes"]).threshold(threshold),
            Unit::new("TB").aliases(["t", "tib", "terabyte", "terabytes"]),
        ];
        UnitConfig { units, default_unit: 2 }
    }

    /// Durations: ms, s, min, h, d. Defaults to min.
    pub fn durations() -> Self {
        let units = vec![
            Unit::new("ms").aliases(["millis", "millisecond", "milliseconds"]).threshold(1000),
            Unit::new("s").aliases(["sec", "secs", "second", "seconds"]).threshold(60),
            Unit::new("min").aliases(["mins", "minute", "minutes"]).threshold(60),
            Unit::new("h").aliases(["hr", "hrs", "hour", "hours"]).threshold(24),
            Unit::new("d").aliases(["day", "days"]),
        ];
        UnitConfig { units, default_unit: 2 }
    }

    /// Loads a configuration from TOML.
    ///
    /// Numbers may be TOML integers, floats, or decimal strings (`"0.5"`); strings avoid
    /// binary floating point rounding.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;

        let mut builder = UnitConfig::builder();
        for raw_unit in raw.units {
            let mut unit = Unit::new(raw_unit.name.clone()).aliases(raw_unit.aliases);
            if let Some(step) = raw_unit.step_size {
                unit = unit.step_rational(step.to_rational(&raw_unit.name)?);
            }
            if let Some(threshold) = raw_unit.conversion_threshold {
                unit = unit.threshold_rational(threshold.to_rational(&raw_unit.name)?);
            }
            builder = builder.unit(unit);
        }
        if let Some(default_unit) = raw.default_unit {
            builder = builder.default_unit(default_unit);
        }
        builder.build()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false for a built configuration.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Index of the largest unit.
    pub fn largest(&self) -> usize {
        self.units.len().saturating_sub(1)
    }

    /// Index of the unit bound to unitless input.
    pub fn default_unit(&self) -> usize {
        self.default_unit
    }

    /// Resolves a word to a unit index, case-insensitively across all aliases.
    pub fn find(&self, word: &str) -> Option<usize> {
        self.units.iter().position(|u| u.matches(word))
    }

    /// Size of one `unit` expressed in the smallest unit.
    pub fn scale(&self, unit: usize) -> BigRational {
        self.units
            .iter()
            .take(unit)
            .filter_map(|u| u.threshold.clone())
            .fold(BigRational::one(), |acc, t| acc * t)
    }

    /// Converts `value` from one unit to another.
    pub fn convert(&self, value: &BigRational, from: usize, to: usize) -> BigRational {
        value * self.scale(from) / self.scale(to)
    }
}

/// Builder for [`UnitConfig`]; units are added smallest first.
#[derive(Debug, Default, Clone)]
pub struct UnitConfigBuilder {
    units: Vec<Unit>,
    default_unit: Option<String>,
}

impl UnitConfigBuilder {
    pub fn unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Name (or alias) of the unit bound to unitless input. Defaults to the smallest unit.
    pub fn default_unit(mut self, name: impl Into<String>) -> Self {
        self.default_unit = Some(name.into());
        self
    }

    pub fn build(self) -> Result<UnitConfig, ConfigError> {
        if self.units.is_empty() {
            return Err(ConfigError::Empty);
        }

        for (index, unit) in self.units.iter().enumerate() {
            if !unit.step.is_positive() {
                return Err(ConfigError::NonPositiveStep { unit: unit.name.clone() });
            }
            if let Some(next) = self.units.get(index + 1) {
                if !unit.threshold.as_ref().is_some_and(|t| t.is_positive()) {
                    return Err(ConfigError::MissingThreshold {
                        unit: unit.name.clone(),
                        next: next.name.clone(),
                    });
                }
            }
        }

        for (index, unit) in self.units.iter().enumerate() {
            let words = std::iter::once(&unit.name).chain(unit.aliases.iter());
            for word in words {
                if let Some(other) = self.units[index + 1..].iter().find(|u| u.matches(word)) {
                    return Err(ConfigError::AmbiguousAlias {
                        alias: word.clone(),
                        first: unit.name.clone(),
                        second: other.name.clone(),
                    });
                }
            }
        }

        let default_unit = match self.default_unit {
            Some(name) => self
                .units
                .iter()
                .position(|u| u.matches(&name))
                .ok_or(ConfigError::UnknownDefault(name))?,
            None => 0,
        };

        Ok(UnitConfig { units: self.units, default_unit })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    default_unit: Option<String>,
    units: Vec<RawUnit>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnit {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    step_size: Option<RawNumber>,
    conversion_threshold: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn to_rational(&self, unit: &str) -> Result<BigRational, ConfigError> {
        let text = match self {
            RawNumber::Integer(i) => return Ok(BigRational::from_integer(BigInt::from(*i))),
            RawNumber::Float(f) => f.to_string(),
            RawNumber::Text(s) => s.trim().to_string(),
        };
        NumberValue::from_str(&text)
            .map(|n| n.to_rational())
            .map_err(|source| ConfigError::Number { unit: unit.to_string(), source })
    }
}
