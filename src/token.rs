// Copyright 2025 Asim Ihsan
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! # Tokenizer
//!
//! Splits free text from a quantity field into numbers, words and whitespace. The tokenizer
//! never rejects input: any character that is not part of a number, a word or a whitespace
//! run becomes a one-character [`Token::Word`], which the grammar validator then reports as
//! an unknown unit instead of silently dropping it.
//!
//! ```
//! use quantity_input::token::{tokenize, Token};
//!
//! let tokens = tokenize("512 mb");
//! assert_eq!(tokens.len(), 3);
//! assert!(matches!(&tokens[0].0, Token::Number(n) if n.to_string() == "512"));
//! assert_eq!(tokens[1].0, Token::Whitespace(" ".to_string()));
//! assert_eq!(tokens[2].0, Token::Word("mb".to_string()));
//! assert_eq!(tokens[2].1.into_range(), 4..6);
//! ```

use crate::number::{NumberParserBuilder, NumberValue};
use crate::Spanned;
use chumsky::{error::Rich, prelude::*};

/// A lexical token of a quantity expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A signed decimal literal.
    Number(NumberValue),

    /// A run of alphabetic characters, or a single character of anything else.
    Word(String),

    /// A run of whitespace, kept verbatim so the display string can be rebuilt.
    Whitespace(String),
}

impl Token {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Number(_))
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }

    /// The token's source text.
    pub fn text(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Word(s) | Token::Whitespace(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Word(s) | Token::Whitespace(s) => write!(f, "{}", s),
        }
    }
}

/// Builds the tokenizer parser.
///
/// The last alternative accepts any single character, so the parser consumes every input.
pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Spanned<Token>>, extra::Err<Rich<'a, char>>> {
    let number = NumberParserBuilder::new()
        .negative(true)
        .fractional(true)
        .build()
        .map(Token::Number);

    let word = any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Word(s.to_string()));

    let whitespace = any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Whitespace(s.to_string()));

    let other = any().map(|c: char| Token::Word(c.to_string()));

    choice((number, word, whitespace, other))
        .map_with(|token, e| (token, e.span()))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Tokenizes `input`. Total: every input yields a (possibly empty) token sequence whose
/// texts concatenate back to `input`.
pub fn tokenize(input: &str) -> Vec<Spanned<Token>> {
    let tokens = lexer().parse(input).into_output().unwrap_or_default();
    tracing::trace!(input, tokens = tokens.len(), "tokenized quantity input");
    tokens
}
