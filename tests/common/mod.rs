use quantity_input::{tokenize, Mode, ParseResult, UnitConfig, Validator};

/// Tokenize and validate `input` against `config`.
#[allow(dead_code)]
pub fn parse(input: &str, config: &UnitConfig, mode: Mode) -> ParseResult {
    Validator::new(config).mode(mode).validate(&tokenize(input))
}

/// Names of the units of every quantity in a successful parse, in written order.
#[allow(dead_code)]
pub fn unit_names(input: &str, config: &UnitConfig, mode: Mode) -> Vec<String> {
    let parse = parse(input, config, mode).expect("valid input");
    parse
        .quantities()
        .iter()
        .map(|q| config.units()[q.unit()].name().to_string())
        .collect()
}

// -------------------------------------------------------------------------------------------------
// Macro helpers used by many test modules so we keep them in a common place.
// -------------------------------------------------------------------------------------------------

/// Assert that `src` is accepted.
///
/// Example:
/// ```
/// assert_valid!("512 mb", &UnitConfig::binary_bytes(), Mode::SingleUnit);
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($src:expr, $config:expr, $mode:expr $(,)?) => {{
        let result = common::parse($src, $config, $mode);
        assert!(result.is_ok(), "expected {:?} to be valid, got {:?}", $src, result.err());
    }};
}

/// Assert that `src` is rejected with `kind`, optionally at the token with text `at`.
#[macro_export]
macro_rules! assert_rejects {
    ($src:expr, $config:expr, $mode:expr, $kind:expr $(,)?) => {{
        let err = common::parse($src, $config, $mode).expect_err("expected a rejection");
        assert_eq!(err.kind(), $kind, "on input {:?}", $src);
        err
    }};
    ($src:expr, $config:expr, $mode:expr, $kind:expr, at = $at:expr $(,)?) => {{
        let err = assert_rejects!($src, $config, $mode, $kind);
        let text = err.token().map(|(token, _)| token.text());
        assert_eq!(text.as_deref(), Some($at), "on input {:?}", $src);
        err
    }};
}
