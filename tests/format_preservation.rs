use bon::Builder;
use num_bigint::BigInt;
use num_rational::BigRational;
use quantity_input::{render, Direction, Mode, Promotion, QuantityInput, Stepper, Unit, UnitConfig};
use rstest::rstest;
mod common;
use common::parse;

#[derive(Debug, Builder)]
struct RenderCase {
    input: &'static str,
    expected: &'static str,
    #[builder(default = Direction::Increment)]
    direction: Direction,
    #[builder(default = Promotion::Carry)]
    promotion: Promotion,
}

#[rstest]
#[case(RenderCase::builder().input("1 000 mb").expected("1 001 mb").build())]
#[case(RenderCase::builder().input("1 000 mb").direction(Direction::Decrement).expected("999 mb").build())]
#[case(RenderCase::builder().input("999 999 kb").expected("1000 000 kb").build())]
#[case(RenderCase::builder().input("   9 MB   ").expected("   10 MB   ").build())]
#[case(RenderCase::builder().input("0815 KB").expected("816 KB").build())]
#[case(RenderCase::builder().input("2.50 gb").expected("3.50 gb").build())]
#[case(RenderCase::builder().input("7.\tMegabytes").expected("8.\tMegabytes").build())]
#[case(RenderCase::builder().input("1023 Mb").expected("1 GB").build())]
#[case(RenderCase::builder().input("1023 MB").expected("1 GB").build())]
#[case(RenderCase::builder().input("1023 megabytes").expected("1 gb").build())]
#[case(RenderCase::builder().input("-1 000 mb").expected("-999 mb").build())]
#[case(RenderCase::builder().input("-10 000 mb").expected("-9 999 mb").build())]
#[case(RenderCase::builder().input("1023mb").promotion(Promotion::Remainder).expected("1023gb").build())]
fn renders_in_original_format(#[case] c: RenderCase) {
    let config = UnitConfig::binary_bytes();
    let parsed = parse(c.input, &config, Mode::SingleUnit).expect("valid input");
    let result = Stepper::new().promotion(c.promotion).step(&parsed, c.direction, &config);

    assert_eq!(render(&parsed, &result, &config), c.expected);
}

#[rstest]
#[case("1 d 23 h 5 min", "1 d 23 h 6 min")]
#[case("1d  2h   59min", "1d  2h   60min")]
#[case("2 d 59 min", "2 d 1 h")]
#[case("1 h 30", "1 h 31")]
fn renders_multi_unit(#[case] input: &str, #[case] expected: &str) {
    let config = UnitConfig::durations();
    let parsed = parse(input, &config, Mode::MultiUnit).expect("valid input");
    let result = Stepper::new().promotion(Promotion::Carry).step(&parsed, Direction::Increment, &config);

    assert_eq!(render(&parsed, &result, &config), expected);
}

#[test]
fn untouched_quantities_keep_their_text() {
    let config = UnitConfig::durations();
    let input = "01 H 0020 Min";
    let parsed = parse(input, &config, Mode::MultiUnit).unwrap();
    let result = Stepper::new().step(&parsed, Direction::Decrement, &config);
    assert_eq!(render(&parsed, &result, &config), "01 H 19 Min");
}

#[test]
fn negative_result_keeps_sign_in_front() {
    let field = QuantityInput::new(UnitConfig::binary_bytes());
    let stepped = field.step("-1 000 mb", Direction::Increment).unwrap();
    assert_eq!(stepped.text, "-999 mb");
    assert!(field.validate(&stepped.text).is_ok());

    let config = UnitConfig::builder()
        .unit(Unit::new("s").step(1500).threshold(60))
        .unit(Unit::new("min"))
        .build()
        .unwrap();
    let field = QuantityInput::new(config).stepper(Stepper::new().negative(true));
    let stepped = field.step("1 000 s", Direction::Decrement).unwrap();
    assert_eq!(stepped.text, "-500 s");
    let reparsed = field.validate(&stepped.text).unwrap();
    assert_eq!(reparsed.quantities()[0].value().to_rational(), BigRational::from_integer(BigInt::from(-500)));
}

#[test]
fn wider_fraction_keeps_digit_group() {
    let config = UnitConfig::builder()
        .unit(Unit::new("B").threshold(1024))
        .unit(Unit::new("KB").step_rational(BigRational::new(BigInt::from(1), BigInt::from(4))).threshold(1024))
        .unit(Unit::new("MB"))
        .build()
        .unwrap();
    let field = QuantityInput::new(config);
    let stepped = field.step("1 000.5 KB", Direction::Increment).unwrap();
    assert_eq!(stepped.text, "1 000.75 KB");

    let reparsed = field.validate(&stepped.text).unwrap();
    assert_eq!(
        reparsed.quantities()[0].value().to_rational(),
        BigRational::new(BigInt::from(4003), BigInt::from(4))
    );
}
