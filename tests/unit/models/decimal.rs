//! Unit tests for fixed-precision helpers

use nepse_pulse::models::decimal::{parse_number, round_to, to_fixed};
use nepse_pulse::models::prediction::{ModelWeights, PredictionReason};

#[test]
fn exact_midpoints_round_away_from_zero() {
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(-0.125, 2), -0.13);
    assert_eq!(to_fixed(0.375, 2), "0.38");
    assert_eq!(to_fixed(2.5, 0), "3");
    assert_eq!(round_to(63.04, 1), 63.0);
}

#[test]
fn stored_binary_value_decides_inexact_midpoints() {
    // 0.015, 0.105 and 1.005 are all stored slightly below the midpoint
    assert_eq!(to_fixed(0.015, 2), "0.01");
    assert_eq!(round_to(0.015, 2), 0.01);
    assert_eq!(to_fixed(0.105, 2), "0.10");
    assert_eq!(to_fixed(1.005, 2), "1.00");
    assert_eq!(to_fixed(-0.015, 2), "-0.01");
    // 0.035 is stored slightly above
    assert_eq!(to_fixed(0.035, 2), "0.04");
}

#[test]
fn negative_zero_collapses() {
    let value = round_to(-0.001, 2);
    assert_eq!(value, 0.0);
    assert!(value.is_sign_positive());
    assert_eq!(to_fixed(-0.001, 2), "0.00");
}

#[test]
fn to_fixed_pads_decimals() {
    assert_eq!(to_fixed(9.090909, 2), "9.09");
    assert_eq!(to_fixed(63.0, 1), "63.0");
    assert_eq!(to_fixed(1.0, 2), "1.00");
}

#[test]
fn parse_number_handles_thousands_separators() {
    assert_eq!(parse_number("1,234.50"), Some(1234.5));
    assert_eq!(parse_number(" 42 "), Some(42.0));
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number("inf"), None);
    assert_eq!(parse_number(""), None);
}

#[test]
fn reason_components_serialize_as_two_decimal_strings() {
    let reason = PredictionReason {
        momentum: 1.0,
        volume: 0.5,
        sector: -0.25,
        weights: ModelWeights::default(),
        note: None,
        holiday_effect: false,
    };
    let json = serde_json::to_value(&reason).unwrap();
    assert_eq!(json["momentum"], "1.00");
    assert_eq!(json["volume"], "0.50");
    assert_eq!(json["sector"], "-0.25");
    assert_eq!(json["holidayEffect"], false);
    assert!(json.get("note").is_none());
}

#[test]
fn reason_accepts_numbers_or_text() {
    let reason: PredictionReason =
        serde_json::from_str(r#"{"momentum":"0.50","volume":0.25,"sector":"-1.00"}"#).unwrap();
    assert_eq!(reason.momentum, 0.5);
    assert_eq!(reason.volume, 0.25);
    assert_eq!(reason.sector, -1.0);
    assert_eq!(reason.weights, ModelWeights::default());
}
