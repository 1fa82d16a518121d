//! Fixed-precision rounding and the text encoding used on the wire

use serde::{Deserialize, Deserializer};

/// Extra digits inspected when deciding whether a value sits exactly on a rounding midpoint
const MIDPOINT_PROBE_DIGITS: usize = 25;

/// Round to `places` decimals the way `to_fixed` prints it
pub fn round_to(value: f64, places: usize) -> f64 {
    to_fixed(value, places).parse::<f64>().map(|v| v + 0.0).unwrap_or(value)
}

/// Fixed-point text of the exact binary value.
///
/// Inexact midpoints round by the digits actually stored (`0.015` is below
/// its midpoint and prints `0.01`); exact midpoints round away from zero.
/// A result that prints as zero carries no sign.
pub fn to_fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut magnitude = value.abs();
    if is_exact_midpoint(magnitude, places) {
        // Nudge one ulp up so the half-even formatter picks the upper neighbour
        magnitude = f64::from_bits(magnitude.to_bits() + 1);
    }
    let digits = format!("{:.*}", places, magnitude);
    if value.is_sign_negative() && digits.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn is_exact_midpoint(magnitude: f64, places: usize) -> bool {
    let wide = format!("{:.*}", places + MIDPOINT_PROBE_DIGITS, magnitude);
    let Some((_, fraction)) = wide.split_once('.') else {
        return false;
    };
    let tail = &fraction[places..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Parse a number that may arrive as text ("1,234.50") or as a JSON number
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn deserialize_flexible<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => parse_number(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("not a number: '{}'", text))),
    }
}

macro_rules! fixed_module {
    ($name:ident, $places:expr) => {
        pub mod $name {
            use serde::{Deserializer, Serializer};

            pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&super::to_fixed(*value, $places))
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
                super::deserialize_flexible(deserializer)
            }
        }
    };
}

fixed_module!(fixed1, 1);
fixed_module!(fixed2, 2);
