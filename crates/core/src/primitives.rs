//! Scalar decoders.
//!
//! None of these coerce: `"42"` is not a number, `1.5` is not an integer
//! and `"true"` is not a boolean. Numbers are compared by value, so `1.0`
//! is the integer `1`.

use serde_json::{Number, Value};

use crate::decoder::{Context, Decoder, Halt};
use crate::shape::Shape;

/// Accepts JSON strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDecoder;

/// Accepts any JSON number as `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberDecoder;

/// Accepts integral JSON numbers that fit in an `i64`, including ones
/// written with a fraction part such as `3.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerDecoder;

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDecoder;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullDecoder;

/// Accepts everything and hands the raw value back.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyDecoder;

/// Accepts exactly one JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralDecoder(Value);

pub fn string() -> StringDecoder {
    StringDecoder
}

pub fn number() -> NumberDecoder {
    NumberDecoder
}

pub fn integer() -> IntegerDecoder {
    IntegerDecoder
}

pub fn boolean() -> BooleanDecoder {
    BooleanDecoder
}

pub fn null() -> NullDecoder {
    NullDecoder
}

/// The explicit opt-out: use only where the value is passed through
/// without being inspected.
pub fn any() -> AnyDecoder {
    AnyDecoder
}

pub fn literal(value: impl Into<Value>) -> LiteralDecoder {
    LiteralDecoder(value.into())
}

impl Decoder for StringDecoder {
    type Output = String;

    fn shape(&self) -> Shape {
        Shape::String
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<String, Halt> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(cx.mismatch("string", other)),
        }
    }
}

impl Decoder for NumberDecoder {
    type Output = f64;

    fn shape(&self) -> Shape {
        Shape::Number
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<f64, Halt> {
        value
            .as_f64()
            .ok_or_else(|| cx.mismatch("number", value))
    }
}

impl Decoder for IntegerDecoder {
    type Output = i64;

    fn shape(&self) -> Shape {
        Shape::Integer
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<i64, Halt> {
        as_integer(value).ok_or_else(|| cx.mismatch("integer", value))
    }
}

impl Decoder for BooleanDecoder {
    type Output = bool;

    fn shape(&self) -> Shape {
        Shape::Boolean
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<bool, Halt> {
        value
            .as_bool()
            .ok_or_else(|| cx.mismatch("boolean", value))
    }
}

impl Decoder for NullDecoder {
    type Output = ();

    fn shape(&self) -> Shape {
        Shape::Null
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<(), Halt> {
        value.as_null().ok_or_else(|| cx.mismatch("null", value))
    }
}

impl Decoder for AnyDecoder {
    type Output = Value;

    fn shape(&self) -> Shape {
        Shape::Unknown
    }

    fn decode_in(&self, value: &Value, _cx: &mut Context<'_>) -> Result<Value, Halt> {
        Ok(value.clone())
    }
}

impl Decoder for LiteralDecoder {
    type Output = Value;

    fn shape(&self) -> Shape {
        Shape::Literal(self.0.clone())
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Value, Halt> {
        if same_value(value, &self.0) {
            Ok(value.clone())
        } else {
            Err(cx.mismatch(self.0.to_string(), value))
        }
    }
}

/// `2^63`: integral floats in `[-2^63, 2^63)` convert to `i64` exactly.
const I64_LIMIT: f64 = -(i64::MIN as f64);

/// `2^127`, the same bound for `i128`.
const I128_LIMIT: f64 = -(i128::MIN as f64);

/// The value of an integral JSON number within the `i64` range.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if !value.is_f64() {
        return None;
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&f)).then_some(f as i64)
}

/// JSON equality: numbers compare by value, arrays element-wise and objects
/// key by key.
pub(crate) fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => same_number(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

fn same_number(x: &Number, y: &Number) -> bool {
    match (integral(x), integral(y)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => x.as_f64() == y.as_f64(),
        _ => false,
    }
}

fn integral(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.into());
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && (-I128_LIMIT..I128_LIMIT).contains(&f)).then_some(f as i128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Untrusted;
    use serde_json::json;

    fn u(v: Value) -> Untrusted {
        Untrusted::new(v)
    }

    #[test]
    fn string_accepts_only_strings() {
        assert_eq!(string().decode(&u(json!("Ada"))).unwrap(), "Ada");
        let err = string().decode(&u(json!(42))).unwrap_err();
        assert_eq!(err.expected, "string");
        assert_eq!(err.found, "number");
    }

    #[test]
    fn number_does_not_parse_text() {
        assert_eq!(number().decode(&u(json!(1.5))).unwrap(), 1.5);
        assert_eq!(number().decode(&u(json!(7))).unwrap(), 7.0);
        let err = number().decode(&u(json!("42"))).unwrap_err();
        assert_eq!(err.expected, "number");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn integer_rejects_fractions_and_overflow() {
        assert_eq!(integer().decode(&u(json!(-3))).unwrap(), -3);
        assert!(!integer().is(&u(json!(1.5))));
        assert!(!integer().is(&u(json!(u64::MAX))));
        let err = integer().decode(&u(json!(2.5))).unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.found, "number");
    }

    #[test]
    fn boolean_does_not_parse_text() {
        assert!(boolean().decode(&u(json!(false))).is_ok());
        assert!(!boolean().is(&u(json!("true"))));
        assert!(!boolean().is(&u(json!(0))));
    }

    #[test]
    fn null_accepts_only_null() {
        assert!(null().is(&u(json!(null))));
        let err = null().decode(&u(json!({}))).unwrap_err();
        assert_eq!(err.found, "object");
    }

    #[test]
    fn any_passes_everything_through() {
        let v = json!({"nested": [1, {"x": null}]});
        assert_eq!(any().decode(&u(v.clone())).unwrap(), v);
    }

    #[test]
    fn literal_matches_exact_value() {
        let admin = literal("admin");
        assert_eq!(admin.decode(&u(json!("admin"))).unwrap(), json!("admin"));
        let err = admin.decode(&u(json!("user"))).unwrap_err();
        assert_eq!(err.expected, "\"admin\"");
        assert_eq!(err.found, "string");
        assert!(!literal(1).is(&u(json!(2))));
    }

    #[test]
    fn integer_accepts_integral_floats() {
        assert_eq!(integer().decode(&u(json!(3.0))).unwrap(), 3);
        assert_eq!(integer().decode(&u(json!(-0.0))).unwrap(), 0);
        assert_eq!(integer().decode(&u(json!(-9.223372036854775808e18))).unwrap(), i64::MIN);
        assert!(!integer().is(&u(json!(9.223372036854775808e18))));
        assert!(!integer().is(&u(json!(1e300))));
    }

    #[test]
    fn literal_compares_numbers_by_value() {
        assert!(literal(1).is(&u(json!(1.0))));
        assert!(literal(2.0).is(&u(json!(2))));
        assert!(!literal(1).is(&u(json!(1.5))));
        assert!(literal(json!({"n": [1, 2.5]})).is(&u(json!({"n": [1.0, 2.5]}))));
        assert!(!literal(json!({"n": 1})).is(&u(json!({"n": 1, "m": 2}))));
        assert!(!literal(u64::MAX).is(&u(json!(u64::MAX as f64))));
    }
}
