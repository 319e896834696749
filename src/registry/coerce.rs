//! Raw argument coercion.
//!
//! Rules, in priority order:
//! 1. the value already has the target type: accept it;
//! 2. a string targeting a numeric or boolean type: parse it (locale
//!    independent), or fail;
//! 3. a number targeting a string: stringify it.
//!
//! Nothing else converts. `Double` accepts any JSON number; `Integer` only
//! accepts numbers representable as `i64`.

use crate::types::{ArgValue, ParamType};
use serde_json::Value;

/// Coerce `raw` to `target`, returning the rejected value's JSON rendering on
/// failure.
pub(crate) fn coerce(raw: &Value, target: ParamType) -> Result<ArgValue, String> {
    match (target, raw) {
        (ParamType::String, Value::String(s)) => Ok(ArgValue::String(s.clone())),
        (ParamType::Integer, Value::Number(n)) => n.as_i64().map(ArgValue::Integer).ok_or_else(|| raw.to_string()),
        (ParamType::Double, Value::Number(n)) => n.as_f64().map(ArgValue::Double).ok_or_else(|| raw.to_string()),
        (ParamType::Boolean, Value::Bool(b)) => Ok(ArgValue::Boolean(*b)),

        (ParamType::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().map(ArgValue::Integer).map_err(|_| raw.to_string())
        }
        (ParamType::Double, Value::String(s)) => parse_double(s).map(ArgValue::Double).ok_or_else(|| raw.to_string()),
        (ParamType::Boolean, Value::String(s)) => parse_bool(s).map(ArgValue::Boolean).ok_or_else(|| raw.to_string()),

        (ParamType::String, Value::Number(n)) => Ok(ArgValue::String(n.to_string())),

        _ => Err(raw.to_string()),
    }
}

fn parse_double(s: &str) -> Option<f64> {
    // "NaN" and "inf" parse as floats but are not accepted.
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn matching_types_are_accepted_as_is() {
        assert_eq!(coerce(&json!("hi"), ParamType::String), Ok(ArgValue::String("hi".into())));
        assert_eq!(coerce(&json!(7), ParamType::Integer), Ok(ArgValue::Integer(7)));
        assert_eq!(coerce(&json!(2.5), ParamType::Double), Ok(ArgValue::Double(2.5)));
        assert_eq!(coerce(&json!(true), ParamType::Boolean), Ok(ArgValue::Boolean(true)));
    }

    #[test]
    fn integers_widen_to_double() {
        assert_eq!(coerce(&json!(42), ParamType::Double), Ok(ArgValue::Double(42.0)));
    }

    #[test]
    fn fractional_numbers_do_not_narrow_to_integer() {
        assert_eq!(coerce(&json!(2.5), ParamType::Integer), Err("2.5".into()));
    }

    #[test]
    fn strings_parse_into_numbers_and_booleans() {
        assert_eq!(coerce(&json!(" 12 "), ParamType::Integer), Ok(ArgValue::Integer(12)));
        assert_eq!(coerce(&json!("-0.5"), ParamType::Double), Ok(ArgValue::Double(-0.5)));
        assert_eq!(coerce(&json!("TRUE"), ParamType::Boolean), Ok(ArgValue::Boolean(true)));
        assert_eq!(coerce(&json!("false"), ParamType::Boolean), Ok(ArgValue::Boolean(false)));
    }

    #[test]
    fn unparseable_strings_are_rejected() {
        assert_eq!(coerce(&json!("ten"), ParamType::Integer), Err("\"ten\"".into()));
        assert_eq!(coerce(&json!("1,5"), ParamType::Double), Err("\"1,5\"".into()));
        assert_eq!(coerce(&json!("NaN"), ParamType::Double), Err("\"NaN\"".into()));
        assert_eq!(coerce(&json!("yes"), ParamType::Boolean), Err("\"yes\"".into()));
    }

    #[test]
    fn numbers_stringify_into_strings() {
        assert_eq!(coerce(&json!(3), ParamType::String), Ok(ArgValue::String("3".into())));
        assert_eq!(coerce(&json!(1.25), ParamType::String), Ok(ArgValue::String("1.25".into())));
    }

    #[test]
    fn no_other_conversions_exist() {
        assert!(coerce(&json!(true), ParamType::String).is_err());
        assert!(coerce(&json!(1), ParamType::Boolean).is_err());
        assert!(coerce(&json!(false), ParamType::Integer).is_err());
        assert!(coerce(&json!([1, 2]), ParamType::String).is_err());
        assert!(coerce(&json!({"a": 1}), ParamType::Double).is_err());
    }
}
