// Author: Dustin Pilgrim
// License: MIT

use indexmap::IndexMap;

use crate::{MangoError, Value};

fn type_error(message: String, hint: Option<&str>, code: u32) -> MangoError {
    MangoError::TypeError {
        message,
        hint: hint.map(str::to_string),
        code: Some(code),
    }
}

fn expected(what: &str, value: &Value, hint: &str, code: u32) -> MangoError {
    type_error(
        format!("Expected {}, got {} ({})", what, value.type_name(), value),
        Some(hint),
        code,
    )
}

impl TryFrom<Value> for String {
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(expected("string", &value, "Quote the value in your document", 401)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            _ => Err(expected("number", &value, "Use a number value in your document", 402)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(n),
            _ => Err(expected("integer", &value, "Use a whole number without a decimal point", 403)),
        }
    }
}

/// Range-checked conversions from the `Int` variant.
macro_rules! int_conversion {
    ($($ty:ty => $code:expr),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = MangoError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let n = i64::try_from(value)?;
                    <$ty>::try_from(n).map_err(|_| type_error(
                        format!("Number {} out of range for {}", n, stringify!($ty)),
                        Some(format!("Use a number between {} and {}", <$ty>::MIN, <$ty>::MAX).as_str()),
                        $code,
                    ))
                }
            }
        )*
    };
}

int_conversion! {
    i32 => 406,
    u16 => 407,
    u32 => 408,
    u64 => 409,
    usize => 410,
}

impl TryFrom<Value> for bool {
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(ref s) if looks_like_bool(s) => {
                Err(type_error(
                    format!("Invalid boolean value '{}'. Did you mean 'true' or 'false'?", s),
                    None,
                    404,
                ))
            }
            _ => Err(expected("boolean", &value, "Use true or false", 404)),
        }
    }
}

/// Prefix typos (`tru`, `falsy`) and transpositions (`ture`, `flase`).
fn looks_like_bool(s: &str) -> bool {
    let lower = s.to_lowercase();
    if lower.starts_with("tru") || lower.starts_with("fal") {
        return true;
    }
    let mut letters: Vec<char> = lower.chars().collect();
    letters.sort_unstable();
    letters == ['e', 'r', 't', 'u'] || letters == ['a', 'e', 'f', 'l', 's']
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = MangoError>,
{
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items.into_iter().map(T::try_from).collect(),
            _ => Err(expected("array", &value, "Use an array [...] in your document", 405)),
        }
    }
}

impl<T> TryFrom<Value> for IndexMap<String, T>
where
    T: TryFrom<Value, Error = MangoError>,
{
    type Error = MangoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => entries
                .into_iter()
                .map(|(key, item)| T::try_from(item).map(|converted| (key, converted)))
                .collect(),
            _ => Err(expected("object", &value, "Use an inline object {key: value} in your document", 411)),
        }
    }
}
