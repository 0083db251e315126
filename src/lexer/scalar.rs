use crate::ast::Value;

/// Convert a bare, trimmed token into a typed value.
///
/// First match wins: quoted string, integer, float, bool, null. Anything else
/// is kept as the raw text. Never fails.
pub fn coerce(token: &str) -> Value {
    if let Some(s) = unquote(token) {
        return Value::String(s);
    }

    if is_integer(token) {
        if let Ok(n) = token.parse::<i64>() {
            return Value::Int(n);
        }
    } else if is_decimal(token) {
        if let Ok(n) = token.parse::<f64>() {
            return Value::Float(n);
        }
    }

    if token.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if token.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if token.eq_ignore_ascii_case("null") {
        Value::Null
    } else {
        Value::String(token.to_string())
    }
}

fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Exactly one `.`, at least one digit, nothing else.
fn is_decimal(token: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in token.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return false,
        }
    }
    dots == 1 && digits > 0
}

/// The inner text of a token wrapped in one matching `"…"` or `'…'` pair.
///
/// Returns `None` when the token is not quoted or when an unescaped copy of the
/// same quote appears inside it (e.g. `"a" "b"`).
pub fn unquote(token: &str) -> Option<String> {
    let quote = token.chars().next()?;
    if (quote != '"' && quote != '\'') || token.len() < 2 || !token.ends_with(quote) {
        return None;
    }

    let inner = &token[1..token.len() - 1];
    let mut escaped = false;
    for ch in inner.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            c if c == quote => return None,
            _ => {}
        }
    }

    Some(unescape(inner, quote))
}

/// `\"` -> `"` (or `\'` -> `'`), only for the quote style in use.
pub fn unescape(text: &str, quote: char) -> String {
    text.replace(&format!("\\{}", quote), &quote.to_string())
}

/// Loose quote removal: drops every leading and trailing `"` or `'`.
pub fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'')
}
