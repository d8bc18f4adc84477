//! Argument literals for `rebind call`.

use rebind_sdk::DynValue;

/// Parse one command-line literal into a dynamic value.
///
/// `true`/`false` are bools, `none` is none, `@n` is an opaque handle,
/// integer and float literals are numbers. Anything else, or anything in
/// double quotes, is a string.
pub fn parse_literal(text: &str) -> DynValue {
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return DynValue::str(inner);
    }

    match text {
        "true" => return DynValue::bool(true),
        "false" => return DynValue::bool(false),
        "none" => return DynValue::None,
        _ => {}
    }

    if let Some(raw) = text.strip_prefix('@') {
        if let Ok(raw) = raw.parse::<u64>() {
            return DynValue::handle(raw);
        }
    }

    if let Ok(i) = text.parse::<i64>() {
        return DynValue::long(i);
    }
    if let Ok(u) = text.parse::<u64>() {
        return DynValue::u64(u);
    }
    if looks_like_float(text) {
        if let Ok(f) = text.parse::<f64>() {
            return DynValue::float(f);
        }
    }

    DynValue::str(text)
}

/// Parse every literal in order.
pub fn parse_all(texts: &[String]) -> Vec<DynValue> {
    texts.iter().map(|t| parse_literal(t)).collect()
}

// Keeps words like "inf" and "NaN" as strings.
fn looks_like_float(text: &str) -> bool {
    let digits = text.trim_start_matches(['-', '+']);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
}
