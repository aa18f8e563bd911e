//! Query-string encoding compatible with the platform's canonical form
//!
//! Keys and values use `application/x-www-form-urlencoded` escaping where
//! only ASCII alphanumerics and `-_.` pass through, a space becomes `+`, and
//! everything else (including `~` and `*`) is percent-encoded with uppercase
//! hex. Nested arrays and objects flatten to `key[sub]=value` with the
//! brackets themselves escaped. Null values are omitted.

use serde_json::{Number, Value};

use crate::params::format_float;

/// Percent-encode a single key or value.
pub fn urlencode(input: &str) -> String {
    urlencoding::encode(input)
        .replace("%20", "+")
        .replace('~', "%7E")
}

/// Build `key=value&key=value...` from already-ordered entries.
pub fn build_query<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut pairs = Vec::new();
    for (key, value) in entries {
        append_pairs(&mut pairs, urlencode(key), value);
    }
    pairs.join("&")
}

fn append_pairs(pairs: &mut Vec<String>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push(format!("{key}={}", if *b { "1" } else { "0" })),
        Value::Number(n) => pairs.push(format!("{key}={}", urlencode(&number_repr(n)))),
        Value::String(s) => pairs.push(format!("{key}={}", urlencode(s))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_pairs(pairs, format!("{key}%5B{index}%5D"), item);
            }
        }
        Value::Object(map) => {
            for (sub_key, item) in map {
                append_pairs(pairs, format!("{key}%5B{}%5D", urlencode(sub_key)), item);
            }
        }
    }
}

fn number_repr(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}
