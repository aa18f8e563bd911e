//! Business parameters for keyed-hash signed API calls

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::timestamp::Millis;

/// A scalar parameter value.
///
/// The platform stringifies values differently depending on where they end
/// up, so each rendering has its own method instead of a `Display` impl.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Rendering used inside the keyed-hash input.
    ///
    /// Booleans become `"1"` and `""`, not `"true"`/`"false"`. Callback
    /// verification normalizes booleans the other way; both sides of the
    /// wire agree on this, so the two must stay as they are.
    pub fn sign_repr(&self) -> Cow<'_, str> {
        match self {
            Self::Str(s) => Cow::Borrowed(s),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Float(f) => Cow::Owned(format_float(*f)),
            Self::Bool(true) => Cow::Borrowed("1"),
            Self::Bool(false) => Cow::Borrowed(""),
        }
    }

    /// Rendering used as a form-encoded field value. Booleans are `1`/`0`.
    pub fn form_repr(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(false) => Cow::Borrowed("0"),
            other => other.sign_repr(),
        }
    }
}

/// Integral floats print without a fractional part, so a millisecond
/// timestamp held as `f64` renders as plain digits.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Millis> for ParamValue {
    fn from(value: Millis) -> Self {
        Self::Float(value.as_f64())
    }
}

/// Business parameters of a single API call.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending byte order of
/// the keys regardless of insertion order. That ordering is the canonical
/// order for signing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BizParams(BTreeMap<String, ParamValue>);

impl BizParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key/value pairs ready for a form-encoded request body.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.form_repr().into_owned()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for BizParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted_by_key_bytes() {
        let params = BizParams::new()
            .with("timestamp", 1_i64)
            .with("access_token", "t")
            .with("Method", "upper sorts first")
            .with("client_id", "c");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Method", "access_token", "client_id", "timestamp"]);
    }

    #[test]
    fn bool_sign_repr_is_one_or_empty() {
        assert_eq!(ParamValue::Bool(true).sign_repr(), "1");
        assert_eq!(ParamValue::Bool(false).sign_repr(), "");
    }

    #[test]
    fn bool_form_repr_is_one_or_zero() {
        assert_eq!(ParamValue::Bool(true).form_repr(), "1");
        assert_eq!(ParamValue::Bool(false).form_repr(), "0");
    }

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(ParamValue::Float(1700000000123.0).sign_repr(), "1700000000123");
        assert_eq!(ParamValue::Float(9.5).sign_repr(), "9.5");
        assert_eq!(ParamValue::Int(-42).sign_repr(), "-42");
    }

    #[test]
    fn millis_converts_to_digit_string() {
        let value: ParamValue = Millis::from_millis(1700000000000).into();
        assert_eq!(value.sign_repr(), "1700000000000");
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut params = BizParams::new();
        assert!(params.insert("code", "a").is_none());
        let old = params.insert("code", "b");
        assert_eq!(old, Some(ParamValue::Str("a".into())));
        assert_eq!(params.get("code"), Some(&ParamValue::Str("b".into())));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn form_pairs_follow_canonical_order() {
        let params: BizParams = [("b", ParamValue::Bool(false)), ("a", ParamValue::Int(7))]
            .into_iter()
            .collect();
        assert_eq!(
            params.form_pairs(),
            vec![
                ("a".to_owned(), "7".to_owned()),
                ("b".to_owned(), "0".to_owned())
            ]
        );
    }
}
