//! Response envelopes
//!
//! Each endpoint wraps its payload differently and decides success its own
//! way:
//! - user info: `{code, data, errorCode}`, success when `code` is zero
//! - pay order: `{success, data, errorCode}`, success only for JSON `true`
//! - token: `{success, data}`, success for any truthy `success`
//!
//! Only these fields are read. The HTTP status is not part of the decision.

use serde_json::{Map, Value};

use crate::error::{Endpoint, Error, RemotePayload, Result};

const DATA: &str = "data";
const CODE: &str = "code";
const SUCCESS: &str = "success";
const ERROR_CODE: &str = "errorCode";

/// Unwrap a user-info response.
pub fn user_info(body: &str) -> Result<Value> {
    let mut envelope = parse(Endpoint::UserInfo, body)?;
    if is_zero(envelope.get(CODE)) {
        Ok(take_data(&mut envelope))
    } else {
        Err(remote_error_code(Endpoint::UserInfo, &envelope))
    }
}

/// Unwrap a pay-order response.
pub fn pay_order(body: &str) -> Result<Value> {
    let mut envelope = parse(Endpoint::PayOrder, body)?;
    if matches!(envelope.get(SUCCESS), Some(Value::Bool(true))) {
        Ok(take_data(&mut envelope))
    } else {
        Err(remote_error_code(Endpoint::PayOrder, &envelope))
    }
}

/// Unwrap a token response. Failures keep the raw body.
pub fn token(body: &str) -> Result<Value> {
    let mut envelope = parse(Endpoint::Token, body)?;
    if is_truthy(envelope.get(SUCCESS)) {
        Ok(take_data(&mut envelope))
    } else {
        Err(Error::Remote {
            endpoint: Endpoint::Token,
            payload: RemotePayload::Body(body.to_owned()),
        })
    }
}

fn parse(endpoint: Endpoint, body: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(envelope)) => Ok(envelope),
        _ => Err(Error::InvalidResponse {
            endpoint,
            body: body.to_owned(),
        }),
    }
}

fn take_data(envelope: &mut Map<String, Value>) -> Value {
    envelope.remove(DATA).unwrap_or(Value::Null)
}

fn remote_error_code(endpoint: Endpoint, envelope: &Map<String, Value>) -> Error {
    let code = match envelope.get(ERROR_CODE) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(code)) => code.clone(),
        Some(other) => other.to_string(),
    };
    Error::Remote {
        endpoint,
        payload: RemotePayload::ErrorCode(code),
    }
}

/// `code` counts as zero when it is numerically zero, either as a JSON
/// number or a numeric string.
fn is_zero(code: Option<&Value>) -> bool {
    match code {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(|v| v == 0.0),
        _ => false,
    }
}

/// Loose truthiness: `false`, `0`, `""`, `"0"`, empty containers and null are
/// false; everything else is true.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !(s.is_empty() || s == "0"),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}
