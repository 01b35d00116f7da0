//! Structural validation of raw policy documents
//!
//! Raw documents arrive as untyped JSON values, either from configuration or
//! from a dynamic supplier. Every error names the offending array index and
//! field so operators can locate it in the source document.

use super::{AccessGroup, Methods, Policy, PolicyDocument, PolicyEffect};
use crate::error::ValidationError;
use serde_json::{Map, Value};

const GROUP_FIELDS: &[&str] = &["access_group", "permissions"];
const POLICY_FIELDS: &[&str] = &["resource", "methods", "action"];

/// Validate a raw policy document.
///
/// `null` and empty arrays are reported as [`ValidationError::MissingPolicy`];
/// anything else that is not an array of well-formed access groups is
/// [`ValidationError::Malformed`] or [`ValidationError::DuplicateGroup`].
pub fn validate(raw: &Value) -> Result<PolicyDocument, ValidationError> {
    let entries = match raw {
        Value::Null => return Err(ValidationError::MissingPolicy),
        Value::Array(entries) if entries.is_empty() => return Err(ValidationError::MissingPolicy),
        Value::Array(entries) => entries,
        other => {
            return Err(ValidationError::malformed(
                "value",
                format!("must be an array, found {}", kind(other)),
            ))
        }
    };

    let groups = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_group(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    PolicyDocument::new(groups)
}

fn parse_group(index: usize, entry: &Value) -> Result<AccessGroup, ValidationError> {
    let location = format!("[{}]", index);
    let fields = as_object(&location, entry)?;
    reject_unknown(&location, fields, GROUP_FIELDS)?;

    let id = required_str(&location, fields, "access_group")?;

    let permissions_location = format!("{}.permissions", location);
    let permissions = match fields.get("permissions") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(p_index, item)| parse_policy(&format!("{}[{}]", permissions_location, p_index), item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ValidationError::malformed(
                permissions_location,
                format!("must be an array, found {}", kind(other)),
            ))
        }
        None => return Err(ValidationError::malformed(permissions_location, "is required")),
    };

    Ok(AccessGroup::new(id, permissions))
}

fn parse_policy(location: &str, item: &Value) -> Result<Policy, ValidationError> {
    let fields = as_object(location, item)?;
    reject_unknown(location, fields, POLICY_FIELDS)?;

    let resource = required_str(location, fields, "resource")?;
    let methods = parse_methods(location, fields.get("methods"))?;

    let action_location = format!("{}.action", location);
    let action = match fields.get("action") {
        Some(Value::String(token)) => PolicyEffect::parse(token).ok_or_else(|| {
            ValidationError::malformed(&action_location, "must be one of [allow, deny]")
        })?,
        Some(other) => {
            return Err(ValidationError::malformed(
                action_location,
                format!("must be a string, found {}", kind(other)),
            ))
        }
        None => return Err(ValidationError::malformed(action_location, "is required")),
    };

    Ok(Policy::new(resource, methods, action))
}

/// `"*"` is the wildcard; any other string is a single method token.
fn parse_methods(location: &str, value: Option<&Value>) -> Result<Methods, ValidationError> {
    let location = format!("{}.methods", location);
    match value {
        Some(Value::String(token)) if token == Methods::WILDCARD => Ok(Methods::Any),
        Some(Value::String(token)) if token.is_empty() => {
            Err(ValidationError::malformed(location, "must not be empty"))
        }
        Some(Value::String(token)) => Ok(Methods::Only(vec![token.clone()])),
        Some(Value::Array(tokens)) => tokens
            .iter()
            .enumerate()
            .map(|(i, token)| match token {
                Value::String(s) => Ok(s.clone()),
                other => Err(ValidationError::malformed(
                    format!("{}[{}]", location, i),
                    format!("must be a string, found {}", kind(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Methods::Only),
        Some(other) => Err(ValidationError::malformed(
            location,
            format!("must be a string or an array, found {}", kind(other)),
        )),
        None => Err(ValidationError::malformed(location, "is required")),
    }
}

fn as_object<'a>(location: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| {
        ValidationError::malformed(location, format!("must be an object, found {}", kind(value)))
    })
}

fn reject_unknown(
    location: &str,
    fields: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    match fields.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(ValidationError::malformed(
            format!("{}.{}", location, key),
            "is not allowed",
        )),
        None => Ok(()),
    }
}

fn required_str(
    location: &str,
    fields: &Map<String, Value>,
    field: &str,
) -> Result<String, ValidationError> {
    let field_location = format!("{}.{}", location, field);
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::malformed(
            field_location,
            format!("must be a string, found {}", kind(other)),
        )),
        None => Err(ValidationError::malformed(field_location, "is required")),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
