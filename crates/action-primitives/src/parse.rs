use serde_json::Value;

use crate::errors::ActionParseError;
use crate::types::{BrowserAction, ACTION_TYPES};

/// Turn one untyped action payload into a [`BrowserAction`].
pub fn parse_action(value: &Value) -> Result<BrowserAction, ActionParseError> {
    let object = value.as_object().ok_or(ActionParseError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ActionParseError::MissingType)?;

    if !ACTION_TYPES.contains(&kind) {
        return Err(ActionParseError::UnknownType(kind.to_string()));
    }

    let action: BrowserAction = serde_json::from_value(value.clone())
        .map_err(|err| ActionParseError::invalid(kind, err.to_string()))?;
    validate(&action)?;
    Ok(action)
}

fn validate(action: &BrowserAction) -> Result<(), ActionParseError> {
    match action {
        BrowserAction::Navigate { url } if url.trim().is_empty() => {
            Err(ActionParseError::invalid(action.kind(), "url is empty"))
        }
        BrowserAction::Wait { time_seconds } if !time_seconds.is_finite() || *time_seconds < 0.0 => {
            Err(ActionParseError::invalid(
                action.kind(),
                format!("time_seconds must be non-negative, got {}", time_seconds),
            ))
        }
        _ => Ok(()),
    }
}
