use action_primitives::{parse_action, BrowserAction};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AgentError;

/// Parsed agent response for one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentReply {
    pub actions: Vec<BrowserAction>,
    pub done: bool,
}

impl AgentReply {
    /// Empty reply used when the agent call failed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn first_action(&self) -> Option<&BrowserAction> {
        self.actions.first()
    }
}

/// Read the action shapes agents return.
///
/// Sources, in order: an `actions` list, a single `action` object, a
/// `navigate_url` string. The first source yielding a valid action wins;
/// entries that fail to parse are dropped.
pub fn parse_reply(body: &Value) -> Result<AgentReply, AgentError> {
    let object = body
        .as_object()
        .ok_or_else(|| AgentError::malformed(format!("expected a JSON object, got {}", kind_of(body))))?;

    if let Some(index) = object.get("action_index").filter(|value| !value.is_null()) {
        debug!(action_index = %index, "ignoring legacy action_index");
    }

    let mut actions = match object.get("actions") {
        Some(Value::Array(items)) => parse_entries(items),
        _ => Vec::new(),
    };

    if actions.is_empty() {
        if let Some(action @ Value::Object(_)) = object.get("action") {
            actions = parse_entries(std::slice::from_ref(action));
        }
    }

    if actions.is_empty() {
        if let Some(url) = object
            .get("navigate_url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            actions.push(BrowserAction::navigate(url));
        }
    }

    let done = object.get("done").and_then(Value::as_bool).unwrap_or(false);
    Ok(AgentReply { actions, done })
}

fn parse_entries(values: &[Value]) -> Vec<BrowserAction> {
    values
        .iter()
        .filter_map(|value| match parse_action(value) {
            Ok(action) => Some(action),
            Err(err) => {
                warn!(error = %err, "skipping unparseable agent action");
                None
            }
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_primitives::Selector;
    use serde_json::json;

    #[test]
    fn actions_list_keeps_valid_entries_in_order() {
        let reply = parse_reply(&json!({
            "actions": [
                {"type": "Teleport"},
                {"type": "ClickAction", "selector": {"type": "xpathSelector", "value": "//a"}},
                {"type": "WaitAction", "time_seconds": 1},
            ],
            "done": false,
        }))
        .unwrap();

        assert_eq!(
            reply.actions,
            vec![
                BrowserAction::click(Selector::xpath("//a")),
                BrowserAction::wait(1.0),
            ]
        );
        assert!(!reply.done);
    }

    #[test]
    fn single_action_object() {
        let reply = parse_reply(&json!({
            "action": {"type": "NavigateAction", "url": "http://x/a"},
            "done": true,
        }))
        .unwrap();
        assert_eq!(reply.first_action(), Some(&BrowserAction::navigate("http://x/a")));
        assert!(reply.done);
    }

    #[test]
    fn legacy_navigate_url_shape() {
        let reply = parse_reply(&json!({
            "action_index": 0,
            "navigate_url": "http://84.247.180.192:8001/books/book-original-002?seed=36",
            "done": true,
        }))
        .unwrap();
        assert_eq!(
            reply.actions,
            vec![BrowserAction::navigate(
                "http://84.247.180.192:8001/books/book-original-002?seed=36"
            )]
        );
        assert!(reply.done);
    }

    #[test]
    fn explicit_list_wins_over_legacy_fields() {
        let reply = parse_reply(&json!({
            "actions": [{"type": "NavigateAction", "url": "http://x/list"}],
            "action": {"type": "NavigateAction", "url": "http://x/single"},
            "navigate_url": "http://x/legacy",
        }))
        .unwrap();
        assert_eq!(reply.actions, vec![BrowserAction::navigate("http://x/list")]);
    }

    #[test]
    fn empty_list_falls_through_to_next_source() {
        let reply = parse_reply(&json!({
            "actions": [],
            "navigate_url": "http://x/legacy",
        }))
        .unwrap();
        assert_eq!(reply.actions, vec![BrowserAction::navigate("http://x/legacy")]);
    }

    #[test]
    fn unparseable_list_falls_through_to_single_action() {
        let reply = parse_reply(&json!({
            "actions": [{"type": "Teleport"}, {"url": "http://x/untyped"}],
            "action": {"type": "NavigateAction", "url": "http://x/single"},
            "navigate_url": "http://x/legacy",
        }))
        .unwrap();
        assert_eq!(reply.actions, vec![BrowserAction::navigate("http://x/single")]);

        let reply = parse_reply(&json!({
            "actions": [{"type": "Teleport"}],
            "action": {"type": "Teleport"},
            "navigate_url": "http://x/legacy",
        }))
        .unwrap();
        assert_eq!(reply.actions, vec![BrowserAction::navigate("http://x/legacy")]);
    }

    #[test]
    fn nothing_usable_is_an_empty_reply() {
        let reply = parse_reply(&json!({"actions": [], "done": true})).unwrap();
        assert!(reply.actions.is_empty());
        assert!(reply.done);

        let reply = parse_reply(&json!({"navigate_url": "  ", "done": "yes"})).unwrap();
        assert_eq!(reply, AgentReply::empty());
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            parse_reply(&json!([1, 2])),
            Err(AgentError::MalformedBody(_))
        ));
    }
}
