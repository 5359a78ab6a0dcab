//! Core data types for browser actions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Wire discriminators accepted for [`BrowserAction`]
pub const ACTION_TYPES: &[&str] = &[
    "NavigateAction",
    "ClickAction",
    "TypeAction",
    "ScrollAction",
    "WaitAction",
];

/// How an action addresses an element on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    /// XPath expression, e.g. `//a[@href='/books/1']`
    #[serde(rename = "xpathSelector")]
    Xpath { value: String },

    /// Element whose `attribute` equals `value`
    #[serde(rename = "attributeValueSelector")]
    AttributeValue { attribute: String, value: String },

    /// Element whose visible text contains `value`
    #[serde(rename = "tagContainsSelector")]
    TagContains { value: String },
}

impl Selector {
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::Xpath {
            value: value.into(),
        }
    }

    /// XPath selecting the anchor with this exact href.
    pub fn link_to(href: &str) -> Self {
        if href.contains('\'') {
            Self::xpath(format!("//a[@href=\"{}\"]", href))
        } else {
            Self::xpath(format!("//a[@href='{}']", href))
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Xpath { value } => write!(f, "xpath={}", value),
            Selector::AttributeValue { attribute, value } => write!(f, "[{}={}]", attribute, value),
            Selector::TagContains { value } => write!(f, "text~={}", value),
        }
    }
}

/// One instruction an agent proposes for a step
///
/// The set is closed: anything else on the wire is an
/// [`crate::ActionParseError::UnknownType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BrowserAction {
    #[serde(rename = "NavigateAction")]
    Navigate { url: String },

    #[serde(rename = "ClickAction")]
    Click { selector: Selector },

    #[serde(rename = "TypeAction")]
    Type { selector: Selector, text: String },

    #[serde(rename = "ScrollAction")]
    Scroll {
        #[serde(default)]
        up: bool,
        #[serde(default)]
        down: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },

    #[serde(rename = "WaitAction")]
    Wait { time_seconds: f64 },
}

impl BrowserAction {
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::Navigate { url: url.into() }
    }

    pub fn click(selector: Selector) -> Self {
        Self::Click { selector }
    }

    pub fn wait(time_seconds: f64) -> Self {
        Self::Wait { time_seconds }
    }

    /// Wire discriminator of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            BrowserAction::Navigate { .. } => "NavigateAction",
            BrowserAction::Click { .. } => "ClickAction",
            BrowserAction::Type { .. } => "TypeAction",
            BrowserAction::Scroll { .. } => "ScrollAction",
            BrowserAction::Wait { .. } => "WaitAction",
        }
    }

    pub fn to_value(&self) -> Value {
        // Every variant holds only strings, numbers, bools and JSON values.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for BrowserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserAction::Navigate { url } => write!(f, "navigate({})", url),
            BrowserAction::Click { selector } => write!(f, "click({})", selector),
            BrowserAction::Type { selector, text } => {
                write!(f, "type({}, {} chars)", selector, text.chars().count())
            }
            BrowserAction::Scroll { up, .. } => {
                write!(f, "scroll({})", if *up { "up" } else { "down" })
            }
            BrowserAction::Wait { time_seconds } => write!(f, "wait({}s)", time_seconds),
        }
    }
}
