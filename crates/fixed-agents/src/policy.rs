use std::str::FromStr;

use action_primitives::{anchors, BrowserAction, Selector};
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::errors::PolicyError;
use crate::protocol::{ActResponse, StepRequest};

/// Book detail page the direct policy navigates to.
pub const DEFAULT_TARGET_URL: &str = "http://84.247.180.192:8001/books/book-original-002?seed=36";

/// Links the link-scan policy follows by default.
pub const DEFAULT_LINK_PATTERN: &str = r"/books/book-original-\d+";

/// A deterministic function from step request to response.
pub trait ActPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn decide(&self, request: &StepRequest) -> ActResponse;
}

/// Policy selector used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Direct,
    LinkScan,
    Idle,
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" | "direct-navigate" => Ok(Self::Direct),
            "link-scan" | "link_scan" | "links" => Ok(Self::LinkScan),
            "idle" => Ok(Self::Idle),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Navigates straight to a known URL on the first step, then reports done.
#[derive(Debug, Clone)]
pub struct DirectNavigatePolicy {
    target_url: String,
    /// Answer with `navigate_url` instead of an `actions` list.
    legacy_shape: bool,
}

impl DirectNavigatePolicy {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            legacy_shape: false,
        }
    }

    pub fn legacy_shape(mut self, enabled: bool) -> Self {
        self.legacy_shape = enabled;
        self
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

impl Default for DirectNavigatePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_URL)
    }
}

impl ActPolicy for DirectNavigatePolicy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn decide(&self, request: &StepRequest) -> ActResponse {
        if request.step_index > 0 {
            return ActResponse::finished();
        }
        if self.legacy_shape {
            return ActResponse {
                navigate_url: Some(self.target_url.clone()),
                done: true,
                ..ActResponse::default()
            };
        }
        ActResponse::act(BrowserAction::navigate(self.target_url.clone()).to_value(), true)
    }
}

/// Clicks the first link whose href matches a pattern.
#[derive(Debug, Clone)]
pub struct LinkScanPolicy {
    pattern: Regex,
    /// Steps without a matching link before giving up.
    max_idle_steps: u32,
}

impl LinkScanPolicy {
    pub fn new(pattern: &str, max_idle_steps: u32) -> Result<Self, PolicyError> {
        let pattern = Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            max_idle_steps: max_idle_steps.max(1),
        })
    }

    fn pick_link(&self, request: &StepRequest) -> Option<String> {
        let current = request.page_url();
        anchors(request.html())
            .into_iter()
            .filter_map(|anchor| anchor.href().map(str::to_string))
            .filter(|href| self.pattern.is_match(href))
            .find(|href| !points_at(href, current))
    }
}

impl ActPolicy for LinkScanPolicy {
    fn name(&self) -> &'static str {
        "link-scan"
    }

    fn decide(&self, request: &StepRequest) -> ActResponse {
        if let Some(href) = self.pick_link(request) {
            debug!(task_id = %request.task_id, step = request.step_index, href = %href, "clicking matching link");
            return ActResponse::act(BrowserAction::click(Selector::link_to(&href)).to_value(), false);
        }
        if request.step_index.saturating_add(1) >= self.max_idle_steps {
            return ActResponse::finished();
        }
        ActResponse::act(BrowserAction::wait(1.0).to_value(), false)
    }
}

/// Never acts and never finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl ActPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide(&self, _request: &StepRequest) -> ActResponse {
        ActResponse::idle()
    }
}

/// Whether `href` resolves to the page at `current`.
fn points_at(href: &str, current: Option<&str>) -> bool {
    let Some(current) = current else {
        return false;
    };
    let resolved = Url::parse(current)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string());
    resolved.trim_end_matches('/') == current.trim_end_matches('/')
}
