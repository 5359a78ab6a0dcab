//! Anchor locator over static HTML.
//!
//! Only links are locatable: evaluators render pages without a browser, so
//! the one observable effect of a click is following an `href`. XPath
//! support covers the predicate forms agents actually emit:
//! `//a[@attr='v']`, `//a[contains(@attr,'v')]`, `//a[text()='v']` and
//! `//a[contains(text(),'v')]` (tag may also be `*`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Selector;

static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b([^>]*)>(.*?)</a\s*>"#).expect("anchor regex"));
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));
static XPATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*//([A-Za-z]+|\*)\[(.+)\]\s*$").expect("xpath regex"));
static ATTR_EQ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^@([-A-Za-z0-9_:]+)\s*=\s*(?:"([^"]*)"|'([^']*)')$"#).expect("attr eq")
});
static ATTR_CONTAINS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^contains\(\s*@([-A-Za-z0-9_:]+)\s*,\s*(?:"([^"]*)"|'([^']*)')\s*\)$"#)
        .expect("attr contains")
});
static TEXT_EQ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^(?:text\(\)|\.)\s*=\s*(?:"([^"]*)"|'([^']*)')$"#).expect("text eq")
});
static TEXT_CONTAINS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^contains\(\s*(?:text\(\)|\.)\s*,\s*(?:"([^"]*)"|'([^']*)')\s*\)$"#)
        .expect("text contains")
});

/// One `<a>` element found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub attributes: Vec<(String, String)>,
    /// Visible text with inner tags stripped and whitespace collapsed.
    pub text: String,
}

impl Anchor {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn href(&self) -> Option<&str> {
        self.attribute("href").filter(|href| !href.trim().is_empty())
    }
}

/// Every anchor in document order.
pub fn anchors(html: &str) -> Vec<Anchor> {
    ANCHOR_RE
        .captures_iter(html)
        .map(|caps| {
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let inner = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            Anchor {
                attributes: parse_attributes(attrs),
                text: visible_text(inner),
            }
        })
        .collect()
}

/// First anchor with an href that `selector` addresses.
pub fn locate_link(html: &str, selector: &Selector) -> Option<Anchor> {
    let predicate = Predicate::from_selector(selector)?;
    anchors(html)
        .into_iter()
        .filter(|anchor| anchor.href().is_some())
        .find(|anchor| predicate.matches(anchor))
}

#[derive(Debug, PartialEq, Eq)]
enum Predicate {
    AttributeEquals(String, String),
    AttributeContains(String, String),
    TextEquals(String),
    TextContains(String),
}

impl Predicate {
    fn from_selector(selector: &Selector) -> Option<Self> {
        match selector {
            Selector::AttributeValue { attribute, value } => {
                Some(Self::AttributeEquals(attribute.clone(), value.clone()))
            }
            Selector::TagContains { value } => Some(Self::TextContains(value.clone())),
            Selector::Xpath { value } => Self::from_xpath(value),
        }
    }

    fn from_xpath(xpath: &str) -> Option<Self> {
        let caps = XPATH_RE.captures(xpath)?;
        let tag = caps.get(1)?.as_str();
        if tag != "*" && !tag.eq_ignore_ascii_case("a") {
            return None;
        }
        let predicate = caps.get(2)?.as_str().trim();

        if let Some(caps) = ATTR_EQ_RE.captures(predicate) {
            return Some(Self::AttributeEquals(caps[1].to_string(), quoted(&caps, 2)));
        }
        if let Some(caps) = ATTR_CONTAINS_RE.captures(predicate) {
            return Some(Self::AttributeContains(caps[1].to_string(), quoted(&caps, 2)));
        }
        if let Some(caps) = TEXT_EQ_RE.captures(predicate) {
            return Some(Self::TextEquals(quoted(&caps, 1)));
        }
        if let Some(caps) = TEXT_CONTAINS_RE.captures(predicate) {
            return Some(Self::TextContains(quoted(&caps, 1)));
        }
        None
    }

    fn matches(&self, anchor: &Anchor) -> bool {
        match self {
            Predicate::AttributeEquals(name, value) => anchor.attribute(name) == Some(value.as_str()),
            Predicate::AttributeContains(name, value) => anchor
                .attribute(name)
                .map(|actual| actual.contains(value.as_str()))
                .unwrap_or(false),
            Predicate::TextEquals(value) => anchor.text == value.trim(),
            Predicate::TextContains(value) => anchor.text.contains(value.trim()),
        }
    }
}

/// Value of a `"…"|'…'` alternation starting at capture group `first`.
fn quoted(caps: &regex::Captures<'_>, first: usize) -> String {
    caps.get(first)
        .or_else(|| caps.get(first + 1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

fn visible_text(inner: &str) -> String {
    let stripped = TAG_RE.replace_all(inner, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
}
