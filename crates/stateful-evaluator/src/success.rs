use affine_core_types::{ScoreDetails, Snapshot};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use url::Url;

/// How a `CheckUrlTest` compares URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMatch {
    #[default]
    Equals,
    Contains,
}

/// Success test understood by the page evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum SuccessTest {
    CheckUrl { url: String, match_type: UrlMatch },
    FindInHtml { content: String },
    /// Counted toward the total but never passes.
    Unsupported { kind: String },
}

#[derive(Deserialize)]
struct CheckUrlFields {
    url: String,
    #[serde(default)]
    match_type: UrlMatch,
}

#[derive(Deserialize)]
struct FindInHtmlFields {
    content: String,
}

impl SuccessTest {
    pub fn from_value(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();

        let parsed = match kind.as_str() {
            "CheckUrlTest" => serde_json::from_value::<CheckUrlFields>(value.clone())
                .map(|fields| SuccessTest::CheckUrl {
                    url: fields.url,
                    match_type: fields.match_type,
                }),
            "FindInHtmlTest" => serde_json::from_value::<FindInHtmlFields>(value.clone())
                .map(|fields| SuccessTest::FindInHtml {
                    content: fields.content,
                }),
            _ => return SuccessTest::Unsupported { kind: kind.clone() },
        };

        parsed.unwrap_or_else(|err| {
            warn!(kind = %kind, error = %err, "malformed success test");
            SuccessTest::Unsupported { kind }
        })
    }

    /// Whether the test holds for `snapshot`. `base` resolves relative test URLs.
    pub fn passes(&self, snapshot: &Snapshot, base: &Url) -> bool {
        match self {
            SuccessTest::CheckUrl { url, match_type } => {
                let Some(current) = snapshot.url.as_deref().filter(|url| !url.is_empty()) else {
                    return false;
                };
                match match_type {
                    UrlMatch::Equals => {
                        let expected = base
                            .join(url)
                            .map(|resolved| resolved.to_string())
                            .unwrap_or_else(|_| url.clone());
                        trim_slash(current) == trim_slash(&expected)
                    }
                    UrlMatch::Contains => current.contains(url.as_str()),
                }
            }
            SuccessTest::FindInHtml { content } => snapshot.html_or_empty().contains(content.as_str()),
            SuccessTest::Unsupported { .. } => false,
        }
    }
}

fn trim_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Sticky pass/fail tally over a task's tests.
#[derive(Clone, Debug)]
pub struct Scoreboard {
    tests: Vec<SuccessTest>,
    passed: Vec<bool>,
}

impl Scoreboard {
    pub fn new(descriptors: &[Value]) -> Self {
        let tests: Vec<SuccessTest> = descriptors.iter().map(SuccessTest::from_value).collect();
        let passed = vec![false; tests.len()];
        Self { tests, passed }
    }

    pub fn tests(&self) -> &[SuccessTest] {
        &self.tests
    }

    pub fn clear(&mut self) {
        self.passed.iter_mut().for_each(|flag| *flag = false);
    }

    /// Record any test that holds now and report the running score.
    pub fn observe(&mut self, snapshot: &Snapshot, base: &Url) -> ScoreDetails {
        for (test, passed) in self.tests.iter().zip(self.passed.iter_mut()) {
            if !*passed && test.passes(snapshot, base) {
                *passed = true;
            }
        }
        self.details()
    }

    pub fn details(&self) -> ScoreDetails {
        let total = self.tests.len() as u32;
        let passed = self.passed.iter().filter(|flag| **flag).count() as u32;
        ScoreDetails {
            raw_score: if total == 0 {
                0.0
            } else {
                f64::from(passed) / f64::from(total)
            },
            success: total > 0 && passed == total,
            tests_passed: passed,
            total_tests: total,
        }
    }
}
