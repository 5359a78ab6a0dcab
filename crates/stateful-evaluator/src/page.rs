use std::thread;
use std::time::Duration;

use action_primitives::{locate_link, BrowserAction};
use affine_core_types::{Snapshot, Task};
use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{EvaluatorError, EvaluatorResult};
use crate::session::{EvaluatorFactory, StatefulEvaluator, StepOutcome};
use crate::success::Scoreboard;

/// Header carrying the web agent id on every page fetch.
pub const WEB_AGENT_ID_HEADER: &str = "x-web-agent-id";

#[derive(Clone, Debug)]
pub struct PageEvaluatorConfig {
    pub request_timeout: Duration,
    /// Upper bound on a single `WaitAction` sleep.
    pub max_wait: Duration,
}

impl Default for PageEvaluatorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_wait: Duration::from_secs(5),
        }
    }
}

/// Builds a [`PageEvaluator`] per task.
#[derive(Clone, Debug, Default)]
pub struct PageEvaluatorFactory {
    config: PageEvaluatorConfig,
}

impl PageEvaluatorFactory {
    pub fn new(config: PageEvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PageEvaluatorConfig {
        &self.config
    }
}

impl EvaluatorFactory for PageEvaluatorFactory {
    fn create(&self, task: &Task, web_agent_id: &str) -> EvaluatorResult<Box<dyn StatefulEvaluator>> {
        Ok(Box::new(PageEvaluator::new(task, web_agent_id, &self.config)?))
    }
}

/// Evaluator that renders pages with plain HTTP GETs.
///
/// Navigation and link clicks fetch the target page. Typing and scrolling
/// have no effect on a static document.
pub struct PageEvaluator {
    task_id: String,
    start: Url,
    current: Url,
    snapshot: Snapshot,
    board: Scoreboard,
    client: Client,
    web_agent_id: String,
    max_wait: Duration,
}

impl PageEvaluator {
    pub fn new(task: &Task, web_agent_id: &str, config: &PageEvaluatorConfig) -> EvaluatorResult<Self> {
        let start = Url::parse(&task.url).map_err(|source| EvaluatorError::InvalidTaskUrl {
            url: task.url.clone(),
            source,
        })?;
        if !matches!(start.scheme(), "http" | "https") {
            return Err(EvaluatorError::UnsupportedScheme {
                url: task.url.clone(),
                scheme: start.scheme().to_string(),
            });
        }

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            task_id: task.id.clone(),
            current: start.clone(),
            start,
            snapshot: Snapshot::default(),
            board: Scoreboard::new(&task.tests),
            client,
            web_agent_id: web_agent_id.to_string(),
            max_wait: config.max_wait,
        })
    }

    pub fn current_url(&self) -> &Url {
        &self.current
    }

    fn outcome(&mut self) -> StepOutcome {
        let score = self.board.observe(&self.snapshot, &self.start);
        StepOutcome {
            snapshot: self.snapshot.clone(),
            score,
        }
    }

    fn load(&mut self, target: Url) {
        match self.fetch(&target) {
            Ok((final_url, html)) => {
                self.current = final_url;
                self.snapshot = Snapshot::new(html, self.current.as_str());
            }
            Err(err) => {
                warn!(task_id = %self.task_id, url = %target, error = %err, "page fetch failed");
                self.current = target;
                self.snapshot = Snapshot::new(String::new(), self.current.as_str());
            }
        }
    }

    fn fetch(&self, target: &Url) -> Result<(Url, String), reqwest::Error> {
        let response = self
            .client
            .get(target.clone())
            .header(WEB_AGENT_ID_HEADER, &self.web_agent_id)
            .send()?;
        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            debug!(task_id = %self.task_id, url = %final_url, status = %status, "page returned non-success status");
        }
        Ok((final_url, response.text()?))
    }

    fn resolve(&self, raw: &str) -> Option<Url> {
        match self.current.join(raw.trim()) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(task_id = %self.task_id, target = raw, error = %err, "unresolvable url");
                None
            }
        }
    }

    fn apply(&mut self, action: &BrowserAction) {
        match action {
            BrowserAction::Navigate { url } => {
                if let Some(target) = self.resolve(url) {
                    self.load(target);
                }
            }
            BrowserAction::Click { selector } => {
                let href = locate_link(self.snapshot.html_or_empty(), selector)
                    .and_then(|anchor| anchor.href().map(str::to_string));
                match href.and_then(|href| self.resolve(&href)) {
                    Some(target) => self.load(target),
                    None => debug!(task_id = %self.task_id, selector = %selector, "click matched no link"),
                }
            }
            BrowserAction::Wait { time_seconds } => {
                let wanted = Duration::try_from_secs_f64(*time_seconds).unwrap_or(self.max_wait);
                thread::sleep(wanted.min(self.max_wait));
            }
            BrowserAction::Type { .. } | BrowserAction::Scroll { .. } => {
                debug!(task_id = %self.task_id, action = %action, "action has no effect on a static page");
            }
        }
    }
}

impl StatefulEvaluator for PageEvaluator {
    fn reset(&mut self) -> EvaluatorResult<StepOutcome> {
        self.board.clear();
        self.load(self.start.clone());
        Ok(self.outcome())
    }

    fn step(&mut self, action: Option<&BrowserAction>) -> EvaluatorResult<StepOutcome> {
        if let Some(action) = action {
            self.apply(action);
        }
        Ok(self.outcome())
    }

    fn close(&mut self) {
        debug!(task_id = %self.task_id, url = %self.current, "page evaluator closed");
    }
}
