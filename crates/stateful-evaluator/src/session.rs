use action_primitives::BrowserAction;
use affine_core_types::{ScoreDetails, Snapshot, Task};
use tracing::debug;

use crate::errors::{EvaluatorError, EvaluatorResult};

/// What the evaluator reports after a reset or a step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub snapshot: Snapshot,
    pub score: ScoreDetails,
}

/// A scoring session bound to one task.
///
/// `step(None)` is the explicit no-op: time advances, the page does not.
pub trait StatefulEvaluator: Send {
    fn reset(&mut self) -> EvaluatorResult<StepOutcome>;

    fn step(&mut self, action: Option<&BrowserAction>) -> EvaluatorResult<StepOutcome>;

    /// Release whatever the session holds. Called at most once.
    fn close(&mut self);
}

/// Builds evaluator sessions for tasks.
pub trait EvaluatorFactory: Send + Sync {
    fn create(&self, task: &Task, web_agent_id: &str) -> EvaluatorResult<Box<dyn StatefulEvaluator>>;
}

impl<F> EvaluatorFactory for F
where
    F: Fn(&Task, &str) -> EvaluatorResult<Box<dyn StatefulEvaluator>> + Send + Sync,
{
    fn create(&self, task: &Task, web_agent_id: &str) -> EvaluatorResult<Box<dyn StatefulEvaluator>> {
        self(task, web_agent_id)
    }
}

/// Exclusive owner of one evaluator; closes it exactly once, on [`close`]
/// or on drop, whichever comes first.
///
/// [`close`]: EvaluatorSession::close
pub struct EvaluatorSession {
    task_id: String,
    inner: Box<dyn StatefulEvaluator>,
    closed: bool,
}

impl EvaluatorSession {
    pub fn open(
        factory: &dyn EvaluatorFactory,
        task: &Task,
        web_agent_id: &str,
    ) -> EvaluatorResult<Self> {
        let inner = factory.create(task, web_agent_id)?;
        Ok(Self {
            task_id: task.id.clone(),
            inner,
            closed: false,
        })
    }

    pub fn reset(&mut self) -> EvaluatorResult<StepOutcome> {
        self.ensure_open()?;
        self.inner.reset()
    }

    pub fn step(&mut self, action: Option<&BrowserAction>) -> EvaluatorResult<StepOutcome> {
        self.ensure_open()?;
        self.inner.step(action)
    }

    pub fn close(mut self) {
        self.close_inner();
    }

    fn ensure_open(&self) -> EvaluatorResult<()> {
        if self.closed {
            return Err(EvaluatorError::Closed);
        }
        Ok(())
    }

    fn close_inner(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.close();
            debug!(task_id = %self.task_id, "evaluator session closed");
        }
    }
}

impl Drop for EvaluatorSession {
    fn drop(&mut self) {
        self.close_inner();
    }
}
