//! Step loop driving one agent through evaluator sessions.

use action_primitives::BrowserAction;
use affine_core_types::{EvaluateResponse, Task, TaskEvaluationDetail};
use stateful_evaluator::{EvaluatorFactory, EvaluatorSession};
use tracing::{debug, info, info_span, warn};
use url::Url;

use super::config::LoopOptions;
use crate::client::{ActRequest, AgentClient, AgentConnector, AgentReply};
use crate::errors::LoopError;

/// Evaluate one task.
///
/// Agent failures never abort the loop: a failed step applies a no-op.
/// The evaluator session is closed on every exit path.
pub fn run_task(
    task: &Task,
    agent: &dyn AgentClient,
    factory: &dyn EvaluatorFactory,
    options: &LoopOptions,
) -> Result<TaskEvaluationDetail, LoopError> {
    options.validate()?;
    let span = info_span!("task", task_id = %task.id, project = %task.web_project_id);
    let _guard = span.enter();

    let mut session = EvaluatorSession::open(factory, task, &options.web_agent_id)?;
    let initial = session.reset()?;
    let mut snapshot = initial.snapshot;
    let mut score = initial.score;
    let mut history: Vec<BrowserAction> = Vec::new();
    let mut step_index: u32 = 0;
    let mut done = false;

    while step_index < options.max_steps && !done {
        let mut request = ActRequest::for_step(task, &snapshot, step_index);
        if options.include_history {
            request = request.with_history(&history);
        }

        let reply = match agent.act(&request) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(step = step_index, error = %err, "agent step failed; applying no-op");
                AgentReply::empty()
            }
        };

        if reply.actions.len() > 1 {
            debug!(
                step = step_index,
                proposed = reply.actions.len(),
                "agent proposed several actions; using the first"
            );
        }

        let action = reply.first_action();
        match action {
            Some(action) => debug!(step = step_index, action = %action, "applying action"),
            None => debug!(step = step_index, "no action; applying no-op"),
        }
        let outcome = session.step(action)?;
        if let Some(action) = action {
            history.push(action.clone());
        }

        snapshot = outcome.snapshot;
        score = outcome.score;
        done = score.success || (options.honor_agent_done && reply.done);
        step_index += 1;
    }

    session.close();

    info!(
        steps = step_index,
        success = score.success,
        raw_score = score.raw_score,
        tests_passed = score.tests_passed,
        total_tests = score.total_tests,
        "task evaluated"
    );
    Ok(TaskEvaluationDetail::from_score(task, &score, step_index))
}

/// Evaluate `tasks` in order against the agent at `endpoint`.
pub fn evaluate_tasks(
    tasks: &[Task],
    connector: &dyn AgentConnector,
    endpoint: &Url,
    factory: &dyn EvaluatorFactory,
    options: &LoopOptions,
) -> Result<EvaluateResponse, LoopError> {
    options.validate()?;
    let agent = connector.connect(endpoint)?;

    let mut details = Vec::with_capacity(tasks.len());
    for task in tasks {
        details.push(run_task(task, agent.as_ref(), factory, options)?);
    }

    let response = EvaluateResponse::from_details(details);
    info!(
        endpoint = %endpoint,
        evaluated = response.evaluated,
        total_score = response.total_score,
        success_rate = response.success_rate,
        "evaluation finished"
    );
    Ok(response)
}
