//! Evaluator seam used by the step loop, plus a built-in evaluator that
//! renders pages over plain HTTP.

pub mod errors;
mod page;
mod session;
mod success;

pub use errors::{EvaluatorError, EvaluatorResult};
pub use page::{PageEvaluator, PageEvaluatorConfig, PageEvaluatorFactory, WEB_AGENT_ID_HEADER};
pub use session::{EvaluatorFactory, EvaluatorSession, StatefulEvaluator, StepOutcome};
pub use success::{Scoreboard, SuccessTest, UrlMatch};
