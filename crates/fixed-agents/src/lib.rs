//! Hardcoded agents for exercising the evaluation service without a model.

mod errors;
mod policy;
mod protocol;
mod server;

pub use errors::PolicyError;
pub use policy::{
    ActPolicy, DirectNavigatePolicy, IdlePolicy, LinkScanPolicy, PolicyKind, DEFAULT_LINK_PATTERN,
    DEFAULT_TARGET_URL,
};
pub use protocol::{ActResponse, StepRequest};
pub use server::router;
