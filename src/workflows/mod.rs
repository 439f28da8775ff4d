// Workflow orchestration modules
// Each step checks current repository state before mutating it.

pub mod publish;

pub use publish::{PublishOutcome, PublishWorkflow, BRANCH, REMOTE};
