//! Evaluation orchestration
//!
//! The [`Evaluator`] generates one report per request and scores it. An
//! [`EvaluationSession`] owns the runs produced during a batch.

pub mod batch;
pub mod evaluator;
pub mod session;

pub use batch::run_batch;
pub use evaluator::Evaluator;
pub use session::EvaluationSession;
