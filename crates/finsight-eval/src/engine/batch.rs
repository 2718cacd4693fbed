//! Batch driver over an eval set

use super::{EvaluationSession, Evaluator};
use crate::case::EvalCase;
use crate::result::EvaluationRun;
use tracing::{info, warn};

/// Evaluate every case in order, recording each run in the session
///
/// A failed run never stops the batch. `on_run` is called after each case
/// with its 1-based position.
pub async fn run_batch<F>(
    evaluator: &Evaluator,
    session: &mut EvaluationSession,
    cases: &[EvalCase],
    mut on_run: F,
) where
    F: FnMut(usize, &EvalCase, &EvaluationRun),
{
    info!(cases = cases.len(), generator = evaluator.generator_name(), "Starting batch evaluation");

    for (i, case) in cases.iter().enumerate() {
        let position = i + 1;
        info!(position, total = cases.len(), company = %case.company_name, "Evaluating test case");

        let run = session.run_evaluation(evaluator, &case.to_request()).await;
        match run.error() {
            Some(error) => warn!(company = %case.company_name, %error, "Test case failed"),
            None => info!(
                company = %case.company_name,
                overall_score = run.overall_score(),
                "Test case scored"
            ),
        }
        on_run(position, case, run);
    }

    info!(
        successful = session.successful().count(),
        failed = session.failed().count(),
        "Batch evaluation finished"
    );
}
