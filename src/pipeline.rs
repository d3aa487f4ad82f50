use std::io::Read;

use crate::delivery::{self, Delivery};
use crate::error::{EstimateError, PipelineError};
use crate::estimator::{Prediction, ScoreEstimator};
use crate::innings::{self, SummaryTable};

/// Reads a delivery table and aggregates it in one step.
pub fn load_summary_table<R: Read>(source: R) -> Result<SummaryTable, PipelineError> {
    let deliveries = delivery::read_deliveries(source)?;
    Ok(innings::summarize_innings(&deliveries))
}

/// Aggregate, fit and predict from scratch. Holds no state between calls, so the
/// same inputs always give the same answer.
pub fn compute_prediction(
    deliveries: &[Delivery],
    team: &str,
    innings: u32,
) -> Result<Prediction, EstimateError> {
    fit_estimator(deliveries)?.predict(team, innings)
}

pub fn fit_estimator(deliveries: &[Delivery]) -> Result<ScoreEstimator, EstimateError> {
    let table = innings::summarize_innings(deliveries);
    let mut estimator = ScoreEstimator::new();
    estimator.fit(table)?;
    Ok(estimator)
}
