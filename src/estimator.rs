use chrono::Utc;
use log::{debug, info};
use serde::Serialize;

use crate::error::EstimateError;
use crate::innings::{InningsSummary, SummaryTable};
use crate::regression::{self, FEATURE_COUNT, FEATURE_NAMES, LinearModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub team: String,
    pub innings: u32,
    pub samples: usize,
    pub avg_balls: u32,
    pub avg_wickets: u32,
    pub raw_score: f64,
    pub predicted_score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub generated_at: String,
    pub rows: usize,
    pub feature_names: Vec<String>,
    pub coeffs: Vec<f64>,
    pub intercept: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone)]
enum EstimatorState {
    Unfit,
    Ready {
        model: LinearModel,
        table: SummaryTable,
    },
}

/// Score regression over innings summaries. Starts unfit; every `fit` call
/// replaces the previous model and training table.
#[derive(Debug, Clone)]
pub struct ScoreEstimator {
    state: EstimatorState,
}

impl Default for ScoreEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreEstimator {
    pub fn new() -> Self {
        Self {
            state: EstimatorState::Unfit,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, EstimatorState::Ready { .. })
    }

    pub fn model(&self) -> Option<&LinearModel> {
        match &self.state {
            EstimatorState::Ready { model, .. } => Some(model),
            EstimatorState::Unfit => None,
        }
    }

    pub fn table(&self) -> Option<&SummaryTable> {
        match &self.state {
            EstimatorState::Ready { table, .. } => Some(table),
            EstimatorState::Unfit => None,
        }
    }

    pub fn fit(&mut self, table: SummaryTable) -> Result<&LinearModel, EstimateError> {
        let (samples, targets) = training_matrix(&table);
        let model =
            regression::fit_least_squares(&samples, &targets).ok_or(EstimateError::EmptyTable)?;
        info!(
            "fitted score model on {} innings: intercept={:.3} coeffs={:?}",
            table.len(),
            model.intercept,
            model.coeffs
        );
        self.state = EstimatorState::Ready { model, table };
        self.model().ok_or(EstimateError::NotFitted)
    }

    /// Averages the team's historical balls and wickets for this innings (each
    /// truncated toward zero) and runs them through the fitted model. Team names
    /// compare by exact string equality.
    pub fn predict(&self, team: &str, innings: u32) -> Result<Prediction, EstimateError> {
        let EstimatorState::Ready { model, table } = &self.state else {
            return Err(EstimateError::NotFitted);
        };

        let history: Vec<&InningsSummary> = table.matching(team, innings).collect();
        if history.is_empty() {
            debug!("no innings history for {team:?} innings {innings}");
            return Err(EstimateError::InsufficientData {
                team: team.to_string(),
                innings,
            });
        }

        let n = history.len() as f64;
        let mean_balls = history.iter().map(|r| f64::from(r.total_balls)).sum::<f64>() / n;
        let mean_wickets = history.iter().map(|r| f64::from(r.wickets_lost)).sum::<f64>() / n;
        let avg_balls = mean_balls.trunc() as u32;
        let avg_wickets = mean_wickets.trunc() as u32;

        let raw_score = model.predict([
            f64::from(avg_balls),
            f64::from(avg_wickets),
            f64::from(innings),
        ]);

        Ok(Prediction {
            team: team.to_string(),
            innings,
            samples: history.len(),
            avg_balls,
            avg_wickets,
            raw_score,
            predicted_score: raw_score.trunc() as i64,
        })
    }

    pub fn report(&self) -> Result<ModelReport, EstimateError> {
        let EstimatorState::Ready { model, table } = &self.state else {
            return Err(EstimateError::NotFitted);
        };
        let (samples, targets) = training_matrix(table);
        Ok(ModelReport {
            generated_at: Utc::now().to_rfc3339(),
            rows: table.len(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coeffs: model.coeffs.to_vec(),
            intercept: model.intercept,
            r_squared: model.r_squared(&samples, &targets),
        })
    }
}

pub fn features(row: &InningsSummary) -> [f64; FEATURE_COUNT] {
    [
        f64::from(row.total_balls),
        f64::from(row.wickets_lost),
        f64::from(row.innings),
    ]
}

fn training_matrix(table: &SummaryTable) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    let samples = table.rows().iter().map(features).collect();
    let targets = table.rows().iter().map(|r| r.final_score as f64).collect();
    (samples, targets)
}
