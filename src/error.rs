use thiserror::Error;

/// Failures while reading or aggregating a delivery table. Fatal for the load.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema mismatch: missing required column(s) {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}: column {column} has invalid value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcomes of fitting or querying the estimator that are not a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("Not enough data for {team} in innings {innings}")]
    InsufficientData { team: String, innings: u32 },

    #[error("cannot fit a model on an empty innings table")]
    EmptyTable,

    #[error("model has not been fitted")]
    NotFitted,
}

impl EstimateError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, EstimateError::InsufficientData { .. })
    }
}
