use std::collections::HashMap;

use log::debug;
use sha2::{Digest, Sha256};

use crate::delivery::Delivery;
use crate::error::EstimateError;
use crate::estimator::Prediction;
use crate::pipeline;

/// Content hash of a delivery table, stable across loads of the same rows.
pub fn table_digest(deliveries: &[Delivery]) -> String {
    let mut hasher = Sha256::new();
    for d in deliveries {
        hasher.update(d.match_id.to_le_bytes());
        hasher.update(d.innings.to_le_bytes());
        hasher.update(d.total_run.to_le_bytes());
        hasher.update([u8::from(d.is_wicket)]);
        for field in [
            &d.batting_team,
            &d.extra_type,
            &d.player_out,
            &d.kind,
            &d.fielders_involved,
        ] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Memoizes `compute_prediction` for one table at a time. Switching to a table
/// with a different digest drops every stored answer.
#[derive(Debug, Default)]
pub struct PredictionCache {
    digest: Option<String>,
    entries: HashMap<(String, u32), Result<Prediction, EstimateError>>,
    pub hits: u64,
    pub misses: u64,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn predict(
        &mut self,
        digest: &str,
        deliveries: &[Delivery],
        team: &str,
        innings: u32,
    ) -> Result<Prediction, EstimateError> {
        if self.digest.as_deref() != Some(digest) {
            if self.digest.is_some() {
                debug!(
                    "delivery table changed; dropping {} cached predictions",
                    self.entries.len()
                );
            }
            self.entries.clear();
            self.digest = Some(digest.to_string());
        }

        let key = (team.to_string(), innings);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return hit.clone();
        }

        self.misses += 1;
        let result = pipeline::compute_prediction(deliveries, team, innings);
        self.entries.insert(key, result.clone());
        result
    }
}
