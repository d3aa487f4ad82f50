use log::{info, warn};

use crate::cache::{self, PredictionCache};
use crate::delivery::Delivery;
use crate::error::EstimateError;
use crate::estimator::Prediction;
use crate::innings::{self, INNINGS_SELECTOR};
use crate::pipeline;

pub const NOT_ENOUGH_DATA: &str = "Not enough data for selected team and innings.";

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionView {
    Score(Prediction),
    NotEnoughData { team: String, innings: u32 },
    Failed(String),
}

#[derive(Debug)]
pub struct AppState {
    pub source_label: Option<String>,
    pub deliveries: Vec<Delivery>,
    pub digest: String,
    pub teams: Vec<String>,
    pub selected: usize,
    pub innings: u32,
    pub result: Option<PredictionView>,
    pub status: Option<String>,
    pub help_overlay: bool,
    cache: Option<PredictionCache>,
}

impl AppState {
    pub fn new(cache_predictions: bool) -> Self {
        Self {
            source_label: None,
            deliveries: Vec::new(),
            digest: String::new(),
            teams: Vec::new(),
            selected: 0,
            innings: INNINGS_SELECTOR[0],
            result: None,
            status: None,
            help_overlay: false,
            cache: cache_predictions.then(PredictionCache::new),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.deliveries.is_empty()
    }

    pub fn caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Replaces the loaded table. Selection and results from the old table are reset.
    pub fn load(&mut self, label: impl Into<String>, deliveries: Vec<Delivery>) {
        let table = innings::summarize_innings(&deliveries);
        self.teams = table.teams();
        self.digest = cache::table_digest(&deliveries);
        self.deliveries = deliveries;
        self.source_label = Some(label.into());
        self.selected = 0;
        self.result = None;
        self.status = Some(format!(
            "Loaded {} deliveries, {} innings, {} teams",
            self.deliveries.len(),
            table.len(),
            self.teams.len()
        ));
        info!("{}", self.status.as_deref().unwrap_or_default());
    }

    pub fn set_load_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("load failed: {message}");
        self.status = Some(message);
    }

    pub fn selected_team(&self) -> Option<&str> {
        self.teams.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.teams.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_innings(&mut self) {
        let idx = INNINGS_SELECTOR
            .iter()
            .position(|i| *i == self.innings)
            .unwrap_or(0);
        self.innings = INNINGS_SELECTOR[(idx + 1) % INNINGS_SELECTOR.len()];
    }

    /// Re-aggregates and re-fits from the loaded deliveries on every call unless
    /// prediction caching was switched on.
    pub fn predict_selected(&mut self) {
        let Some(team) = self.selected_team().map(str::to_string) else {
            self.status = Some("No data loaded".to_string());
            return;
        };

        let result = match self.cache.as_mut() {
            Some(cache) => cache.predict(&self.digest, &self.deliveries, &team, self.innings),
            None => pipeline::compute_prediction(&self.deliveries, &team, self.innings),
        };

        self.result = Some(match result {
            Ok(prediction) => PredictionView::Score(prediction),
            Err(EstimateError::InsufficientData { team, innings }) => {
                PredictionView::NotEnoughData { team, innings }
            }
            Err(err) => PredictionView::Failed(err.to_string()),
        });
    }

    pub fn result_lines(&self) -> Vec<String> {
        match &self.result {
            None => vec!["Press Enter to predict".to_string()],
            Some(PredictionView::Score(p)) => vec![
                format!("Team: {}", p.team),
                format!("Innings: {}", p.innings),
                format!("Predicted Final Score: {} runs", p.predicted_score),
                format!(
                    "Based on {} innings (avg {} balls, {} wickets)",
                    p.samples, p.avg_balls, p.avg_wickets
                ),
            ],
            Some(PredictionView::NotEnoughData { .. }) => vec![NOT_ENOUGH_DATA.to_string()],
            Some(PredictionView::Failed(msg)) => vec![format!("Prediction failed: {msg}")],
        }
    }
}
