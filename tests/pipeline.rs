use std::path::PathBuf;

use ipl_predictor::cache::{PredictionCache, table_digest};
use ipl_predictor::delivery::{self, Delivery};
use ipl_predictor::error::EstimateError;
use ipl_predictor::pipeline::compute_prediction;

fn load_fixture() -> Vec<Delivery> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("ipl_sample.csv");
    delivery::read_deliveries_from_path(&path).expect("fixture should parse")
}

#[test]
fn compute_prediction_is_pure() {
    let rows = load_fixture();
    let first = compute_prediction(&rows, "Mumbai Indians", 1).expect("history exists");
    let second = compute_prediction(&rows, "Mumbai Indians", 1).expect("history exists");
    assert_eq!(first, second);
    assert!((first.raw_score - 5.0).abs() < 1e-6);
}

#[test]
fn compute_prediction_signals_missing_history() {
    let rows = load_fixture();
    let err = compute_prediction(&rows, "Mumbai Indians", 3).expect_err("no third innings");
    assert!(err.is_insufficient_data());
}

#[test]
fn compute_prediction_on_empty_table() {
    assert_eq!(
        compute_prediction(&[], "A", 1),
        Err(EstimateError::EmptyTable)
    );
}

#[test]
fn digest_tracks_table_content() {
    let rows = load_fixture();
    let digest = table_digest(&rows);
    assert_eq!(digest, table_digest(&rows.clone()));
    assert_eq!(digest.len(), 64);

    let mut changed = rows.clone();
    changed[0].total_run += 1;
    assert_ne!(digest, table_digest(&changed));
}

#[test]
fn cache_reuses_answers_for_same_table() {
    let rows = load_fixture();
    let digest = table_digest(&rows);
    let mut cache = PredictionCache::new();

    let first = cache.predict(&digest, &rows, "Chennai Super Kings", 1);
    let second = cache.predict(&digest, &rows, "Chennai Super Kings", 1);
    assert_eq!(first, second);
    assert_eq!(cache.misses, 1);
    assert_eq!(cache.hits, 1);

    let missing = cache.predict(&digest, &rows, "Gujarat Titans", 2);
    assert!(missing.is_err());
    assert_eq!(cache.len(), 2);
}

#[test]
fn cache_drops_entries_when_table_changes() {
    let rows = load_fixture();
    let mut cache = PredictionCache::new();
    let _ = cache.predict(&table_digest(&rows), &rows, "Mumbai Indians", 2);
    assert_eq!(cache.len(), 1);

    let shorter = rows[..7].to_vec();
    let result = cache.predict(&table_digest(&shorter), &shorter, "Mumbai Indians", 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses, 2);
    assert_eq!(result, compute_prediction(&shorter, "Mumbai Indians", 2));
}
