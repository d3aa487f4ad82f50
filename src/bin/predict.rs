use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde_json::json;

use ipl_predictor::delivery;
use ipl_predictor::error::EstimateError;
use ipl_predictor::pipeline;

const USAGE: &str = "usage: predict <deliveries.csv> <team> <innings> [--json]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let as_json = args.iter().any(|a| a == "--json");
    let positional = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .cloned()
        .collect::<Vec<_>>();
    let [path, team, innings] = positional.as_slice() else {
        return Err(anyhow!(USAGE));
    };
    let innings = innings
        .trim()
        .parse::<u32>()
        .with_context(|| format!("innings must be a number, got {innings:?}"))?;

    let path = PathBuf::from(path);
    let deliveries = delivery::read_deliveries_from_path(&path)
        .with_context(|| format!("read deliveries from {}", path.display()))?;
    let estimator = pipeline::fit_estimator(&deliveries).context("fit score model")?;

    match estimator.predict(team, innings) {
        Ok(prediction) => {
            if as_json {
                let report = estimator.report()?;
                let out = json!({ "prediction": prediction, "model": report });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Team: {}", prediction.team);
                println!("Innings: {}", prediction.innings);
                println!("Predicted Final Score: {} runs", prediction.predicted_score);
                println!(
                    "Inputs: avg balls {} | avg wickets {} | innings sampled {}",
                    prediction.avg_balls, prediction.avg_wickets, prediction.samples
                );
            }
        }
        Err(EstimateError::InsufficientData { team, innings }) => {
            if as_json {
                let out = json!({ "prediction": null, "team": team, "innings": innings });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Not enough data for {team} in innings {innings}.");
            }
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
