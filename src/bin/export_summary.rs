use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use ipl_predictor::config::AppConfig;
use ipl_predictor::delivery;
use ipl_predictor::export;
use ipl_predictor::pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let data_path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone());
    let out_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export_path.clone());

    if !data_path.exists() {
        return Err(anyhow!(
            "no delivery table at {} (pass a path or set IPL_DATA_PATH)",
            data_path.display()
        ));
    }

    let deliveries = delivery::read_deliveries_from_path(&data_path)
        .with_context(|| format!("read deliveries from {}", data_path.display()))?;
    let estimator = pipeline::fit_estimator(&deliveries).context("fit score model")?;
    let report = export::export_summary(&out_path, &estimator)?;

    println!("Export complete");
    println!("Workbook: {}", out_path.display());
    println!("Innings rows: {}", report.innings_rows);
    println!("Team predictions: {}", report.team_rows);
    if report.insufficient > 0 {
        println!("Team/innings pairs without history: {}", report.insufficient);
    }
    Ok(())
}
