use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::estimator::ScoreEstimator;
use crate::innings::{INNINGS_SELECTOR, InningsSummary, SummaryTable};

pub struct ExportReport {
    pub innings_rows: usize,
    pub team_rows: usize,
    pub insufficient: usize,
}

/// Writes the innings table, the fitted coefficients and per-team predictions
/// to an `.xlsx` workbook.
pub fn export_summary(path: &Path, estimator: &ScoreEstimator) -> Result<ExportReport> {
    let table = estimator
        .table()
        .ok_or_else(|| anyhow!("estimator has no fitted table to export"))?;
    let report = estimator.report().context("build model report")?;

    let innings_rows = innings_sheet_rows(table);

    let mut model_rows = vec![vec!["Term".to_string(), "Value".to_string()]];
    model_rows.push(vec!["intercept".to_string(), format!("{:.6}", report.intercept)]);
    for (name, coeff) in report.feature_names.iter().zip(&report.coeffs) {
        model_rows.push(vec![name.clone(), format!("{coeff:.6}")]);
    }
    model_rows.push(vec!["r_squared".to_string(), format!("{:.6}", report.r_squared)]);
    model_rows.push(vec!["rows".to_string(), report.rows.to_string()]);
    model_rows.push(vec!["generated_at".to_string(), report.generated_at.clone()]);

    let mut team_rows = vec![vec![
        "Team".to_string(),
        "Innings".to_string(),
        "Samples".to_string(),
        "Avg Balls".to_string(),
        "Avg Wickets".to_string(),
        "Predicted Score".to_string(),
    ]];
    let mut insufficient = 0usize;
    for team in table.teams() {
        for innings in INNINGS_SELECTOR {
            match estimator.predict(&team, innings) {
                Ok(p) => team_rows.push(vec![
                    p.team,
                    p.innings.to_string(),
                    p.samples.to_string(),
                    p.avg_balls.to_string(),
                    p.avg_wickets.to_string(),
                    p.predicted_score.to_string(),
                ]),
                Err(err) if err.is_insufficient_data() => insufficient += 1,
                Err(err) => return Err(err).context("predict for export"),
            }
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Innings")?;
        write_rows(sheet, &innings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Model")?;
        write_rows(sheet, &model_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    info!("exported {} innings to {}", table.len(), path.display());
    Ok(ExportReport {
        innings_rows: innings_rows.len() - 1,
        team_rows: team_rows.len() - 1,
        insufficient,
    })
}

fn innings_sheet_rows(table: &SummaryTable) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "ID".to_string(),
        "BattingTeam".to_string(),
        "innings".to_string(),
        "final_score".to_string(),
        "total_balls".to_string(),
        "wickets_lost".to_string(),
    ]];
    rows.extend(table.rows().iter().map(innings_row));
    rows
}

fn innings_row(row: &InningsSummary) -> Vec<String> {
    vec![
        row.match_id.to_string(),
        row.batting_team.clone(),
        row.innings.to_string(),
        row.final_score.to_string(),
        row.total_balls.to_string(),
        row.wickets_lost.to_string(),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
