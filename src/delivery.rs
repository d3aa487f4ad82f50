use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use serde::Serialize;

use crate::error::PipelineError;

pub const COL_MATCH_ID: &str = "ID";
pub const COL_BATTING_TEAM: &str = "BattingTeam";
pub const COL_INNINGS: &str = "innings";
pub const COL_TOTAL_RUN: &str = "total_run";
pub const COL_IS_WICKET: &str = "isWicketDelivery";
pub const COL_EXTRA_TYPE: &str = "extra_type";
pub const COL_PLAYER_OUT: &str = "player_out";
pub const COL_KIND: &str = "kind";
pub const COL_FIELDERS: &str = "fielders_involved";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_MATCH_ID,
    COL_BATTING_TEAM,
    COL_INNINGS,
    COL_TOTAL_RUN,
    COL_IS_WICKET,
    COL_EXTRA_TYPE,
    COL_PLAYER_OUT,
    COL_KIND,
    COL_FIELDERS,
];

/// Placeholder written into incidental text fields that were blank in the source.
pub const NONE_SENTINEL: &str = "None";

/// Cell values read as "no value", the same set pandas treats as NA by default.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One ball bowled in one match. A missing batting team is kept as an empty
/// string so the ball still counts towards its innings' ball numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub match_id: u64,
    pub batting_team: String,
    pub innings: u32,
    pub total_run: u32,
    pub is_wicket: bool,
    pub extra_type: String,
    pub player_out: String,
    pub kind: String,
    pub fielders_involved: String,
}

struct ColumnIndex {
    match_id: usize,
    batting_team: usize,
    innings: usize,
    total_run: usize,
    is_wicket: usize,
    extra_type: usize,
    player_out: usize,
    kind: usize,
    fielders: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, PipelineError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::Schema { missing });
        }

        // Every lookup below succeeded in the check above.
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            match_id: at(COL_MATCH_ID),
            batting_team: at(COL_BATTING_TEAM),
            innings: at(COL_INNINGS),
            total_run: at(COL_TOTAL_RUN),
            is_wicket: at(COL_IS_WICKET),
            extra_type: at(COL_EXTRA_TYPE),
            player_out: at(COL_PLAYER_OUT),
            kind: at(COL_KIND),
            fielders: at(COL_FIELDERS),
        })
    }
}

/// Reads a delimited table with a header row. The header is checked before any
/// row is parsed so a foreign schema fails without producing partial output.
///
/// Text cells are kept byte for byte; only numeric cells ignore surrounding
/// whitespace.
pub fn read_deliveries<R: Read>(source: R) -> Result<Vec<Delivery>, PipelineError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        out.push(parse_record(&record, &columns, idx + 1)?);
    }

    debug!("parsed {} delivery rows", out.len());
    Ok(out)
}

pub fn read_deliveries_from_path(path: &Path) -> Result<Vec<Delivery>, PipelineError> {
    let file = File::open(path)?;
    let rows = read_deliveries(file)?;
    info!("loaded {} deliveries from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    row: usize,
) -> Result<Delivery, PipelineError> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    Ok(Delivery {
        match_id: parse_number(cell(columns.match_id), row, COL_MATCH_ID)?,
        batting_team: team_name(cell(columns.batting_team)),
        innings: parse_number(cell(columns.innings), row, COL_INNINGS)?,
        total_run: parse_number(cell(columns.total_run), row, COL_TOTAL_RUN)?,
        is_wicket: parse_flag(cell(columns.is_wicket), row)?,
        extra_type: fill_missing(cell(columns.extra_type)),
        player_out: fill_missing(cell(columns.player_out)),
        kind: fill_missing(cell(columns.kind)),
        fielders_involved: fill_missing(cell(columns.fielders)),
    })
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    row: usize,
    column: &'static str,
) -> Result<T, PipelineError> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<T>() {
        return Ok(v);
    }
    // Exported tables sometimes write integral columns as floats ("1.0").
    if let Some(v) = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && *v >= 0.0)
        .and_then(|v| format!("{v:.0}").parse::<T>().ok())
    {
        return Ok(v);
    }
    Err(PipelineError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}

fn parse_flag(raw: &str, row: usize) -> Result<bool, PipelineError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(PipelineError::InvalidValue {
            row,
            column: COL_IS_WICKET,
            value: raw.to_string(),
        }),
    }
}

pub fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.iter().any(|token| *token == raw)
}

pub fn fill_missing(raw: &str) -> String {
    if is_missing(raw) {
        NONE_SENTINEL.to_string()
    } else {
        raw.to_string()
    }
}

fn team_name(raw: &str) -> String {
    if is_missing(raw) {
        String::new()
    } else {
        raw.to_string()
    }
}

impl Delivery {
    /// False when the source row had no batting team. Such balls are numbered
    /// but never grouped.
    pub fn has_team(&self) -> bool {
        !self.batting_team.is_empty()
    }
}
