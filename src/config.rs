use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "IPL.csv";
const DEFAULT_EXPORT_PATH: &str = "ipl_innings_summary.xlsx";
const DEFAULT_LOG_FILE: &str = "ipl_predictor.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub export_path: PathBuf,
    pub log_file: PathBuf,
    pub cache_predictions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            cache_predictions: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` then `.env` (neither is required) and reads `IPL_*`
    /// variables on top of the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(path) = non_empty(lookup("IPL_DATA_PATH")) {
            cfg.data_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty(lookup("IPL_EXPORT_PATH")) {
            cfg.export_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty(lookup("IPL_LOG_FILE")) {
            cfg.log_file = PathBuf::from(path);
        }
        cfg.cache_predictions = lookup("IPL_CACHE_PREDICTIONS")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        cfg
    }

    /// First positional argument wins over `IPL_DATA_PATH`.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        if let Some(path) = args.into_iter().find(|a| !a.starts_with('-')) {
            self.data_path = PathBuf::from(path);
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("IPL_DATA_PATH", "data/balls.csv"),
            ("IPL_CACHE_PREDICTIONS", "true"),
            ("IPL_EXPORT_PATH", "  "),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.data_path, PathBuf::from("data/balls.csv"));
        assert_eq!(cfg.export_path, PathBuf::from(DEFAULT_EXPORT_PATH));
        assert!(cfg.cache_predictions);
    }

    #[test]
    fn positional_arg_wins() {
        let cfg = AppConfig::default().with_args(vec!["--verbose".to_string(), "x.csv".to_string()]);
        assert_eq!(cfg.data_path, PathBuf::from("x.csv"));
    }
}
