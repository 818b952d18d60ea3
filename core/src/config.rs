use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::model::features::{FormFeatures, DEFAULT_MINIMUM_ORDER};
use crate::repository::file::CsvOrderSink;
use crate::repository::menu::DEFAULT_MENU_FILE;
use crate::repository::sheets::{resolve_credentials, GoogleSheetsSink, CREDENTIALS_ENV};
use crate::repository::traits::{Destination, OrderSink, UnavailableSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Csv,
    Sheets,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub menu_file: PathBuf,
    pub sink: SinkKind,
    pub spreadsheet: String,
    pub worksheet: String,
    pub data_dir: Option<PathBuf>,
    pub credentials_file: Option<PathBuf>,
    pub features: FormFeatures,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sink = match var("TIFFIN_SINK").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("csv") => SinkKind::Csv,
            Some("sheets") | Some("gsheets") => SinkKind::Sheets,
            Some(other) => return Err(anyhow!("Unknown TIFFIN_SINK '{}': expected csv or sheets", other)),
        };

        let mut features = match var("TIFFIN_FEATURES") {
            Some(list) => FormFeatures::default().with_list(&list)?,
            None => FormFeatures::default(),
        };
        features.minimum_order_value = match var("TIFFIN_MIN_ORDER") {
            None => Some(DEFAULT_MINIMUM_ORDER),
            Some(v) if v.eq_ignore_ascii_case("off") => None,
            Some(v) => {
                let min: u32 = v.trim().parse()
                    .map_err(|_| anyhow!("TIFFIN_MIN_ORDER must be a number or 'off', got '{}'", v))?;
                (min > 0).then_some(min)
            }
        };

        Ok(Self {
            menu_file: var("TIFFIN_MENU_FILE").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_MENU_FILE)),
            sink,
            spreadsheet: var("TIFFIN_SPREADSHEET").unwrap_or_else(|| "TiffinOrderSheet".into()),
            worksheet: var("TIFFIN_WORKSHEET").unwrap_or_else(|| "Sheet1".into()),
            data_dir: var("TIFFIN_DATA_DIR").map(PathBuf::from),
            credentials_file: var("TIFFIN_CREDENTIALS_FILE").map(PathBuf::from),
            features,
        })
    }

    pub fn destination(&self) -> Destination {
        Destination::new(&self.spreadsheet, &self.worksheet)
    }

    pub fn build_sink(&self) -> Result<Box<dyn OrderSink>> {
        match self.sink {
            SinkKind::Csv => Ok(Box::new(CsvOrderSink::new(self.data_dir.clone())?)),
            SinkKind::Sheets => {
                let env_json = env::var(CREDENTIALS_ENV).ok();
                let key = resolve_credentials(env_json.as_deref(), self.credentials_file.as_deref())?;
                Ok(Box::new(GoogleSheetsSink::new(key)?))
            }
        }
    }

    /// Like `build_sink`, but a broken sink setup only disables submission.
    pub fn build_sink_or_unavailable(&self) -> Box<dyn OrderSink> {
        match self.build_sink() {
            Ok(sink) => sink,
            Err(e) => {
                warn!("order sink unavailable: {:#}", e);
                Box::new(UnavailableSink::new(format!("{:#}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.menu_file, PathBuf::from("day-menu.yaml"));
        assert_eq!(cfg.sink, SinkKind::Csv);
        assert_eq!(cfg.destination(), Destination::new("TiffinOrderSheet", "Sheet1"));
        assert_eq!(cfg.features, FormFeatures::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("TIFFIN_SINK", "Sheets"),
            ("TIFFIN_WORKSHEET", "Orders"),
            ("TIFFIN_FEATURES", "bread,zero_masala"),
            ("TIFFIN_MIN_ORDER", "off"),
        ]).unwrap();
        assert_eq!(cfg.sink, SinkKind::Sheets);
        assert_eq!(cfg.worksheet, "Orders");
        assert!(cfg.features.bread_choice);
        assert!(!cfg.features.extra_items);
        assert_eq!(cfg.features.minimum_order_value, None);

        assert_eq!(config(&[("TIFFIN_MIN_ORDER", "0")]).unwrap().features.minimum_order_value, None);
        assert_eq!(config(&[("TIFFIN_MIN_ORDER", "150")]).unwrap().features.minimum_order_value, Some(150));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("TIFFIN_SINK", "postgres")]).is_err());
        assert!(config(&[("TIFFIN_MIN_ORDER", "lots")]).is_err());
        assert!(config(&[("TIFFIN_FEATURES", "dessert")]).is_err());
    }

    #[test]
    fn test_csv_sink_builds() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(&[]).unwrap();
        cfg.data_dir = Some(dir.path().to_path_buf());
        assert!(cfg.build_sink().is_ok());
    }
}
