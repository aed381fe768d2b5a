use anyhow::{Context, Result};
use invreport_core::{default_periods, parse_period_table, FiscalCalendar, FiscalPeriod};
use invreport_ingest::FormatDescriptor;
use invreport_report::Logo;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "invreport.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub report: ReportSection,
    pub calendar: CalendarSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Extract file, relative to the executable's directory unless absolute
    pub raw_file: PathBuf,
    /// Head layout: integers are column widths, strings are skipped literals
    pub format: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Sheet name and output file prefix
    pub name: String,
    pub output_dir: PathBuf,
    pub logos: Vec<Logo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalendarSection {
    /// Period table such as "12/29/2024=Jan, 1/26/2025=Feb"; built-in table if unset
    pub periods: Option<String>,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            raw_file: PathBuf::from("A764Y.TXT"),
            format: FormatDescriptor::inventory_extract().to_values(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            name: "A764Y".to_string(),
            output_dir: PathBuf::from("."),
            logos: vec![
                Logo {
                    row: 0,
                    col: 0,
                    path: PathBuf::from("Logos/UAG.png"),
                },
                Logo {
                    row: 6,
                    col: 0,
                    path: PathBuf::from("Logos/Ingram Micro.png"),
                },
            ],
        }
    }
}

impl Config {
    /// Override from `RAW_FILE`, `NAME` and `FISCAL_PERIODS`.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(raw_file) = get("RAW_FILE") {
            self.input.raw_file = PathBuf::from(raw_file);
        }
        if let Some(name) = get("NAME") {
            self.report.name = name;
        }
        if let Some(periods) = get("FISCAL_PERIODS") {
            self.calendar.periods = Some(periods);
        }
    }

    pub fn format_descriptor(&self) -> Result<FormatDescriptor> {
        FormatDescriptor::from_values(&self.input.format).context("input.format in config")
    }

    pub fn fiscal_periods(&self) -> Result<Vec<FiscalPeriod>> {
        match &self.calendar.periods {
            Some(text) => parse_period_table(text).context("calendar.periods / FISCAL_PERIODS"),
            None => {
                info!("FISCAL_PERIODS not set, using default");
                Ok(default_periods())
            }
        }
    }

    /// Calendar for this run; `report_date` overrides the default last Sunday.
    pub fn calendar(&self, report_date: Option<&str>) -> Result<FiscalCalendar> {
        let mut calendar = FiscalCalendar::with_default_report_date(self.fiscal_periods()?)?;
        if let Some(date) = report_date {
            calendar.set_report_date(date)?;
        }
        Ok(calendar)
    }
}

pub fn default_config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(&Config::default(), path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use invreport_core::CalendarError;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.format_descriptor().unwrap(), FormatDescriptor::inventory_extract());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut cfg = Config::default();
        cfg.calendar.periods = Some("12/29/2024=Jan, 1/26/2025=Feb".into());
        save_config(&cfg, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), cfg);
        init_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[input]
raw_file = "B100.TXT"
format = [6, "  ", 20]

[calendar]
periods = "12/29/2024=Jan"
"#,
        )
        .unwrap();
        assert_eq!(cfg.input.raw_file, PathBuf::from("B100.TXT"));
        assert_eq!(cfg.report, ReportSection::default());
        assert_eq!(cfg.format_descriptor().unwrap().char_len(), 28);
        assert_eq!(cfg.fiscal_periods().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_format_descriptor() {
        let cfg: Config = toml::from_str("[input]\nformat = [6, true]\n").unwrap();
        let err = cfg.format_descriptor().unwrap_err();
        assert!(format!("{err:#}").contains("invalid format descriptor element 1"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RAW_FILE", "C200.TXT"),
            ("NAME", "C200"),
            ("FISCAL_PERIODS", "12/28/2025=Jan;1/25/2026=Feb"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.input.raw_file, PathBuf::from("C200.TXT"));
        assert_eq!(cfg.report.name, "C200");
        let calendar = cfg.calendar(Some("1/4/2026")).unwrap();
        assert_eq!(calendar.current_period().unwrap(), "12/28/2025");
        assert_eq!(calendar.next_period().unwrap(), "1/25/2026");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_bad_report_date_is_reported() {
        let err = Config::default().calendar(Some("2025-03-02")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CalendarError>(),
            Some(&CalendarError::InvalidDateFormat("2025-03-02".into()))
        );
    }
}
