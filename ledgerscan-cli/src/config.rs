use anyhow::{Context, Result};
use ledgerscan_ingest::YearScope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::OutputFormat;
use crate::state::{ensure_ledgerscan_home, ledgerscan_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// `auto` or a format id (`maybank`, `pbb`, `rhb`, `cimb`)
    pub bank: String,
    /// Year for `DD/MM` rows when the statement declares none.
    /// Unset means the current calendar year.
    pub default_year: Option<i32>,
    pub year_scope: YearScope,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            bank: "auto".to_string(),
            default_year: None,
            year_scope: YearScope::Document,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ledgerscan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_ledgerscan_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.extract.bank, "auto");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[extract]\ndefault_year = 2024\nyear_scope = \"session\"\n").unwrap();
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.extract.default_year, Some(2024));
        assert_eq!(cfg.extract.year_scope, YearScope::Session);
        assert_eq!(cfg.extract.bank, "auto");
        assert_eq!(cfg.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut cfg = Config::default();
        cfg.extract.bank = "cimb".to_string();
        cfg.output.format = OutputFormat::Csv;
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(toml::from_str::<Config>(&s).unwrap(), cfg);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[extract\n").unwrap();
        assert!(load_config_from(&p).is_err());
    }
}
