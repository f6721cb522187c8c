use anyhow::{Context, Result};
use ledgerlift_core::{ExtractionStrategy, HeaderMatch, MonthVocabulary, ParserConfig, Profile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_ledgerlift_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
    pub service: ServiceSection,
}

/// Parser knobs. Unset fields fall back to the profile's preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_match: Option<HeaderMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_numeric_columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_column: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_markers: Option<Vec<String>>,
    /// Strict-mode header keyword groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_groups: Option<Vec<Vec<String>>>,
    /// Loose-mode header keywords.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_any_of: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<MonthVocabulary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategies: Option<Vec<ExtractionStrategy>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Base URL of the PDF-to-cells extraction service.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ParserSection {
    /// Build the parser configuration, with `profile` overriding the file's.
    pub fn to_parser_config(&self, profile: Option<Profile>) -> ParserConfig {
        let mut cfg = ParserConfig::for_profile(profile.unwrap_or(self.profile));
        if let Some(mode) = self.header_match {
            cfg = cfg.with_header_match(mode);
        }
        if let Some(n) = self.trailing_numeric_columns {
            cfg = cfg.with_trailing_numeric_columns(n);
        }
        if let Some(b) = self.balance_column {
            cfg = cfg.with_balance_column(b);
        }
        if let Some(markers) = &self.footer_markers {
            cfg.footer_markers = markers.clone();
        }
        if let Some(groups) = &self.header_groups {
            cfg.header.required_groups = groups.clone();
        }
        if let Some(any_of) = &self.header_any_of {
            cfg.header.any_of = any_of.clone();
        }
        if let Some(months) = &self.months {
            cfg.months = months.clone();
        }
        if let Some(strategies) = &self.strategies {
            cfg.strategies = strategies.clone();
        }
        cfg
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlift_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
