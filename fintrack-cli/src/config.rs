use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{config_path, default_store_path};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: ProfileSection,
    pub import: ImportSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    /// IANA zone used for "today" (recurrences, dashboard periods)
    pub timezone: String,
    pub currency_symbol: String,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            currency_symbol: "R$".to_string(),
        }
    }
}

/// Categories pre-filled during `fintrack import`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub default_income_category: Option<String>,
    pub default_expense_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Records file; defaults to ~/.fintrack/records.json
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(p) => Ok(p.clone()),
            None => default_store_path(),
        }
    }

    /// Local wall-clock time in the profile timezone.
    pub fn local_now(&self) -> Result<NaiveDateTime> {
        fintrack_core::time::local_now(&self.profile.timezone)
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
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
    let cfg = Config {
        import: ImportSection {
            default_income_category: Some("Outros".to_string()),
            default_expense_category: None,
        },
        ..Config::default()
    };
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
