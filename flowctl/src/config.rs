//! Profile configuration: one JSON file under the user config dir holding
//! named profiles, each supplying per-product base URLs plus an API key.
//! A product left without a URL is simply not configured for that profile.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use flowgate::prelude::ClientConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingestion_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queryflow_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_url: Option<String>,
}

impl Profile {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            core_url: self.core_url.clone(),
            ingestion_url: self.ingestion_url.clone(),
            queryflow_url: self.queryflow_url.clone(),
            staging_url: self.staging_url.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl CliConfig {
    pub fn path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("flowgate").join("flowctl.json")
    }

    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let config = serde_json::from_str(&data).context("parse cli config")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize cli config")?;
        fs::write(&path, data).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Looks up a profile by name. The default profile may be absent (a
    /// fresh install has no config file yet); any other name must exist.
    pub fn profile(&self, name: &str) -> Result<Profile> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => bail!("profile {name:?} is not defined"),
        }
    }
}
