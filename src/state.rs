use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::jira::client::{IssueTracker, JiraClient};
use crate::jira::JiraConfig;
use crate::reference::{load_tables, ReferenceTables};
use crate::DashboardError;

/// Dashboard configuration, read from ~/.bugboard/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory whose JSON files replace the compiled-in reference tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_dir: Option<PathBuf>,
    #[serde(default)]
    pub jira: JiraConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            reference_dir: None,
            jira: JiraConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Environment wins over the file for connection settings.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let set = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = set("JIRA_BASE_URL") {
            self.jira.base_url = v;
        }
        if let Some(v) = set("JIRA_USERNAME") {
            self.jira.username = Some(v);
        }
        if let Some(v) = set("JIRA_API_TOKEN") {
            self.jira.api_token = Some(v);
        }
        if let Some(v) = set("BUGBOARD_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = set("BUGBOARD_REFERENCE_DIR") {
            self.reference_dir = Some(PathBuf::from(v));
        }
    }

    /// Checks that hold whichever source a setting came from.
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.trim().is_empty() {
            return Err("bindAddr is empty".to_string());
        }
        if let Some(dir) = &self.reference_dir {
            if !dir.is_dir() {
                return Err(format!("Reference directory does not exist: {}", dir.display()));
            }
        }
        Ok(())
    }
}

/// `$BUGBOARD_CONFIG`, else ~/.bugboard/config.json
pub fn config_path() -> Result<PathBuf, String> {
    if let Ok(path) = std::env::var("BUGBOARD_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".bugboard").join("config.json"))
}

/// Read a config file. A missing file yields defaults so env-only setups work.
pub fn load_config_from(path: &Path) -> Result<DashboardConfig, String> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(DashboardConfig::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    let config: DashboardConfig =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    config.validate()?;
    Ok(config)
}

/// Read `path`, apply overrides from `var`, then validate the merged result.
pub fn load_config_with(
    path: &Path,
    var: impl Fn(&str) -> Option<String>,
) -> Result<DashboardConfig, String> {
    let mut config = load_config_from(path)?;
    config.apply_env(var);
    config.validate()?;
    Ok(config)
}

/// Load configuration from disk, then apply environment overrides.
pub fn load_config() -> Result<DashboardConfig, String> {
    load_config_with(&config_path()?, |name| std::env::var(name).ok())
}

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub tables: Arc<ReferenceTables>,
    pub classifier: Arc<Classifier>,
    pub tracker: Arc<dyn IssueTracker>,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        tables: ReferenceTables,
        tracker: Arc<dyn IssueTracker>,
    ) -> Self {
        let classifier = Classifier::new(&tables);
        Self {
            config: Arc::new(config),
            tables: Arc::new(tables),
            classifier: Arc::new(classifier),
            tracker,
        }
    }

    /// Load reference tables and build the Jira client from `config`.
    pub fn from_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        let tables = load_tables(config.reference_dir.as_deref())?;
        let client = JiraClient::new(&config.jira)?;
        Ok(Self::new(config, tables, Arc::new(client)))
    }

    pub fn page_size(&self) -> u32 {
        self.config.jira.page_size.clamp(1, 100)
    }
}
