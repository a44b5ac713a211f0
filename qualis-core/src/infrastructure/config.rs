// qualis-core/src/infrastructure/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::limits::AnalyzerLimits;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub limits: AnalyzerLimits,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "qualis".to_string(),
            version: default_version(),
            limits: AnalyzerLimits::default(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Main file discovery
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Base YAML load
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // 3. Env overrides (layering pattern)
    // Allows: QUALIS_INDICATOR_LIMIT=500 qualis check ...
    apply_env_overrides(&mut config);

    // 4. Fail-secure: a config with broken limits stops everything here.
    config
        .limits
        .check()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

/// Loads the project config if one exists, falling back to defaults (env
/// overrides still apply) when the directory carries none.
pub fn load_or_default(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(_)) => {
            let mut config = ProjectConfig::default();
            apply_env_overrides(&mut config);
            config
                .limits
                .check()
                .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["qualis_project.yaml", "qualis.yaml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Some(val) = env_usize("QUALIS_MISSING_DATA_SAMPLE") {
        info!(old = config.limits.missing_data_sample, new = val, "Overriding sample cap via ENV");
        config.limits.missing_data_sample = val;
    }
    if let Some(val) = env_usize("QUALIS_STATS_GROUP_LIMIT") {
        info!(old = config.limits.stats_group_limit, new = val, "Overriding group cap via ENV");
        config.limits.stats_group_limit = val;
    }
    if let Some(val) = env_usize("QUALIS_INDICATOR_LIMIT") {
        info!(old = config.limits.indicator_limit, new = val, "Overriding indicator cap via ENV");
        config.limits.indicator_limit = val;
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
