use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use stencil_compiler_html::CompileOptions;

pub const DEFAULT_CONFIG_NAME: &str = "stencil.config.json";

/// Stencil configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Indentation written by the Cila generator
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Number of render passes
    #[serde(default = "default_passes")]
    pub passes: usize,

    /// Include addresses mapped to Cila files, relative to the config
    #[serde(default)]
    pub includes: BTreeMap<String, String>,

    /// HTML output options
    #[serde(default)]
    pub html: CompileOptions,
}

fn default_indent() -> String {
    "\t".to_string()
}

fn default_passes() -> usize {
    1
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute paths of the configured includes
    pub fn include_paths(&self, cwd: &str) -> Vec<(String, PathBuf)> {
        self.includes
            .iter()
            .map(|(address, path)| (address.clone(), PathBuf::from(cwd).join(path)))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            passes: default_passes(),
            includes: BTreeMap::new(),
            html: CompileOptions::default(),
        }
    }
}
