use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::OPENAPI_VERSION;
use crate::naming::OperationIdStrategy;
use crate::registry::DEFAULT_MAX_CHAIN;
use crate::render::Format;

/// Project configuration loaded from `.oam.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OamConfig {
    /// Fragment files (JSON or YAML), merged in order.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: Format,
    /// Version string written to the `openapi` field.
    pub openapi: String,
    pub merge: MergeConfig,
    pub servers: ServerOverrides,
    pub resolver: ResolverConfig,
}

impl Default for OamConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("openapi.yaml"),
            format: Format::Yaml,
            openapi: OPENAPI_VERSION.to_string(),
            merge: MergeConfig::default(),
            servers: ServerOverrides::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub operation_id_strategy: OperationIdStrategy,
    /// Fill missing response descriptions with the status reason phrase.
    pub default_response_descriptions: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            operation_id_strategy: OperationIdStrategy::None,
            default_response_descriptions: true,
        }
    }
}

/// Server URLs that replace whatever the fragments declared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerOverrides {
    /// Replaces the document's top-level servers.
    pub global: Vec<String>,
    /// Path template → servers for that path item.
    pub paths: IndexMap<String, Vec<String>>,
    /// operationId → servers for that operation.
    pub operations: IndexMap<String, Vec<String>>,
}

impl ServerOverrides {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.paths.is_empty() && self.operations.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_chain: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oam.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OamConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OamConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oam configuration
inputs:
  - openapi-fragments.yaml
output: openapi.yaml
format: yaml            # json | yaml
openapi: 3.1.0

merge:
  operation_id_strategy: none   # none | method | type_method | route
  default_response_descriptions: true

servers:
  global: []
    # - https://api.example.com
  paths: {}
    # /bookings:
    #   - https://bookings.example.com
  operations: {}
    # getBookingById:
    #   - https://read.example.com

resolver:
  max_chain: 100
"#
}
