use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output encoding of a rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    /// Guess from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format `{other}` (expected json or yaml)")),
        }
    }
}

/// Pretty-printed JSON with a trailing newline.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| Error::Render(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    serde_yaml_ng::to_string(value).map_err(|e| Error::Render(e.to_string()))
}

pub fn render<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<String, Error> {
    match format {
        Format::Json => to_json(value),
        Format::Yaml => to_yaml(value),
    }
}
