use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How record ordering is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Every location must be strictly greater than the previous one.
    #[default]
    Strict,
    /// Accept any order; regressions are logged and emitted as they come.
    Lenient,
}

impl FromStr for OrderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(OrderPolicy::Strict),
            "lenient" => Ok(OrderPolicy::Lenient),
            other => Err(format!("unknown order policy: {other}")),
        }
    }
}

/// Escaping applied to text content and attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Write values verbatim.
    #[default]
    None,
    /// Escape markup-significant characters.
    Xml,
}

impl FromStr for EscapeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(EscapeMode::None),
            "xml" => Ok(EscapeMode::Xml),
            other => Err(format!("unknown escape mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    pub order: OrderPolicy,
    pub escape: EscapeMode,
    /// Skip blank lines, `#` comments and the column header row.
    pub skip_preamble: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            order: OrderPolicy::default(),
            escape: EscapeMode::default(),
            skip_preamble: true,
        }
    }
}

impl ConvertOptions {
    pub fn from_json(txt: &str) -> std::result::Result<Self, String> {
        let jd = &mut serde_json::Deserializer::from_str(txt);
        serde_path_to_error::deserialize(jd).map_err(|e| {
            let path = e.path().to_string();
            if path == "." {
                e.into_inner().to_string()
            } else {
                format!("{}: {}", path, e.into_inner())
            }
        })
    }

    /// Load options from a JSON file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)?;
        Self::from_json(&txt).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }
}
