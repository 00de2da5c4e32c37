//! Survey Configuration Module
//! Question labels of the survey export and the affirmative answer literal.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Column labels are the literal question text of the export header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyConfig {
    /// Literal a respondent answers to count as a bread consumer.
    pub affirmative: String,
    pub consumes: String,
    pub family_size: String,
    pub importance: String,
    pub frequency: String,
    pub bread_type: String,
    pub purchase_location: String,
    pub packaged_decision: String,
    pub brand: String,
    pub package_size: String,
    pub packaged_reason: String,
    pub packaged_frequency: String,
    pub timestamp: Option<String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            affirmative: "Si".to_string(),
            consumes: "¿Consume pan?".to_string(),
            family_size: "Número de integrantes de la familia".to_string(),
            importance: "¿Qué tan importante es la ingesta de pan diariamente? 1 al 5, siendo 5 la más importante".to_string(),
            frequency: "Con que frecuencia consume pan".to_string(),
            bread_type: "Cuando compra pan, ¿Qué prefiere usted?".to_string(),
            purchase_location: "Al momento de comprar pan, ¿Donde lo realiza?".to_string(),
            packaged_decision: "¿Qué variable considera al momento de comprar pan envasado?".to_string(),
            brand: "¿Qué marca de pan envasado prefiere?".to_string(),
            package_size: "Respecto al tamaño del envase,¿Cuál prefiere?".to_string(),
            packaged_reason: "¿Porque razón compra pan envasado principalmente?".to_string(),
            packaged_frequency: "¿Con qué frecuencia consume pan envasado?".to_string(),
            timestamp: Some("Marca temporal".to_string()),
        }
    }
}

impl SurveyConfig {
    /// Load overrides from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
