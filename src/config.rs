use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Pipeline configuration. The role-keyword allow-list and the country alias
/// table live here rather than in the parser code so they can be revised
/// without touching parser logic.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub reconcile: ReconcileConfig,
    pub credits: CreditsConfig,
    pub countries: CountryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Fixed source order used for scalar merges and ambiguous-match tie-breaks.
    pub source_priority: Vec<String>,
    /// Only the first N cast entries of a credits document count as the billed cast.
    pub billed_cast_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    /// Role keywords stripped from ledger worker strings. Matched as token
    /// prefixes, so "produce" also covers "producer" and "produced".
    pub role_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryConfig {
    /// Alias → canonical country name. Unmapped values pass through unchanged.
    pub aliases: HashMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        if config.reconcile.source_priority.is_empty() {
            return Err(PipelineError::Config(
                "reconcile.source_priority must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[reconcile]
source_priority = ["omdb", "tmdb", "imdb"]
billed_cast_limit = 15

[credits]
role_keywords = ["produce", "engineer"]

[countries.aliases]
"United States" = "USA"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.reconcile.billed_cast_limit, 15);
        assert_eq!(config.credits.role_keywords.len(), 2);
        assert_eq!(
            config.countries.aliases.get("United States").unwrap(),
            "USA"
        );
    }

    #[test]
    fn test_empty_source_priority_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[reconcile]
source_priority = []
billed_cast_limit = 15

[credits]
role_keywords = []

[countries.aliases]
"#
        )
        .unwrap();

        assert!(Config::load(file.path()).is_err());
    }
}
