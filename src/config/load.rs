use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::FlipbookConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: FlipbookConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    fn parse(content: &str) -> Result<FlipbookConfig> {
        let config: FlipbookConfig = serde_json::from_str(content)?;
        if config.version != 1 {
            anyhow::bail!("unsupported config version {}", config.version);
        }
        Ok(config)
    }

    /// Resolve the input image relative to the config file directory.
    pub fn resolve_input(&self) -> Option<PathBuf> {
        self.config
            .input
            .as_ref()
            .map(|input| self.config_dir.join(input))
    }

    /// Resolve the output directory relative to the config file directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(json: &str) -> LoadedConfig {
        LoadedConfig {
            config: LoadedConfig::parse(json).unwrap(),
            config_dir: PathBuf::from("/project/assets"),
        }
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let lc = loaded(r#"{ "input": "hero.png", "output_dir": "out" }"#);

        assert_eq!(
            lc.resolve_input(),
            Some(PathBuf::from("/project/assets/hero.png"))
        );
        assert_eq!(lc.resolve_output_dir(), PathBuf::from("/project/assets/out"));
    }

    #[test]
    fn test_missing_input_stays_unset() {
        assert_eq!(loaded("{}").resolve_input(), None);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        assert!(LoadedConfig::parse(r#"{ "version": 2 }"#).is_err());
    }
}
