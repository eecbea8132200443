use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable holding a comma-separated list of search roots
pub const SEARCH_PATHS_ENV: &str = "DEVFLOW_SEARCH_PATHS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration, read from `<config dir>/devflow/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
}

/// Where and how deep project discovery looks
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Search roots; a leading `~` is expanded to the home directory
    pub search_paths: Vec<PathBuf>,
    /// Deepest directory level visited below each root (root is 0)
    pub max_depth: usize,
    /// Directory names never entered, on top of hidden directories
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_paths: [".", "~/dev", "~/Projects", "~/code", "~/workspace"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            max_depth: 3,
            skip_dirs: ["node_modules", "target", "build", "dist"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl DiscoveryConfig {
    /// Search roots with `~` expanded
    pub fn resolved_search_paths(&self) -> Vec<PathBuf> {
        self.search_paths.iter().map(|p| expand_tilde(p)).collect()
    }
}

impl Config {
    /// Load the config file and environment overrides.
    ///
    /// Never fails: a broken file is logged and the defaults are used instead.
    pub fn load() -> Self {
        let mut config = match config_path() {
            Some(path) => match Self::from_file(&path) {
                Ok(Some(config)) => {
                    debug!(path = %path.display(), "loaded config file");
                    config
                }
                Ok(None) => Self::default(),
                Err(e) => {
                    warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_search_paths_override(std::env::var(SEARCH_PATHS_ENV).ok());
        config
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map(Some)
    }

    fn apply_search_paths_override(&mut self, value: Option<String>) {
        let Some(value) = value else {
            return;
        };

        let paths: Vec<PathBuf> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();

        if !paths.is_empty() {
            debug!(count = paths.len(), "search paths overridden from environment");
            self.discovery.search_paths = paths;
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devflow").join("config.toml"))
}

/// Expand a leading `~` to the home directory; other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_roots() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.search_paths.len(), 5);
        assert_eq!(config.search_paths[0], PathBuf::from("."));
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.skip_dirs, vec!["node_modules", "target", "build", "dist"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[discovery]\nmax_depth = 5\n").unwrap();
        assert_eq!(config.discovery.max_depth, 5);
        assert_eq!(config.discovery.search_paths.len(), 5);

        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_toml() {
        let config = Config::from_toml(
            r#"
            [discovery]
            search_paths = ["/srv/code", "~/src"]
            max_depth = 2
            skip_dirs = ["vendor"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.discovery.search_paths,
            vec![PathBuf::from("/srv/code"), PathBuf::from("~/src")]
        );
        assert_eq!(config.discovery.max_depth, 2);
        assert_eq!(config.discovery.skip_dirs, vec!["vendor"]);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = Config::from_toml("[discovery]\nmax_depth = \"deep\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = Config::from_file(&tmp.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_from_file_reads_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[discovery]\nskip_dirs = [\"vendor\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap().unwrap();
        assert_eq!(config.discovery.skip_dirs, vec!["vendor"]);
        assert_eq!(config.discovery.max_depth, 3);
    }

    #[test]
    fn test_from_file_unreadable_is_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file
        let path = tmp.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();

        let err = Config::from_file(&path).unwrap_err();
        match err {
            ConfigError::Read { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_search_paths_override(Some("/a, /b ,".to_string()));
        assert_eq!(
            config.discovery.search_paths,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );

        let mut config = Config::default();
        config.apply_search_paths_override(Some(" , ".to_string()));
        assert_eq!(config, Config::default());

        config.apply_search_paths_override(None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde(Path::new(".")), PathBuf::from("."));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/dev")), home.join("dev"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }
}
