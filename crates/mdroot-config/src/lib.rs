//! Configuration management for mdroot.
//!
//! Parses `mdroot.toml` with serde and discovers it in the current
//! directory or its parents. [`ConfigOverrides`] are applied after loading.
//!
//! ```toml
//! [front_matter]
//! root_key = "typora-root-url"
//! cache_ttl_ms = 30000
//!
//! [paths]
//! workspace_root = "."
//! default_image_dir = "assets"
//!
//! [preview]
//! wide_ratio = 2.5
//! max_width = 600
//! max_height = 240
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `front_matter.root_key`
//! - `paths.workspace_root`
//! - `paths.default_image_dir`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use mdroot_meta::{DEFAULT_ROOT_KEY, DEFAULT_TTL, FrontMatterStore};
use mdroot_paths::PathResolver;
use mdroot_preview::DisplayPolicy;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdroot.toml";

/// Settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override the workspace root.
    pub workspace_root: Option<PathBuf>,
    /// Override the root hint cache lifetime, in milliseconds.
    pub cache_ttl_ms: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Front matter configuration.
    pub front_matter: FrontMatterConfig,
    /// Path configuration (paths are relative strings from TOML).
    paths: PathsConfigRaw,
    /// Preview sizing configuration.
    pub preview: PreviewConfig,

    /// Resolved path configuration (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Front matter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FrontMatterConfig {
    /// Key holding the root hint.
    pub root_key: String,
    /// Root hint cache lifetime in milliseconds.
    pub cache_ttl_ms: u64,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            root_key: DEFAULT_ROOT_KEY.to_owned(),
            cache_ttl_ms: u64::try_from(DEFAULT_TTL.as_millis()).unwrap_or(30_000),
        }
    }
}

impl FrontMatterConfig {
    /// Cache lifetime as a duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// Raw path configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    workspace_root: Option<String>,
    default_image_dir: Option<String>,
}

/// Resolved path configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Workspace root for `/`-prefixed root hints.
    pub workspace_root: PathBuf,
    /// Directory applied when a document declares no root hint.
    pub default_image_dir: Option<String>,
}

/// Preview sizing configuration.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Aspect ratio above which previews are constrained by width.
    pub wide_ratio: f64,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let policy = DisplayPolicy::default();
        Self {
            wide_ratio: policy.wide_ratio,
            max_width: policy.max_width,
            max_height: policy.max_height,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`paths.workspace_root`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `mdroot.toml` in the current directory and parents, and
    /// falls back to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing,
    /// expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(root) = &overrides.workspace_root {
            self.paths_resolved.workspace_root.clone_from(root);
        }
        if let Some(ttl) = overrides.cache_ttl_ms {
            self.front_matter.cache_ttl_ms = ttl;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            front_matter: FrontMatterConfig::default(),
            paths: PathsConfigRaw::default(),
            preview: PreviewConfig::default(),
            paths_resolved: PathsConfig {
                workspace_root: base.to_path_buf(),
                default_image_dir: None,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.front_matter.root_key =
            expand::expand_env(&self.front_matter.root_key, "front_matter.root_key")?;
        expand::expand_opt(&mut self.paths.workspace_root, "paths.workspace_root")?;
        expand::expand_opt(&mut self.paths.default_image_dir, "paths.default_image_dir")?;
        Ok(())
    }

    /// Resolve the workspace root against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let workspace_root = match self.paths.workspace_root.as_deref() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
        self.paths_resolved = PathsConfig {
            workspace_root,
            default_image_dir: self
                .paths
                .default_image_dir
                .clone()
                .filter(|dir| !dir.trim().is_empty()),
        };
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.front_matter.root_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "front_matter.root_key cannot be empty".to_owned(),
            ));
        }
        let ratio = self.preview.wide_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::Validation(
                "preview.wide_ratio must be a positive number".to_owned(),
            ));
        }
        if self.preview.max_width == 0 {
            return Err(ConfigError::Validation(
                "preview.max_width must be greater than 0".to_owned(),
            ));
        }
        if self.preview.max_height == 0 {
            return Err(ConfigError::Validation(
                "preview.max_height must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Build a front matter store with the configured key and TTL.
    #[must_use]
    pub fn front_matter_store(&self) -> FrontMatterStore {
        FrontMatterStore::new()
            .with_root_key(self.front_matter.root_key.clone())
            .with_ttl(self.front_matter.cache_ttl())
    }

    /// Build a path resolver for the configured workspace.
    #[must_use]
    pub fn path_resolver(&self) -> PathResolver {
        let resolver = PathResolver::new().with_workspace_root(&self.paths_resolved.workspace_root);
        match &self.paths_resolved.default_image_dir {
            Some(dir) => resolver.with_default_dir(dir.clone()),
            None => resolver,
        }
    }

    /// Preview sizing policy.
    #[must_use]
    pub fn display_policy(&self) -> DisplayPolicy {
        DisplayPolicy {
            wide_ratio: self.preview.wide_ratio,
            max_width: self.preview.max_width,
            max_height: self.preview.max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.front_matter.root_key, "typora-root-url");
        assert_eq!(config.front_matter.cache_ttl(), Duration::from_millis(30_000));
        assert_eq!(config.preview, PreviewConfig::default());
        assert_eq!(config.paths_resolved.workspace_root, PathBuf::from("."));
        assert!(config.paths_resolved.default_image_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.front_matter.root_key, "typora-root-url");
        assert_eq!(config.paths_resolved.workspace_root, dir.path());
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_parse_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[front_matter]
root_key = "image-root"
cache_ttl_ms = 5000

[paths]
workspace_root = "site"
default_image_dir = "./img"

[preview]
wide_ratio = 3.0
max_width = 800
max_height = 300
"#,
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.front_matter.root_key, "image-root");
        assert_eq!(config.front_matter.cache_ttl(), Duration::from_secs(5));
        assert_eq!(
            config.paths_resolved,
            PathsConfig {
                workspace_root: dir.path().join("site"),
                default_image_dir: Some("./img".to_owned()),
            }
        );
        assert_eq!(
            config.display_policy(),
            DisplayPolicy {
                wide_ratio: 3.0,
                max_width: 800,
                max_height: 300,
            }
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[preview\nmax_width = 1");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        for content in [
            "[front_matter]\nroot_key = \"\"",
            "[preview]\nwide_ratio = 0.0",
            "[preview]\nwide_ratio = -1.5",
            "[preview]\nmax_width = 0",
            "[preview]\nmax_height = 0",
        ] {
            let path = write_config(dir.path(), content);
            assert!(
                matches!(Config::load(Some(&path), None), Err(ConfigError::Validation(_))),
                "{content} should fail validation"
            );
        }
    }

    #[test]
    fn test_env_expansion() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDROOT_TEST_CONFIG_ROOT", "shared");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[paths]\nworkspace_root = \"${MDROOT_TEST_CONFIG_ROOT}\"\ndefault_image_dir = \"${MDROOT_TEST_CONFIG_UNSET:-media}\"",
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.paths_resolved.workspace_root, dir.path().join("shared"));
        assert_eq!(config.paths_resolved.default_image_dir.as_deref(), Some("media"));
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDROOT_TEST_CONFIG_ROOT");
        }
    }

    #[test]
    fn test_env_expansion_missing_var() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[front_matter]\nroot_key = \"${MDROOT_TEST_CONFIG_NEVER_SET}\"",
        );
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "front_matter.root_key"));
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[front_matter]\ncache_ttl_ms = 100");
        let overrides = ConfigOverrides {
            workspace_root: Some(PathBuf::from("/override")),
            cache_ttl_ms: Some(0),
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();
        assert_eq!(config.paths_resolved.workspace_root, PathBuf::from("/override"));
        assert_eq!(config.front_matter.cache_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let config = Config::load(Some(&path), Some(&ConfigOverrides::default())).unwrap();
        assert_eq!(config.paths_resolved.workspace_root, dir.path());
        assert_eq!(config.front_matter.cache_ttl_ms, 30_000);
    }

    #[test]
    fn test_discover_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(Config::discover_from(&nested), Some(path));
    }

    #[test]
    fn test_builds_components() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[front_matter]\nroot_key = \"image-root\"\n[paths]\ndefault_image_dir = \"media\"",
        );
        let config = Config::load(Some(&path), None).unwrap();

        let store = config.front_matter_store();
        let hint = store.resolve_root_hint("a", "---\nimage-root: ./x\n---\n");
        assert_eq!(hint.map(|h| h.as_str().to_owned()), Some("./x".to_owned()));

        let resolver = config.path_resolver();
        assert_eq!(resolver.workspace_root(), Some(dir.path()));
        assert_eq!(
            resolver.adjust("a.png", None, Path::new("/doc.md")),
            mdroot_paths::join(&["media", "a.png"])
        );
    }
}
