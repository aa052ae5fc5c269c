//! Configuration for condq.
//!
//! CONDQ_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root() / Config::load_from()
//! 2. CONDQ_ROOT environment variable
//! 3. Platform config directory (e.g. ~/.config/condq)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::compile::{CompileOptions, DuplicatePolicy};
use crate::{Error, Result};

/// condq configuration, stored at `<root>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml. Not stored in the file itself.
    #[serde(skip)]
    pub root: PathBuf,

    /// Default output format: text or json.
    #[serde(default = "default_format")]
    pub format: String,

    /// How repeated fields in one chain are handled.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Create a default config rooted at the given directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            format: default_format(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Load config from the resolved root, or defaults if there is no file.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific root.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            config.root = root.to_path_buf();
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to <root>/config.toml, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.config_path(), self.to_toml()?)?;
        Ok(())
    }

    /// Serialized form, as it would be written by [`Config::save`].
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Compiler options implied by this config.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            duplicates: self.duplicates,
        }
    }
}

/// Resolve the config root using the standard resolution order.
pub fn resolve_root() -> Result<PathBuf> {
    // 1. Environment variable
    if let Ok(path) = std::env::var("CONDQ_ROOT") {
        return Ok(PathBuf::from(path));
    }

    // 2. XDG config directory (via directories crate)
    if let Some(proj_dirs) = ProjectDirs::from("", "", "condq") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // 3. Fallback to ~/.config/condq
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".config/condq"))
}
