use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "site.json";

/// Top-level site.json schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Directory of markdown pages.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory copied verbatim into the output.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// HTML template with `{{ Title }}` and `{{ Content }}` placeholders.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Output directory. Deleted and recreated on every build.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_template_path() -> PathBuf {
    PathBuf::from("template.html")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            static_dir: default_static_dir(),
            template_path: default_template_path(),
            out_dir: default_out_dir(),
        }
    }
}

/// Per-field overrides from the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub content_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl SiteConfig {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.content_dir {
            self.content_dir = dir;
        }
        if let Some(dir) = overrides.static_dir {
            self.static_dir = dir;
        }
        if let Some(path) = overrides.template_path {
            self.template_path = path;
        }
        if let Some(dir) = overrides.out_dir {
            self.out_dir = dir;
        }
        self
    }

    /// Resolve relative paths against the project root.
    pub fn resolve(self, root: &Path) -> Self {
        Self {
            content_dir: root.join(self.content_dir),
            static_dir: root.join(self.static_dir),
            template_path: root.join(self.template_path),
            out_dir: root.join(self.out_dir),
        }
    }
}

/// Load config from a site.json file, or return defaults if missing.
pub fn load_config(root: &Path) -> Result<SiteConfig> {
    let config_path = root.join(CONFIG_FILE);

    if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: SiteConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    } else {
        Ok(SiteConfig::default())
    }
}
