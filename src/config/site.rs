//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    pub posts_dir: String,
    pub drafts_dir: String,
    pub layouts_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    pub markdown_ext: Vec<String>,
    pub default_layout: String,
    pub required_fields: Vec<String>,
    pub future: bool,

    #[serde(default)]
    pub lint: LintConfig,

    // Store any additional fields (the site generator's own settings)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),

            posts_dir: "_posts".to_string(),
            drafts_dir: "_drafts".to_string(),
            layouts_dir: "_layouts".to_string(),
            exclude: Vec::new(),

            markdown_ext: vec!["md".to_string(), "markdown".to_string()],
            default_layout: "post".to_string(),
            required_fields: vec![
                "title".to_string(),
                "layout".to_string(),
                "tags".to_string(),
            ],
            future: true,

            lint: LintConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty _config.yml deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether a front-matter field must be present and non-empty
    pub fn requires(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
    }

    /// Whether a file extension counts as Markdown
    pub fn is_markdown_ext(&self, ext: &str) -> bool {
        self.markdown_ext
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Toggles for the optional checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Every fenced code block must name a language
    pub fence_language: bool,
    /// Front-matter `date` must fall on the filename date
    pub date_mismatch: bool,
    /// Layout must exist in the layouts directory (when it exists)
    pub unknown_layout: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            fence_language: false,
            date_mismatch: true,
            unknown_layout: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "_posts");
        assert!(config.requires("title"));
        assert!(config.requires("layout"));
        assert!(config.requires("tags"));
        assert!(!config.requires("categories"));
        assert!(config.future);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes on Testing
markdown: kramdown
future: false
exclude:
  - "_posts/archive/**"
lint:
  fence_language: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes on Testing");
        assert!(!config.future);
        assert_eq!(config.exclude, vec!["_posts/archive/**"]);
        assert!(config.lint.fence_language);
        assert!(config.lint.date_mismatch);
        assert_eq!(config.posts_dir, "_posts");
        assert!(config.extra.contains_key("markdown"));
    }

    #[test]
    fn test_markdown_ext_case_insensitive() {
        let config = SiteConfig::default();
        assert!(config.is_markdown_ext("MD"));
        assert!(config.is_markdown_ext("markdown"));
        assert!(!config.is_markdown_ext("html"));
    }
}
