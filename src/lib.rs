//! postcheck: content model and integrity checks for Jekyll-style blogs
//!
//! A site is a directory of Markdown posts named `YYYY-MM-DD-slug.md`, each
//! opening with YAML front-matter. This crate loads those posts into a
//! slug-keyed store and reports the problems a site generator would trip
//! over: malformed front-matter, duplicate slugs, unclosed code fences and
//! `post_url` links to posts that do not exist.

pub mod check;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog checkout on disk
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Published posts directory
    pub posts_dir: PathBuf,
    /// Drafts directory
    pub drafts_dir: PathBuf,
    /// Layout templates directory
    pub layouts_dir: PathBuf,
}

impl Blog {
    /// Open a blog rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let drafts_dir = base_dir.join(&config.drafts_dir);
        let layouts_dir = base_dir.join(&config.layouts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            drafts_dir,
            layouts_dir,
        })
    }

    /// Load every post, optionally including drafts
    pub fn load(&self, include_drafts: bool) -> Result<content::LoadedSite> {
        content::ContentLoader::new(self)?.load(include_drafts)
    }

    /// Load and check the site
    pub fn check(&self, include_drafts: bool) -> Result<check::Report> {
        let site = self.load(include_drafts)?;
        Ok(check::Checker::new(self).check(&site))
    }

    /// Path relative to the site root, with forward slashes
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
