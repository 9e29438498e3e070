//! Content loader - loads posts from the posts and drafts directories

use anyhow::Result;
use chrono::{DateTime, Local};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, Post, PostName, PostStore};
use crate::error::ContentError;
use crate::Blog;

/// A file that could not be turned into a post
#[derive(Debug)]
pub struct LoadFailure {
    /// Source path relative to the site root
    pub source: String,
    pub error: ContentError,
}

/// Everything read from disk in one pass
#[derive(Debug, Default)]
pub struct LoadedSite {
    pub store: PostStore,
    /// Posts that parsed but lost a slug collision; kept so their bodies are
    /// still checked
    pub shadowed: Vec<Post>,
    pub failures: Vec<LoadFailure>,
}

impl LoadedSite {
    /// Every parsed post, stored or shadowed
    pub fn all_posts(&self) -> impl Iterator<Item = &Post> {
        self.store.iter().chain(self.shadowed.iter())
    }
}

/// Loads content from the site directories
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    exclude: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let exclude = blog
            .config
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blog, exclude })
    }

    /// Load posts, and drafts when asked
    pub fn load(&self, include_drafts: bool) -> Result<LoadedSite> {
        let mut site = LoadedSite::default();

        self.load_dir(&self.blog.posts_dir, false, &mut site)?;
        if include_drafts {
            self.load_dir(&self.blog.drafts_dir, true, &mut site)?;
        }

        tracing::debug!(
            "Loaded {} posts ({} shadowed, {} failed)",
            site.store.len(),
            site.shadowed.len(),
            site.failures.len()
        );

        Ok(site)
    }

    fn load_dir(&self, dir: &Path, draft: bool, site: &mut LoadedSite) -> Result<()> {
        if !dir.exists() {
            tracing::debug!("No directory at {:?}, skipping", dir);
            return Ok(());
        }

        let mut posts = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !self.is_post_file(path) {
                continue;
            }

            let source = self.blog.relative(path);
            if self.is_excluded(&source) {
                tracing::debug!("Excluded {}", source);
                continue;
            }

            match self.load_post(path, draft) {
                Ok(mut post) => {
                    post.source = source;
                    tracing::debug!("Loaded {} as `{}`", post.source, post.slug);
                    posts.push(post);
                }
                Err(error) => {
                    tracing::warn!("Failed to load post {}: {}", source, error);
                    site.failures.push(LoadFailure { source, error });
                }
            }
        }

        // The earliest-dated post keeps a contested slug, wherever it lives
        posts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.source.cmp(&b.source)));
        for post in posts {
            if let Err(error) = site.store.insert(post.clone()) {
                site.failures.push(LoadFailure {
                    source: post.source.clone(),
                    error,
                });
                site.shadowed.push(post);
            }
        }

        Ok(())
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path, draft: bool) -> Result<Post, ContentError> {
        let raw = fs::read_to_string(path)?;
        let content = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let name = if draft {
            PostName::draft(stem)
        } else {
            PostName::parse(stem)?
        };

        let (fm, body) = FrontMatter::parse(content)?;
        let body_line = FrontMatter::body_line(content, body);

        let date = match name.date {
            Some(date) => date,
            None => file_modified(path)?,
        };

        let mut post = Post::new(name, date, fm, self.default_layout());
        post.draft = draft;
        post.body = body.to_string();
        post.body_line = body_line;
        post.full_source = path.to_path_buf();

        Ok(post)
    }

    /// Layout for posts that omit one; empty when a layout is required
    fn default_layout(&self) -> &str {
        if self.blog.config.requires("layout") {
            ""
        } else {
            &self.blog.config.default_layout
        }
    }

    fn is_post_file(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.') || n.ends_with('~'))
            .unwrap_or(true);

        !hidden
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.blog.config.is_markdown_ext(e))
                .unwrap_or(false)
    }

    fn is_excluded(&self, source: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(source))
    }
}

/// Calendar day a file was last modified
fn file_modified(path: &Path) -> Result<chrono::NaiveDate, ContentError> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).date_naive())
}

/// Target path for a new post
pub fn new_post_path(blog: &Blog, stem: &str) -> PathBuf {
    blog.posts_dir.join(format!("{}.md", stem))
}
