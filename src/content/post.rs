//! Post model

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use super::filename::PostName;
use super::frontmatter::FrontMatter;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// File stem, `YYYY-MM-DD-slug` for published posts
    pub id: String,

    /// Slug (URL-friendly name), unique across the site
    pub slug: String,

    /// Publication date, from the filename (file mtime for drafts)
    pub date: NaiveDate,

    /// `date` as written in the front-matter, if any
    pub front_date: Option<String>,

    /// Post title
    pub title: String,

    /// Layout template to use
    pub layout: String,

    /// Post tags
    pub tags: BTreeSet<String>,

    /// Whether the front-matter has a `tags` key, even an empty one
    #[serde(skip)]
    pub tags_declared: bool,

    /// Post categories
    pub categories: Vec<String>,

    /// Whether the post is published
    pub published: bool,

    /// Whether the post lives in the drafts directory
    pub draft: bool,

    /// Raw markdown body
    #[serde(skip)]
    pub body: String,

    /// File line the body starts on
    pub body_line: usize,

    /// Source file path (relative to the site root)
    pub source: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(skip)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Assemble a post from its parsed name and front-matter
    pub fn new(name: PostName, date: NaiveDate, fm: FrontMatter, default_layout: &str) -> Self {
        Self {
            id: name.id,
            slug: name.slug,
            date,
            front_date: fm.date,
            title: fm.title.unwrap_or_default(),
            layout: fm.layout.unwrap_or_else(|| default_layout.to_string()),
            tags_declared: fm.tags.is_some(),
            tags: fm.tags.unwrap_or_default().into_iter().collect(),
            categories: fm.categories,
            published: fm.published.unwrap_or(true),
            draft: false,
            body: String::new(),
            body_line: 1,
            source: String::new(),
            full_source: PathBuf::new(),
            extra: fm.extra,
        }
    }

    /// Whether a front-matter field carries a non-empty value. An empty
    /// `tags` list still counts: untagged posts say so with `tags: []`.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            "title" => !self.title.trim().is_empty(),
            "layout" => !self.layout.trim().is_empty(),
            "tags" => self.tags_declared,
            "categories" => !self.categories.is_empty(),
            "date" => self
                .front_date
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty()),
            other => match self.extra.get(other) {
                None | Some(serde_yaml::Value::Null) => false,
                Some(serde_yaml::Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            },
        }
    }
}
