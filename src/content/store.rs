//! Post store: posts keyed by slug

use indexmap::IndexMap;
use std::collections::BTreeMap;

use super::Post;
use crate::error::ContentError;

/// Every loaded post, unique per slug, in load order
#[derive(Debug, Default)]
pub struct PostStore {
    posts: IndexMap<String, Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a post. A slug that is already taken is an error; the stored post
    /// is left as it was.
    pub fn insert(&mut self, post: Post) -> Result<(), ContentError> {
        if let Some(existing) = self.posts.get(&post.slug) {
            return Err(ContentError::DuplicateSlug {
                slug: post.slug,
                existing: existing.full_source.clone(),
            });
        }
        self.posts.insert(post.slug.clone(), post);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.get(slug)
    }

    /// Look a post up by its file stem, as `post_url` names it
    pub fn get_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.values().find(|p| p.id == id)
    }

    pub fn contains_slug(&self, slug: &str) -> bool {
        self.posts.contains_key(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    /// Posts sorted by date descending (newest first), slug breaking ties
    pub fn chronological(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        posts
    }

    /// Tag name to number of posts carrying it
    pub fn tags(&self) -> BTreeMap<&str, usize> {
        let mut tags = BTreeMap::new();
        for post in self.posts.values() {
            for tag in &post.tags {
                *tags.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        tags
    }

    /// Layout name to number of posts using it
    pub fn layouts(&self) -> BTreeMap<&str, usize> {
        let mut layouts = BTreeMap::new();
        for post in self.posts.values() {
            *layouts.entry(post.layout.as_str()).or_insert(0) += 1;
        }
        layouts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
