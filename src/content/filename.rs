//! The `YYYY-MM-DD-slug` filename convention

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ContentError;

lazy_static! {
    static ref POST_NAME: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)$").unwrap();
}

/// Date and slug recovered from a post's file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostName {
    /// The whole stem, e.g. `2015-06-01-isolated-testing`; what `post_url` names
    pub id: String,
    pub slug: String,
    /// `None` for drafts, which carry no date in their name
    pub date: Option<NaiveDate>,
}

impl PostName {
    /// Parse a published post's file stem
    pub fn parse(stem: &str) -> Result<Self, ContentError> {
        let caps = POST_NAME
            .captures(stem)
            .ok_or_else(|| ContentError::BadFilename(stem.to_string()))?;

        let date_str = &caps[1];
        let slug = caps[2].trim_matches('-');
        if slug.is_empty() {
            return Err(ContentError::BadFilename(stem.to_string()));
        }

        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            ContentError::BadFilenameDate {
                stem: stem.to_string(),
                date: date_str.to_string(),
            }
        })?;

        Ok(Self {
            id: stem.to_string(),
            slug: slug.to_string(),
            date: Some(date),
        })
    }

    /// Name for a draft, whose stem is the slug itself
    pub fn draft(stem: &str) -> Self {
        Self {
            id: stem.to_string(),
            slug: stem.to_string(),
            date: None,
        }
    }

    /// File stem for a new post
    pub fn stem_for(date: NaiveDate, slug: &str) -> String {
        format!("{}-{}", date.format("%Y-%m-%d"), slug)
    }
}
