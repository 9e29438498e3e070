//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::content::markdown;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, include_drafts: bool) -> Result<()> {
    let site = blog.load(include_drafts)?;
    let store = &site.store;

    match content_type {
        "post" | "posts" => {
            let posts = store.chronological();
            println!("Posts ({}):", posts.len());
            for post in posts {
                let status = match (post.draft, post.published) {
                    (true, _) => " (draft)",
                    (false, false) => " (unpublished)",
                    _ => "",
                };
                println!(
                    "  {} - {} [{}]{}",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source,
                    status
                );
            }
        }
        "tag" | "tags" => {
            let mut tags: Vec<_> = store.tags().into_iter().collect();
            println!("Tags ({}):", tags.len());
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "layout" | "layouts" => {
            let layouts = store.layouts();
            println!("Layouts ({}):", layouts.len());
            for (layout, count) in layouts {
                println!("  {} ({})", layout, count);
            }
        }
        "language" | "languages" => {
            let mut languages: BTreeMap<String, usize> = BTreeMap::new();
            for post in store.iter() {
                for lang in markdown::code_languages(&post.body) {
                    *languages.entry(lang).or_insert(0) += 1;
                }
            }
            println!("Code languages ({}):", languages.len());
            let mut languages: Vec<_> = languages.into_iter().collect();
            languages.sort_by(|a, b| b.1.cmp(&a.1));
            for (lang, count) in languages {
                println!("  {} ({})", lang, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, layout, language",
                content_type
            );
        }
    }

    Ok(())
}
