//! Create a new post

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::new_post_path;
use crate::content::PostName;
use crate::Blog;

/// Front-matter written into a new post when there is no scaffold
#[derive(Serialize)]
struct NewFrontMatter<'a> {
    layout: &'a str,
    title: &'a str,
    tags: &'a [String],
}

/// Create `<posts_dir>/<date>-<slug>.md` and return its path.
///
/// Fails if the slug is already taken by another post or the file exists.
pub fn create_post(
    blog: &Blog,
    title: &str,
    layout: &str,
    tags: &[String],
    date: NaiveDate,
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let site = blog.load(false)?;
    if let Some(existing) = site.store.get(&slug) {
        anyhow::bail!("Slug `{}` is already used by {}", slug, existing.source);
    }

    let file_path = new_post_path(blog, &PostName::stem_for(date, &slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = blog
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", layout));
    let content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
            .replace("{{ title }}", title)
            .replace("{{ layout }}", layout)
            .replace("{{ date }}", &date.format("%Y-%m-%d").to_string())
            .replace("{{ tags }}", &tags.join(" "))
    } else {
        let front = serde_yaml::to_string(&NewFrontMatter {
            layout,
            title,
            tags,
        })?;
        format!("---\n{}---\n\n", front)
    };

    fs::create_dir_all(&blog.posts_dir)?;
    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(
    blog: &Blog,
    title: &str,
    layout: Option<&str>,
    tags: &[String],
    date: Option<NaiveDate>,
) -> Result<PathBuf> {
    let layout = layout.unwrap_or(&blog.config.default_layout);
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    create_post(blog, title, layout, tags, date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post_writes_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();

        let path = create_post(
            &blog,
            "Isolated Testing: Part 1",
            "post",
            &["testing".to_string(), "ruby".to_string()],
            date,
        )
        .unwrap();

        assert!(path.ends_with("_posts/2015-06-01-isolated-testing-part-1.md"));
        let written = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&written).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Isolated Testing: Part 1"));
        assert_eq!(fm.layout.as_deref(), Some("post"));
        assert_eq!(
            fm.tags,
            Some(vec!["testing".to_string(), "ruby".to_string()])
        );
    }

    #[test]
    fn test_create_post_refuses_taken_slug() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let first = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2015, 6, 8).unwrap();

        create_post(&blog, "Isolated Testing", "post", &[], first).unwrap();
        let err = create_post(&blog, "Isolated testing", "post", &[], later).unwrap_err();
        assert!(err.to_string().contains("already used"));
        assert!(!blog
            .posts_dir
            .join("2015-06-08-isolated-testing.md")
            .exists());
    }

    #[test]
    fn test_create_post_refuses_existing_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();

        // Not a post the store knows about, but still a file on disk
        let existing = blog.posts_dir.join("2015-06-01-isolated-testing.md");
        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(&existing, "Notes without front-matter\n").unwrap();

        let err = create_post(&blog, "Isolated Testing", "post", &[], date).unwrap_err();
        assert!(err.to_string().contains("already exists"), "{}", err);
        assert_eq!(
            fs::read_to_string(&existing).unwrap(),
            "Notes without front-matter\n"
        );
    }

    #[test]
    fn test_scaffold_is_used() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\nlayout: {{ layout }}\ntitle: \"{{ title }}\"\ntags: {{ tags }}\n---\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 1, 9).unwrap();

        let path = create_post(&blog, "Profiling", "post", &["elixir".to_string()], date).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "---\nlayout: post\ntitle: \"Profiling\"\ntags: elixir\n---\n"
        );
    }
}
