//! Content integrity checks over a loaded site

mod diagnostic;

pub use diagnostic::{Diagnostic, Report, Severity};

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::markdown::{self, FenceKind};
use crate::content::{self, LoadFailure, LoadedSite, Post, PostName};
use crate::error::ContentError;
use crate::Blog;

/// Runs every rule over a [`LoadedSite`]
pub struct Checker<'a> {
    blog: &'a Blog,
    today: NaiveDate,
    /// Layout names found in the layouts directory, if it exists
    layouts: Option<HashSet<String>>,
}

impl<'a> Checker<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            today: Local::now().date_naive(),
            layouts: read_layouts(&blog.layouts_dir),
        }
    }

    /// Pin "today" for the future-date rule
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn check(&self, site: &LoadedSite) -> Report {
        let mut diagnostics = Vec::new();

        for failure in &site.failures {
            diagnostics.push(self.failure(failure));
        }

        for post in site.all_posts() {
            self.check_fields(post, &mut diagnostics);
            self.check_dates(post, &mut diagnostics);
            self.check_layout(post, &mut diagnostics);
            self.check_fences(post, &mut diagnostics);
            self.check_post_urls(post, site, &mut diagnostics);
        }

        let files = site.store.len()
            + site.shadowed.len()
            + site
                .failures
                .iter()
                .filter(|f| !matches!(f.error, ContentError::DuplicateSlug { .. }))
                .count();

        Report::new(files, diagnostics)
    }

    fn config(&self) -> &SiteConfig {
        &self.blog.config
    }

    fn failure(&self, failure: &LoadFailure) -> Diagnostic {
        let path = failure.source.as_str();
        let line = failure.error.line();
        match &failure.error {
            ContentError::MissingFrontMatter
            | ContentError::UnterminatedFrontMatter
            | ContentError::InvalidYaml { .. } => {
                Diagnostic::error("front-matter", path, line, failure.error.to_string())
            }
            ContentError::BadFilename(_) | ContentError::BadFilenameDate { .. } => {
                Diagnostic::error("filename", path, line, failure.error.to_string())
            }
            ContentError::DuplicateSlug { slug, existing } => Diagnostic::error(
                "duplicate-slug",
                path,
                None,
                format!(
                    "slug `{}` is already used by {}",
                    slug,
                    self.blog.relative(existing)
                ),
            ),
            ContentError::Io(e) => Diagnostic::error("io", path, None, e.to_string()),
        }
    }

    fn check_fields(&self, post: &Post, out: &mut Vec<Diagnostic>) {
        for field in &self.config().required_fields {
            if !post.has_field(field) {
                // `tags: []` is a valid answer, so only absence counts
                let problem = if field == "tags" {
                    "is missing"
                } else {
                    "is missing or empty"
                };
                out.push(Diagnostic::error(
                    "required-field",
                    &post.source,
                    Some(1),
                    format!("front-matter field `{}` {}", field, problem),
                ));
            }
        }
    }

    fn check_dates(&self, post: &Post, out: &mut Vec<Diagnostic>) {
        if post.draft {
            return;
        }

        if self.config().lint.date_mismatch {
            if let Some(written) = &post.front_date {
                match PostDate::of(post) {
                    PostDate::Unparseable => out.push(Diagnostic::warning(
                        "date-mismatch",
                        &post.source,
                        Some(1),
                        format!("front-matter date `{}` is not a recognised date", written),
                    )),
                    PostDate::Differs(day) => out.push(Diagnostic::warning(
                        "date-mismatch",
                        &post.source,
                        Some(1),
                        format!(
                            "front-matter date {} disagrees with filename date {}",
                            day, post.date
                        ),
                    )),
                    PostDate::Agrees => {}
                }
            }
        }

        if !self.config().future && post.date > self.today {
            out.push(Diagnostic::warning(
                "future-date",
                &post.source,
                None,
                format!("post is dated {}, after today ({})", post.date, self.today),
            ));
        }
    }

    fn check_layout(&self, post: &Post, out: &mut Vec<Diagnostic>) {
        if !self.config().lint.unknown_layout || post.layout.trim().is_empty() {
            return;
        }
        if let Some(layouts) = &self.layouts {
            if !layouts.contains(&post.layout) {
                out.push(Diagnostic::warning(
                    "unknown-layout",
                    &post.source,
                    Some(1),
                    format!(
                        "layout `{}` has no template in {}",
                        post.layout, self.config().layouts_dir
                    ),
                ));
            }
        }
    }

    fn check_fences(&self, post: &Post, out: &mut Vec<Diagnostic>) {
        for fence in markdown::scan_fences(&post.body, post.body_line) {
            if !fence.closed {
                let closer = match fence.kind {
                    FenceKind::Backtick => "a closing ``` line",
                    FenceKind::Tilde => "a closing ~~~ line",
                    FenceKind::Highlight => "{% endhighlight %}",
                };
                out.push(Diagnostic::error(
                    "unterminated-fence",
                    &post.source,
                    Some(fence.line),
                    format!("code block is never closed; expected {}", closer),
                ));
            }
            if self.config().lint.fence_language
                && fence.kind != FenceKind::Highlight
                && fence.language.is_none()
            {
                out.push(Diagnostic::warning(
                    "fence-language",
                    &post.source,
                    Some(fence.line),
                    "code block does not name a language".to_string(),
                ));
            }
        }
    }

    fn check_post_urls(&self, post: &Post, site: &LoadedSite, out: &mut Vec<Diagnostic>) {
        for reference in markdown::post_url_refs(&post.body, post.body_line) {
            let id = reference.id();
            let target = site.all_posts().find(|p| p.id == id);
            if target.is_some_and(|p| p.published) {
                continue;
            }

            if target.is_some() {
                out.push(Diagnostic::error(
                    "broken-post-url",
                    &post.source,
                    Some(reference.line),
                    format!(
                        "`{}` names a post with `published: false`, which is never rendered",
                        reference.target
                    ),
                ));
                continue;
            }

            let mut message = format!("`{}` does not match any post", reference.target);
            let same_slug = PostName::parse(id)
                .ok()
                .and_then(|name| site.store.get(&name.slug));
            if let Some(candidate) = same_slug {
                message.push_str(&format!("; did you mean `{}`?", candidate.id));
            }

            out.push(Diagnostic::error(
                "broken-post-url",
                &post.source,
                Some(reference.line),
                message,
            ));
        }
    }
}

/// How a post's front-matter date relates to its filename date
enum PostDate {
    Agrees,
    Differs(NaiveDate),
    Unparseable,
}

impl PostDate {
    fn of(post: &Post) -> Self {
        let parsed = post.front_date.as_deref().and_then(content::parse_date);

        match parsed {
            None => PostDate::Unparseable,
            Some(day) if day == post.date => PostDate::Agrees,
            Some(day) => PostDate::Differs(day),
        }
    }
}

/// Stems of the files in the layouts directory
fn read_layouts(dir: &Path) -> Option<HashSet<String>> {
    let entries = fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect(),
    )
}
