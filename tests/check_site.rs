//! End-to-end checks over small throwaway sites

use chrono::NaiveDate;
use postcheck::check::{Checker, Severity};
use postcheck::Blog;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn post(title: &str, tags: &str, body: &str) -> String {
    format!(
        "---\nlayout: post\ntitle: \"{}\"\ntags: [{}]\n---\n\n{}",
        title, tags, body
    )
}

fn clean_site(root: &Path) {
    write(root, "_layouts/post.html", "<article>{{ content }}</article>\n");
    write(
        root,
        "_posts/2015-06-01-isolated-testing.md",
        &post(
            "Isolated Testing",
            "testing",
            "Test one unit at a time.\n\n```ruby\ndescribe Order do\nend\n```\n",
        ),
    );
    write(
        root,
        "_posts/2015-09-12-decorators.md",
        &post(
            "Decorators in Ruby",
            "ruby, patterns",
            "Builds on [isolated testing]({% post_url 2015-06-01-isolated-testing %}).\n\n{% highlight ruby %}\nclass Logged < SimpleDelegator\nend\n{% endhighlight %}\n",
        ),
    );
    write(
        root,
        "_posts/2016-01-09-profiling-a-parser.md",
        &post(
            "Profiling a Parser",
            "elixir, performance",
            "~~~elixir\nlist = [item | list]\n~~~\n\nPrepending is cheap, appending copies.\n",
        ),
    );
}

#[test]
fn clean_site_has_no_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();

    assert!(report.is_clean(), "{}", report.render_text());
    assert_eq!(report.files, 3);

    let site = blog.load(false).unwrap();
    let order: Vec<_> = site
        .store
        .chronological()
        .iter()
        .map(|p| p.slug.clone())
        .collect();
    assert_eq!(
        order,
        vec!["profiling-a-parser", "decorators", "isolated-testing"]
    );
}

#[test]
fn duplicate_slug_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());
    write(
        dir.path(),
        "_posts/2015-06-08-isolated-testing.md",
        &post("Isolated Testing", "testing", "Same post, published twice.\n"),
    );

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();

    let dups: Vec<_> = report.by_rule("duplicate-slug").collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].severity, Severity::Error);
    assert_eq!(dups[0].path, "_posts/2015-06-08-isolated-testing.md");
    assert!(dups[0]
        .message
        .contains("_posts/2015-06-01-isolated-testing.md"));
    assert_eq!(report.files, 4);

    // The first post keeps the slug
    let site = blog.load(false).unwrap();
    assert_eq!(
        site.store.get("isolated-testing").unwrap().id,
        "2015-06-01-isolated-testing"
    );
}

#[test]
fn authoring_mistakes_are_reported_with_lines() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());
    write(
        dir.path(),
        "_posts/2015-07-04-dependency-injection.md",
        "---\nlayout: post\ntitle: \"\"\ntags: [ruby]\ndate: 2015-07-05 10:00:00 +0000\n---\nSee {% post_url 2015-06-02-isolated-testing %}.\n\n```ruby\nclass Service\n  def initialize(repo = Repo.new)\n",
    );
    write(
        dir.path(),
        "_posts/2015-08-01-broken-header.md",
        "---\nlayout: post\ntitle: [unclosed\n---\nBody\n",
    );
    write(
        dir.path(),
        "_posts/2015-08-02-custom.md",
        &post("Custom layout", "misc", "Body\n").replace("layout: post", "layout: essay"),
    );

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();
    let text = report.render_text();

    let di = "_posts/2015-07-04-dependency-injection.md";

    let missing: Vec<_> = report.by_rule("required-field").collect();
    assert_eq!(missing.len(), 1, "{}", text);
    assert_eq!(missing[0].path, di);
    assert!(missing[0].message.contains("`title`"));

    let broken: Vec<_> = report.by_rule("broken-post-url").collect();
    assert_eq!(broken.len(), 1, "{}", text);
    assert_eq!(broken[0].line, Some(7));
    assert!(broken[0]
        .message
        .contains("did you mean `2015-06-01-isolated-testing`"));

    let fences: Vec<_> = report.by_rule("unterminated-fence").collect();
    assert_eq!(fences.len(), 1, "{}", text);
    assert_eq!(fences[0].line, Some(9));

    let dates: Vec<_> = report.by_rule("date-mismatch").collect();
    assert_eq!(dates.len(), 1, "{}", text);
    assert_eq!(dates[0].severity, Severity::Warning);

    let header: Vec<_> = report.by_rule("front-matter").collect();
    assert_eq!(header.len(), 1, "{}", text);
    assert_eq!(header[0].path, "_posts/2015-08-01-broken-header.md");

    let layouts: Vec<_> = report.by_rule("unknown-layout").collect();
    assert_eq!(layouts.len(), 1, "{}", text);
    assert!(layouts[0].message.contains("`essay`"));

    assert_eq!(report.errors, 4);
    assert_eq!(report.warnings, 2);
}

#[test]
fn bad_filenames_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "_posts/isolated-testing.md",
        &post("Isolated Testing", "testing", "Body\n"),
    );
    write(
        dir.path(),
        "_posts/2015-02-30-impossible.md",
        &post("Impossible", "testing", "Body\n"),
    );

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();
    assert_eq!(report.by_rule("filename").count(), 2);
    assert_eq!(report.errors, 2);
}

#[test]
fn future_posts_and_fence_languages_follow_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "_config.yml",
        "future: false\nlint:\n  fence_language: true\n",
    );
    write(
        dir.path(),
        "_posts/2030-01-01-someday.md",
        &post("Someday", "misc", "```\nno language\n```\n"),
    );

    let blog = Blog::new(dir.path()).unwrap();
    let site = blog.load(false).unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let report = Checker::new(&blog).with_today(today).check(&site);

    assert_eq!(report.by_rule("future-date").count(), 1);
    assert_eq!(report.by_rule("fence-language").count(), 1);
    assert_eq!(report.errors, 0);
}

#[test]
fn drafts_are_checked_on_request() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());
    write(
        dir.path(),
        "_drafts/testing-philosophy.md",
        "---\nlayout: post\ntitle: Testing philosophy\ntags: []\n---\n```\nunclosed\n",
    );

    let blog = Blog::new(dir.path()).unwrap();
    assert!(blog.check(false).unwrap().is_clean());

    let report = blog.check(true).unwrap();
    let fences: Vec<_> = report.by_rule("unterminated-fence").collect();
    assert_eq!(fences.len(), 1);
    assert_eq!(fences[0].path, "_drafts/testing-philosophy.md");
    assert_eq!(fences[0].line, Some(6));
}

#[test]
fn tags_key_is_required_but_may_be_empty() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());
    write(
        dir.path(),
        "_posts/2015-10-01-untagged.md",
        "---\nlayout: post\ntitle: Untagged\ntags: []\npublished: ~\n---\nBody\n",
    );
    write(
        dir.path(),
        "_posts/2015-10-02-tagless.md",
        "---\nlayout: post\ntitle: Tagless\n---\nBody\n",
    );

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();
    let text = report.render_text();

    let missing: Vec<_> = report.by_rule("required-field").collect();
    assert_eq!(missing.len(), 1, "{}", text);
    assert_eq!(missing[0].path, "_posts/2015-10-02-tagless.md");
    assert!(missing[0].message.contains("`tags` is missing"));
    assert_eq!(report.errors, 1, "{}", text);
}

#[test]
fn post_url_to_unpublished_post_is_broken() {
    let dir = tempfile::tempdir().unwrap();
    clean_site(dir.path());
    write(
        dir.path(),
        "_posts/2015-11-01-shelved.md",
        "---\nlayout: post\ntitle: Shelved\ntags: []\npublished: false\n---\nNot ready.\n",
    );
    write(
        dir.path(),
        "_posts/2015-11-02-follow-up.md",
        &post(
            "Follow up",
            "misc",
            "As promised in {% post_url 2015-11-01-shelved %}.\n",
        ),
    );

    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.check(false).unwrap();
    let text = report.render_text();

    let broken: Vec<_> = report.by_rule("broken-post-url").collect();
    assert_eq!(broken.len(), 1, "{}", text);
    assert_eq!(broken[0].path, "_posts/2015-11-02-follow-up.md");
    assert_eq!(broken[0].line, Some(7));
    assert!(broken[0].message.contains("published: false"));
}
