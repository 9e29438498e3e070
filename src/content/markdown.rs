//! Scanning of post bodies: code fences and Liquid cross-references

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;
use std::ops::Range;

lazy_static! {
    static ref POST_URL: Regex = Regex::new(r"\{%-?\s*post_url\s+(\S+?)\s*-?%\}").unwrap();
    static ref RAW_OPEN: Regex = Regex::new(r"\{%-?\s*raw\s*-?%\}").unwrap();
    static ref RAW_CLOSE: Regex = Regex::new(r"\{%-?\s*endraw\s*-?%\}").unwrap();
    static ref HIGHLIGHT_OPEN: Regex = Regex::new(r"^\s*\{%-?\s*highlight\s+(\S+)[^%]*-?%\}").unwrap();
    static ref HIGHLIGHT_CLOSE: Regex = Regex::new(r"\{%-?\s*endhighlight\s*-?%\}").unwrap();
}

/// How a code block was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceKind {
    /// ```` ``` ````
    Backtick,
    /// `~~~`
    Tilde,
    /// `{% highlight lang %}` … `{% endhighlight %}`
    Highlight,
}

/// A code block found in a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fence {
    pub kind: FenceKind,
    /// Line of the opening delimiter
    pub line: usize,
    pub language: Option<String>,
    pub closed: bool,
}

/// A `{% post_url ... %}` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    /// Target as written, possibly with a leading directory
    pub target: String,
    pub line: usize,
}

impl PostRef {
    /// The post id the target names (its last path component)
    pub fn id(&self) -> &str {
        self.target
            .rsplit('/')
            .next()
            .unwrap_or(&self.target)
            .trim_end_matches(".md")
    }
}

/// Find code blocks in `body` and whether each one is closed.
///
/// `first_line` is the file line `body` starts on. Markdown fences come from
/// pulldown-cmark, so fences nested in list items and blockquotes are seen;
/// a fence counts as closed when the last line of its block is a run of the
/// opening character at least as long as the opener, with no info string.
/// `{% highlight %}` blocks outside Markdown fences are found line by line.
pub fn scan_fences(body: &str, first_line: usize) -> Vec<Fence> {
    let mut fences = Vec::new();
    let mut fenced: Vec<Range<usize>> = Vec::new();
    let mut quote_depth = 0usize;

    for (event, range) in Parser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::BlockQuote { .. }) => quote_depth += 1,
            Event::End(TagEnd::BlockQuote { .. }) => quote_depth = quote_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let text = &body[range.clone()];
                let mut lines = text.trim_end().lines();
                let opener = lines
                    .next()
                    .map(|l| strip_container(l, quote_depth))
                    .unwrap_or("");
                let Some((ch, len)) = fence_run(opener) else {
                    continue;
                };
                let closed = lines
                    .last()
                    .map(|l| is_closing_fence(strip_container(l, quote_depth), ch, len))
                    .unwrap_or(false);

                fences.push(Fence {
                    kind: if ch == '`' {
                        FenceKind::Backtick
                    } else {
                        FenceKind::Tilde
                    },
                    line: line_at(body, range.start, first_line),
                    language: info_language(&info),
                    closed,
                });
                fenced.push(range);
            }
            _ => {}
        }
    }

    scan_highlights(body, first_line, &fenced, &mut fences);
    fences.sort_by_key(|f| f.line);
    fences
}

/// Find `{% highlight %}` blocks that do not sit inside a Markdown fence
fn scan_highlights(body: &str, first_line: usize, fenced: &[Range<usize>], fences: &mut Vec<Fence>) {
    let mut open: Option<usize> = None;
    let mut offset = 0;

    for (n, line) in body.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();

        if let Some(index) = open {
            if HIGHLIGHT_CLOSE.is_match(line) {
                fences[index].closed = true;
                open = None;
            }
            continue;
        }

        if fenced.iter().any(|r| r.contains(&start)) {
            continue;
        }

        if let Some(caps) = HIGHLIGHT_OPEN.captures(line) {
            fences.push(Fence {
                kind: FenceKind::Highlight,
                line: first_line + n,
                language: Some(caps[1].to_string()),
                // A one-line `{% highlight x %}code{% endhighlight %}` closes itself
                closed: HIGHLIGHT_CLOSE.is_match(line),
            });
            if !fences[fences.len() - 1].closed {
                open = Some(fences.len() - 1);
            }
        }
    }
}

fn line_at(body: &str, offset: usize, first_line: usize) -> usize {
    first_line + body[..offset].matches('\n').count()
}

/// Drop `depth` blockquote markers and any list indentation from a line
fn strip_container(line: &str, depth: usize) -> &str {
    let mut line = line;
    for _ in 0..depth {
        let trimmed = line.trim_start_matches(' ');
        match trimmed.strip_prefix('>') {
            Some(rest) => line = rest,
            None => break,
        }
    }
    line.trim_start()
}

fn fence_run(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn is_closing_fence(line: &str, ch: char, min_len: usize) -> bool {
    match fence_run(line) {
        // `len` counts single-byte characters, so it is also a byte offset
        Some((c, len)) => c == ch && len >= min_len && line[len..].trim().is_empty(),
        None => false,
    }
}

fn info_language(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| c == '{' || c == '}').trim_start_matches('.'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
}

/// Languages of the fenced code blocks in `body`, in document order
pub fn code_languages(body: &str) -> Vec<String> {
    Parser::new_ext(body, Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES)
        .filter_map(|event| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => info_language(&info),
            _ => None,
        })
        .collect()
}

/// Byte ranges covered by `{% raw %}` … `{% endraw %}`; an unclosed raw
/// region runs to the end of the body.
fn raw_regions(body: &str) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(open) = RAW_OPEN.find_at(body, pos) {
        match RAW_CLOSE.find_at(body, open.end()) {
            Some(close) => {
                regions.push(open.start()..close.end());
                pos = close.end();
            }
            None => {
                regions.push(open.start()..body.len());
                break;
            }
        }
    }

    regions
}

/// Find every `{% post_url %}` reference outside raw regions
pub fn post_url_refs(body: &str, first_line: usize) -> Vec<PostRef> {
    let raw = raw_regions(body);

    POST_URL
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if raw.iter().any(|r| r.contains(&whole.start())) {
                return None;
            }
            Some(PostRef {
                target: caps[1].to_string(),
                line: first_line + body[..whole.start()].matches('\n').count(),
            })
        })
        .collect()
}
