//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::ContentError;

const DELIMITER: &str = "---";

/// Render a YAML scalar as the string an author would have meant
fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts any YAML scalar for a string field (`title: 1984` is a title)
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string, number or boolean")),
    }
}

/// Custom deserializer for label lists.
///
/// A list of scalars is taken item by item; a plain string is split on
/// whitespace the way Jekyll splits `tags: ruby testing`.
fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct Labels;

    impl<'de> Visitor<'de> for Labels {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.split_whitespace().map(str::to_string).collect())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<serde_yaml::Value>()? {
                match scalar_to_string(&item) {
                    Some(label) => vec.push(label),
                    None => {
                        return Err(de::Error::custom("list items must be plain strings"));
                    }
                }
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(Labels)
}

/// Like [`labels`], but remembers that the key was written at all
fn declared_labels<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    labels(deserializer).map(Some)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub layout: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub date: Option<String>,
    /// `None` when the key is absent; `tags:` and `tags: []` are both present
    #[serde(deserialize_with = "declared_labels")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "labels")]
    pub categories: Vec<String>,
    /// Posts are published unless they opt out; `published: ~` counts as unset
    pub published: Option<bool>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            layout: None,
            date: None,
            tags: None,
            categories: Vec::new(),
            published: None,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = split_lines(content);
        match lines.next() {
            Some((_, line)) if is_delimiter(line) => {}
            _ => return Err(ContentError::MissingFrontMatter),
        }

        let yaml_start = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
        let (yaml_end, body_start) = lines
            .find(|(_, line)| is_delimiter(line) || line.trim_end() == "...")
            .map(|(offset, line)| (offset, offset + line.len()))
            .ok_or(ContentError::UnterminatedFrontMatter)?;

        let yaml = &content[yaml_start..yaml_end];
        let body = &content[body_start..];

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => Ok((fm, body)),
            Err(e) => {
                // The YAML block starts on line 2 of the file
                let line = e.location().map(|l| l.line() + 1).unwrap_or(2);
                Err(ContentError::InvalidYaml {
                    line,
                    message: strip_location(&e.to_string()).to_string(),
                })
            }
        }
    }

    /// Line of `content` on which `body` starts (1-based).
    ///
    /// `body` must be a suffix of `content`, as returned by [`FrontMatter::parse`].
    pub fn body_line(content: &str, body: &str) -> usize {
        let offset = content.len().saturating_sub(body.len());
        content[..offset].matches('\n').count() + 1
    }

    /// Calendar day named by the `date` field, if it parses
    pub fn parse_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Drop serde_yaml's " at line L column C" suffix, which counts from the
/// start of the YAML block rather than the file
fn strip_location(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(pos) if message[pos..].contains(" column ") => &message[..pos],
        _ => message,
    }
}

/// Iterate lines with their byte offsets, keeping the line terminator
fn split_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse a Jekyll date value in its common spellings
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let zoned = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M %z"];
    for fmt in zoned {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let naive = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in naive {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
