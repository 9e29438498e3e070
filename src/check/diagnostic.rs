//! Diagnostics and the report that collects them

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One integrity problem in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: &'static str,
    /// Source path relative to the site root
    pub path: String,
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(rule: &'static str, path: &str, line: Option<usize>, message: String) -> Self {
        Self {
            severity: Severity::Error,
            rule,
            path: path.to_string(),
            line,
            message,
        }
    }

    pub fn warning(rule: &'static str, path: &str, line: Option<usize>, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, path, line, message)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: ", self.path, line)?,
            None => write!(f, "{}: ", self.path)?,
        }
        write!(f, "{} [{}] {}", self.severity, self.rule, self.message)
    }
}

/// Outcome of checking a site
#[derive(Debug, Default, Serialize)]
pub struct Report {
    /// Number of files that were looked at
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Build a report; diagnostics are ordered by path, then line
    pub fn new(files: usize, mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.line.unwrap_or(0).cmp(&b.line.unwrap_or(0)))
                .then_with(|| a.rule.cmp(b.rule))
        });
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        Self {
            files,
            errors,
            warnings: diagnostics.len() - errors,
            diagnostics,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics raised by one rule
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.rule == rule)
    }

    /// One line per diagnostic followed by a summary line
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out.push_str(&format!(
            "Checked {} file{}: {} error{}, {} warning{}\n",
            self.files,
            plural(self.files),
            self.errors,
            plural(self.errors),
            self.warnings,
            plural(self.warnings)
        ));
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
