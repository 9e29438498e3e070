//! Errors raised while reading post content

use std::path::PathBuf;
use thiserror::Error;

/// Problems with a single post file or with the post set as a whole
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("missing front-matter: file must begin with a `---` line")]
    MissingFrontMatter,

    #[error("front-matter opened on line 1 is never closed with `---`")]
    UnterminatedFrontMatter,

    #[error("invalid YAML in front-matter at line {line}: {message}")]
    InvalidYaml { line: usize, message: String },

    #[error("filename `{0}` does not follow the YYYY-MM-DD-slug convention")]
    BadFilename(String),

    #[error("filename `{stem}` carries an invalid date `{date}`")]
    BadFilenameDate { stem: String, date: String },

    #[error("slug `{slug}` is already used by {existing:?}")]
    DuplicateSlug { slug: String, existing: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    /// Line in the source file the error refers to, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            ContentError::MissingFrontMatter | ContentError::UnterminatedFrontMatter => Some(1),
            ContentError::InvalidYaml { line, .. } => Some(*line),
            _ => None,
        }
    }
}
