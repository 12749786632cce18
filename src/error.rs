use thiserror::Error;

/// Error surface of the resolution core.
///
/// Each variant carries enough context to identify the offending source
/// unit, importer, or rule without access to the session that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// A remapping argument could not be parsed (empty prefix, no `=`).
    #[error("invalid remapping '{rule}': {reason}")]
    InvalidRemapping { rule: String, reason: String },

    /// An insert would overwrite an existing source unit with different bytes.
    #[error("source unit '{name}' already exists with different content")]
    DuplicateSourceUnit { name: String },

    /// No loader callback produced content for the source unit.
    #[error("source '{name}' not found{}", import_context(.importer))]
    FileNotFound {
        name: String,
        importer: Option<String>,
    },

    /// A loader located the file but reading it failed.
    #[error("i/o error reading '{name}': {details}")]
    Io { name: String, details: String },

    /// The host filesystem loader refused a path outside the allow-list.
    #[error("path '{path}' is outside the allowed directories")]
    Forbidden { path: String },

    /// An import statement contained an empty path literal.
    #[error("empty import path in '{importer}'")]
    ImportPathEmpty { importer: String },
}

impl Error {
    /// Stable kind tag, used by the JSON result object.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidRemapping { .. } => "InvalidRemapping",
            Error::DuplicateSourceUnit { .. } => "DuplicateSourceUnit",
            Error::FileNotFound { .. } => "FileNotFound",
            Error::Io { .. } => "IOError",
            Error::Forbidden { .. } => "Forbidden",
            Error::ImportPathEmpty { .. } => "ImportPathEmpty",
        }
    }
}

fn import_context(importer: &Option<String>) -> String {
    match importer {
        Some(name) => format!(" (imported from '{name}')"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
