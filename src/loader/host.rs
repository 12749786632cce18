use bytes::Bytes;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ImportCallback, LoadOutcome};
use crate::error::Error;

/// The default import callback: reads source units from the host
/// filesystem.
///
/// This is the only component in the crate that touches the disk, and the
/// only point where platform path semantics (separators, case folding,
/// symlinks) apply; everything before the canonicalization step is plain
/// string work on the UNIX-style name.
pub struct HostFsLoader {
    base_path: String,
    allow_list: Vec<PathBuf>,
}

impl HostFsLoader {
    /// Create a loader with a base path (possibly empty) and the session's
    /// allow-list directories.
    ///
    /// Allow-list entries are canonicalized up front; entries that do not
    /// exist on disk are dropped, since no real path can lie inside them.
    pub fn new(base_path: impl Into<String>, allow_dirs: &[PathBuf]) -> Self {
        let allow_list = allow_dirs
            .iter()
            .filter_map(|dir| fs::canonicalize(dir).ok())
            .collect();
        HostFsLoader {
            base_path: base_path.into(),
            allow_list,
        }
    }

    /// Map a source unit name to the disk path candidate.
    ///
    /// A `file://` prefix is stripped first. With an empty base path the
    /// remainder is used as-is, so absolute names load as absolute disk
    /// paths. A non-empty base path is always prepended; for an
    /// absolute-looking name this is a literal concatenation (double
    /// slashes and all, left for canonicalization to interpret), so such
    /// names resolve under the base path rather than at the filesystem
    /// root.
    fn disk_candidate(&self, name: &str) -> String {
        let stripped = name.strip_prefix("file://").unwrap_or(name);

        if self.base_path.is_empty() {
            return stripped.to_string();
        }
        if stripped.starts_with('/') || self.base_path.ends_with('/') {
            return format!("{}{}", self.base_path, stripped);
        }
        format!("{}/{}", self.base_path, stripped)
    }

    fn is_allowed(&self, canonical: &Path) -> bool {
        self.allow_list.iter().any(|dir| canonical.starts_with(dir))
    }
}

impl ImportCallback for HostFsLoader {
    fn name(&self) -> &str {
        "host-fs"
    }

    fn load(&self, request: &str) -> LoadOutcome {
        let candidate = self.disk_candidate(request);

        let canonical = match fs::canonicalize(&candidate) {
            Ok(path) => path,
            Err(err) if err.kind() == ErrorKind::NotFound => return LoadOutcome::NotFound,
            Err(err) => {
                return LoadOutcome::Error(Error::Io {
                    name: candidate,
                    details: err.to_string(),
                })
            }
        };

        if !self.is_allowed(&canonical) {
            return LoadOutcome::Error(Error::Forbidden {
                path: canonical.display().to_string(),
            });
        }

        match fs::read(&canonical) {
            Ok(content) => LoadOutcome::Contents {
                content: Bytes::from(content),
                disk_path: Some(canonical),
            },
            Err(err) => LoadOutcome::Error(Error::Io {
                name: canonical.display().to_string(),
                details: err.to_string(),
            }),
        }
    }
}
