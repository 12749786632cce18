//! Translation of import path literals into source unit names.

use crate::error::{Error, Result};
use crate::remap::Remappings;
use crate::vfs::path;
use crate::vfs::SourceUnitName;

/// Resolves import paths against an importing source unit.
///
/// Resolution is a pure function of the importer name, the import literal,
/// and the session's remapping list; it performs no I/O and, apart from
/// the empty import literal, cannot fail. Whether the produced name can
/// actually be loaded is the dispatcher's problem.
pub struct ImportResolver<'a> {
    remappings: &'a Remappings,
}

impl<'a> ImportResolver<'a> {
    pub fn new(remappings: &'a Remappings) -> Self {
        ImportResolver { remappings }
    }

    /// Resolve the import literal `import_path` found in `importer`.
    ///
    /// A literal starting with `./` or `../` is a relative import and is
    /// rebased onto the importer's directory; anything else is a direct
    /// import and becomes the candidate verbatim, without normalization.
    /// Either way the remapping engine is consulted exactly once on the
    /// candidate.
    pub fn resolve(
        &self,
        importer: &SourceUnitName,
        import_path: &str,
    ) -> Result<SourceUnitName> {
        if import_path.is_empty() {
            return Err(Error::ImportPathEmpty {
                importer: importer.to_string(),
            });
        }

        let candidate = if is_relative(import_path) {
            rebase_relative(importer, import_path)
        } else {
            import_path.to_string()
        };

        let resolved = self.remappings.rewrite(importer.as_str(), &candidate);
        Ok(SourceUnitName::new(resolved))
    }
}

fn is_relative(import_path: &str) -> bool {
    import_path.starts_with("./") || import_path.starts_with("../")
}

/// Rebase a relative import onto the importer's directory.
///
/// The import literal is normalized; the importer is not. The importer
/// only ever loses trailing segments via `strip_last_segment`: once for
/// its own file name, then once per leading `../` of the normalized
/// literal. Walking past the top is absorbed: stripping an empty prefix
/// leaves it empty.
fn rebase_relative(importer: &SourceUnitName, import_path: &str) -> String {
    let normalized = path::normalize(import_path);
    let (parents, tail) = path::count_leading_parent(&normalized);

    let mut prefix = path::strip_last_segment(importer.as_str());
    for _ in 0..parents {
        prefix = path::strip_last_segment(&prefix);
    }

    if prefix.is_empty() {
        tail.to_string()
    } else {
        format!("{prefix}/{tail}")
    }
}
