pub mod path;
pub mod resolver;

pub use resolver::ImportResolver;

use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Name of a source unit inside the virtual filesystem.
///
/// A source unit name is an opaque, case-sensitive byte string. It often
/// looks like a path, but the registry never normalizes it: `a/b.sol`,
/// `a//b.sol`, and `a/./b.sol` are three distinct units. Wrapping the
/// string in a nominal type keeps platform path handling (`std::path`) and
/// accidental normalization away from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceUnitName(String);

impl SourceUnitName {
    pub fn new(name: impl Into<String>) -> Self {
        SourceUnitName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceUnitName {
    fn from(name: &str) -> Self {
        SourceUnitName(name.to_string())
    }
}

impl From<String> for SourceUnitName {
    fn from(name: String) -> Self {
        SourceUnitName(name)
    }
}

/// How a source unit entered the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Path given on the command line.
    Cli,
    /// Inline `content` entry from standard JSON input.
    JsonContent,
    /// `urls` entry from standard JSON input, loaded through a callback.
    JsonUrl,
    /// The `-` marker: content read from standard input.
    Stdin,
    /// Loaded on demand by an import callback.
    Callback,
}

impl Origin {
    pub fn tag(&self) -> &'static str {
        match self {
            Origin::Cli => "cli",
            Origin::JsonContent => "json-content",
            Origin::JsonUrl => "json-url",
            Origin::Stdin => "stdin",
            Origin::Callback => "callback",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A source unit: immutable content plus provenance.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Raw content bytes.
    pub content: Bytes,
    /// Input mechanism that produced the unit.
    pub origin: Origin,
    /// Disk path the content was read from, when a loader resolved one.
    /// Diagnostic only; never used for lookups.
    pub disk_path: Option<PathBuf>,
    /// URL or callback name that produced the content, for `urls` entries.
    pub loaded_via: Option<String>,
}

impl SourceUnit {
    pub fn new(content: impl Into<Bytes>, origin: Origin) -> Self {
        SourceUnit {
            content: content.into(),
            origin,
            disk_path: None,
            loaded_via: None,
        }
    }
}

/// The virtual filesystem: an insertion-ordered registry of source units.
///
/// Lookup is by exact name equality. Entries are created once and never
/// removed or replaced for the lifetime of a session; iteration order is
/// insertion order so diagnostics are reproducible.
#[derive(Debug, Default)]
pub struct Vfs {
    units: IndexMap<SourceUnitName, SourceUnit>,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a source unit under `name`.
    ///
    /// Re-inserting byte-equal content under an existing name is a no-op;
    /// differing content fails with `DuplicateSourceUnit`.
    pub fn insert(&mut self, name: SourceUnitName, unit: SourceUnit) -> Result<()> {
        if let Some(existing) = self.units.get(&name) {
            if existing.content == unit.content {
                return Ok(());
            }
            return Err(Error::DuplicateSourceUnit {
                name: name.to_string(),
            });
        }
        self.units.insert(name, unit);
        Ok(())
    }

    pub fn get(&self, name: &SourceUnitName) -> Option<&SourceUnit> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &SourceUnitName) -> bool {
        self.units.contains_key(name)
    }

    /// Iterate units in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SourceUnitName, &SourceUnit)> {
        self.units.iter()
    }

    /// Look up the unit at `index` in insertion order. Lets the import
    /// walk advance a cursor while new units are appended behind it.
    pub fn get_index(&self, index: usize) -> Option<(&SourceUnitName, &SourceUnit)> {
        self.units.get_index(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut vfs = Vfs::new();
        let name = SourceUnitName::from("a.sol");
        vfs.insert(name.clone(), SourceUnit::new("contract A {}", Origin::Cli))
            .unwrap();

        let unit = vfs.get(&name).unwrap();
        assert_eq!(unit.content, Bytes::from("contract A {}"));
        assert_eq!(unit.origin, Origin::Cli);
    }

    #[test]
    fn byte_equal_reinsert_is_noop() {
        let mut vfs = Vfs::new();
        let name = SourceUnitName::from("a.sol");
        vfs.insert(name.clone(), SourceUnit::new("x", Origin::Cli))
            .unwrap();
        vfs.insert(name.clone(), SourceUnit::new("x", Origin::Callback))
            .unwrap();

        assert_eq!(vfs.len(), 1);
        // The first insert wins; the no-op does not rewrite provenance.
        assert_eq!(vfs.get(&name).unwrap().origin, Origin::Cli);
    }

    #[test]
    fn differing_reinsert_fails() {
        let mut vfs = Vfs::new();
        let name = SourceUnitName::from("a.sol");
        vfs.insert(name.clone(), SourceUnit::new("x", Origin::Cli))
            .unwrap();

        let err = vfs
            .insert(name, SourceUnit::new("y", Origin::Cli))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSourceUnit { name } if name == "a.sol"));
    }

    #[test]
    fn names_are_not_normalized() {
        let mut vfs = Vfs::new();
        vfs.insert("a/b.sol".into(), SourceUnit::new("one", Origin::Cli))
            .unwrap();
        vfs.insert("a//b.sol".into(), SourceUnit::new("two", Origin::Cli))
            .unwrap();
        vfs.insert("a/./b.sol".into(), SourceUnit::new("three", Origin::Cli))
            .unwrap();

        assert_eq!(vfs.len(), 3);
        assert_eq!(
            vfs.get(&"a//b.sol".into()).unwrap().content,
            Bytes::from("two")
        );
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut vfs = Vfs::new();
        for name in ["z.sol", "a.sol", "m.sol"] {
            vfs.insert(name.into(), SourceUnit::new(name, Origin::Cli))
                .unwrap();
        }

        let order: Vec<&str> = vfs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, vec!["z.sol", "a.sol", "m.sol"]);
    }
}
