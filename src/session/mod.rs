pub mod imports;

use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::loader::{HostFsLoader, ImportCallback, LoaderDispatcher};
use crate::remap::{Remapping, Remappings};
use crate::standard_json::{SourceEntry, StandardJsonInput};
use crate::vfs::{path, ImportResolver, Origin, SourceUnit, SourceUnitName, Vfs};

/// Source unit name reserved for content read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// A compilation session: the VFS, the remapping list, the loader stack,
/// and the state needed to build the host loader's allow-list.
///
/// A session is single-threaded and shares nothing with other sessions.
/// Configuration (remappings, base path, allow-list) is written during
/// setup and read-only once the import walk starts; the VFS grows only
/// through the dispatcher.
pub struct Session {
    vfs: Vfs,
    remappings: Remappings,
    dispatcher: LoaderDispatcher,
    base_path: String,
    allow_dirs: Vec<PathBuf>,
    /// Names whose content is deferred to a `urls` fallback list.
    deferred: Vec<SourceUnitName>,
}

impl Session {
    pub fn new(base_path: impl Into<String>) -> Self {
        Session {
            vfs: Vfs::new(),
            remappings: Remappings::new(),
            dispatcher: LoaderDispatcher::new(),
            base_path: base_path.into(),
            allow_dirs: Vec::new(),
            deferred: Vec::new(),
        }
    }

    /// Add a remapping rule. The directory part of its target becomes
    /// readable for the host loader.
    pub fn add_remapping(&mut self, rule: &str) -> Result<()> {
        let parsed: Remapping = rule.parse()?;
        let dir = path::strip_last_segment(&parsed.target);
        if !dir.is_empty() {
            self.allow_dirs.push(PathBuf::from(dir));
        }
        self.remappings.add(parsed);
        Ok(())
    }

    /// Add a source file named on the command line.
    ///
    /// The unit's name is the given path with OS separators rewritten to
    /// `/` and nothing else; `a/./b.sol` on the command line stays
    /// `a/./b.sol` in the VFS. The file's directory becomes readable for
    /// the host loader.
    pub fn add_source_file(&mut self, file: &Path) -> Result<SourceUnitName> {
        let name = SourceUnitName::new(
            file.to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/"),
        );

        let content = fs::read(file).map_err(|err| Error::Io {
            name: name.to_string(),
            details: err.to_string(),
        })?;

        let mut unit = SourceUnit::new(content, Origin::Cli);
        if let Ok(canonical) = fs::canonicalize(file) {
            if let Some(dir) = canonical.parent() {
                self.allow_dirs.push(dir.to_path_buf());
            }
            unit.disk_path = Some(canonical);
        }

        self.vfs.insert(name.clone(), unit)?;
        Ok(name)
    }

    /// Store standard-input content under the reserved `<stdin>` name.
    pub fn add_stdin(&mut self, content: impl Into<Bytes>) -> Result<()> {
        self.vfs.insert(
            SourceUnitName::new(STDIN_NAME),
            SourceUnit::new(content, Origin::Stdin),
        )
    }

    /// Populate the session from a standard JSON description: remappings
    /// from `settings`, inline `content` entries directly, `urls` entries
    /// deferred to the dispatcher.
    pub fn apply_standard_json(&mut self, input: StandardJsonInput) -> Result<()> {
        for rule in &input.settings.remappings {
            self.add_remapping(rule)?;
        }

        for (key, entry) in input.sources {
            let name = SourceUnitName::new(key);
            match entry {
                SourceEntry::Content { content } => {
                    self.vfs
                        .insert(name, SourceUnit::new(content, Origin::JsonContent))?;
                }
                SourceEntry::Urls { urls } => {
                    self.dispatcher.set_url_list(name.clone(), urls);
                    self.deferred.push(name);
                }
            }
        }
        Ok(())
    }

    /// Allow the host loader to read below an extra directory.
    pub fn allow_directory(&mut self, dir: impl Into<PathBuf>) {
        self.allow_dirs.push(dir.into());
    }

    /// Register a custom import callback. Callbacks run in registration
    /// order, before any later registration.
    pub fn register_callback(&mut self, callback: Box<dyn ImportCallback>) {
        self.dispatcher.register(callback);
    }

    /// Register the host filesystem loader, built from the base path and
    /// every allow-list directory known so far. The default host calls
    /// this last, after all inputs and remappings are in.
    pub fn install_host_loader(&mut self) {
        let mut allow = self.allow_dirs.clone();
        if !self.base_path.is_empty() {
            allow.push(PathBuf::from(&self.base_path));
        }
        self.dispatcher
            .register(Box::new(HostFsLoader::new(self.base_path.clone(), &allow)));
    }

    /// Resolve one import literal against an importer, without loading.
    pub fn resolve_import(
        &self,
        importer: &SourceUnitName,
        literal: &str,
    ) -> Result<SourceUnitName> {
        ImportResolver::new(&self.remappings).resolve(importer, literal)
    }

    /// Walk the import graph of everything loaded so far.
    ///
    /// Deferred `urls` entries are loaded first; then each unit's import
    /// literals are resolved and the resulting names loaded on demand,
    /// recursing into new units as they appear. Errors do not stop the
    /// walk; every failure is collected so the host can report them all.
    pub fn resolve_all(&mut self) -> Vec<Error> {
        let mut errors = Vec::new();

        for name in std::mem::take(&mut self.deferred) {
            if let Err(err) = self.dispatcher.ensure_loaded(&mut self.vfs, &name, None) {
                errors.push(err);
            }
        }

        let mut cursor = 0;
        while let Some((name, unit)) = self.vfs.get_index(cursor) {
            cursor += 1;
            let importer = name.clone();
            let literals = imports::scan_imports(&String::from_utf8_lossy(&unit.content));

            let resolver = ImportResolver::new(&self.remappings);
            for literal in literals {
                match resolver.resolve(&importer, &literal) {
                    Ok(target) => {
                        if let Err(err) =
                            self.dispatcher
                                .ensure_loaded(&mut self.vfs, &target, Some(&importer))
                        {
                            errors.push(err);
                        }
                    }
                    Err(err) => errors.push(err),
                }
            }
        }

        errors
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn remappings(&self) -> &Remappings {
        &self.remappings
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Directories the host loader will accept, in the order they became
    /// known. The base path is appended at loader installation.
    pub fn allowed_directories(&self) -> &[PathBuf] {
        &self.allow_dirs
    }
}
