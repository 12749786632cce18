//! On-demand loading of source units that the VFS does not hold yet.

pub mod host;

pub use host::HostFsLoader;

use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::vfs::{Origin, SourceUnit, SourceUnitName, Vfs};

/// Result of asking a single callback for a source unit.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The callback produced content.
    Contents {
        content: Bytes,
        /// Disk path the content was read from, when the callback has one.
        disk_path: Option<PathBuf>,
    },
    /// The callback does not know this name; the next callback is tried.
    NotFound,
    /// The callback failed in a way that aborts the whole load.
    Error(Error),
}

/// A pluggable source loader.
///
/// Hosts may register any number of callbacks; the default CLI host
/// registers the host filesystem loader last.
pub trait ImportCallback {
    /// Short name used in provenance records and diagnostics.
    fn name(&self) -> &str;

    /// Attempt to produce content for `request` (a source unit name, or a
    /// URL from a standard-JSON `urls` list).
    fn load(&self, request: &str) -> LoadOutcome;
}

/// Orders callbacks and URL fallback lists in front of the VFS.
///
/// The dispatcher is the only component that writes to the VFS after
/// initial population, and it loads each name at most once: a name already
/// present is never fetched again.
#[derive(Default)]
pub struct LoaderDispatcher {
    callbacks: Vec<Box<dyn ImportCallback>>,
    url_lists: HashMap<SourceUnitName, Vec<String>>,
}

impl LoaderDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback. Callbacks are consulted in registration order.
    pub fn register(&mut self, callback: Box<dyn ImportCallback>) {
        self.callbacks.push(callback);
    }

    /// Associate a standard-JSON `urls` fallback list with a name.
    pub fn set_url_list(&mut self, name: SourceUnitName, urls: Vec<String>) {
        self.url_lists.insert(name, urls);
    }

    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }

    /// Make sure `name` is present in the VFS, loading it if necessary.
    ///
    /// With a `urls` list, each URL is offered to the callbacks in order
    /// and the first content wins, stored under `name` rather than under the
    /// URL. A `NotFound` advances to the next URL or callback; an `Error`
    /// aborts immediately. When everything is exhausted the result is
    /// `FileNotFound`.
    pub fn ensure_loaded(
        &self,
        vfs: &mut Vfs,
        name: &SourceUnitName,
        importer: Option<&SourceUnitName>,
    ) -> Result<()> {
        if vfs.contains(name) {
            return Ok(());
        }

        if let Some(urls) = self.url_lists.get(name) {
            for url in urls {
                for callback in &self.callbacks {
                    match callback.load(url) {
                        LoadOutcome::Contents { content, disk_path } => {
                            let mut unit = SourceUnit::new(content, Origin::JsonUrl);
                            unit.disk_path = disk_path;
                            unit.loaded_via = Some(format!("{} via {}", url, callback.name()));
                            return vfs.insert(name.clone(), unit);
                        }
                        LoadOutcome::NotFound => {}
                        LoadOutcome::Error(err) => return Err(err),
                    }
                }
            }
        } else {
            for callback in &self.callbacks {
                match callback.load(name.as_str()) {
                    LoadOutcome::Contents { content, disk_path } => {
                        let mut unit = SourceUnit::new(content, Origin::Callback);
                        unit.disk_path = disk_path;
                        unit.loaded_via = Some(callback.name().to_string());
                        return vfs.insert(name.clone(), unit);
                    }
                    LoadOutcome::NotFound => {}
                    LoadOutcome::Error(err) => return Err(err),
                }
            }
        }

        Err(Error::FileNotFound {
            name: name.to_string(),
            importer: importer.map(|importer| importer.to_string()),
        })
    }
}
