pub mod error;
pub mod loader;
pub mod remap;
pub mod session;
pub mod standard_json;
pub mod vfs;

pub use error::{Error, Result};
pub use loader::{HostFsLoader, ImportCallback, LoadOutcome, LoaderDispatcher};
pub use remap::{Remapping, Remappings};
pub use session::{Session, STDIN_NAME};
pub use vfs::{ImportResolver, Origin, SourceUnit, SourceUnitName, Vfs};
