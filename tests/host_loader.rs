//! Disk-backed tests for the host filesystem loader: base-path joins,
//! the `file://` scheme, and allow-list enforcement. POSIX fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use srcres::session::Session;
use srcres::{Error, Origin};
use tempfile::TempDir;

/// Lay out a directory tree from (relative path, content) pairs.
fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

#[test]
fn cli_file_and_its_relative_import_load_from_disk() {
    let tmp = TempDir::new().unwrap();
    write_tree(
        tmp.path(),
        &[
            ("contracts/main.sol", "import \"./lib/util.sol\";"),
            ("contracts/lib/util.sol", "contract Util {}"),
        ],
    );

    let mut session = Session::new("");
    let main = session
        .add_source_file(&tmp.path().join("contracts/main.sol"))
        .unwrap();
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    // The import resolved relative to the CLI unit's own (slash-rewritten)
    // name, and loaded because the CLI file's directory is allowed.
    let dep_name = format!("{}/lib/util.sol", main.as_str().rsplit_once('/').unwrap().0);
    let dep = session.vfs().get(&dep_name.as_str().into()).unwrap();
    assert_eq!(dep.origin, Origin::Callback);
    assert!(dep.disk_path.as_ref().unwrap().ends_with("lib/util.sol"));
}

#[test]
fn base_path_prefixes_rootless_names() {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), &[("lib/util.sol", "contract Util {}")]);

    let mut session = Session::new(tmp.path().to_string_lossy().into_owned());
    session.add_stdin("import \"lib/util.sol\";").unwrap();
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    // Stored under the source unit name, not under the disk path.
    let unit = session.vfs().get(&"lib/util.sol".into()).unwrap();
    assert_eq!(unit.disk_path.as_ref().unwrap(), &tmp.path().canonicalize().unwrap().join("lib/util.sol"));
}

#[test]
fn absolute_name_under_base_path_joins_instead_of_escaping() {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), &[("lib/util.sol", "contract Util {}")]);

    let mut session = Session::new(tmp.path().to_string_lossy().into_owned());
    // Absolute-looking import: with a base path set it must resolve
    // under the base path, never at the filesystem root.
    session.add_stdin("import \"/lib/util.sol\";").unwrap();
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert!(session.vfs().contains(&"/lib/util.sol".into()));
}

#[test]
fn absolute_name_with_empty_base_path_loads_from_disk_root() {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), &[("abs.sol", "contract Abs {}")]);
    let abs = tmp.path().join("abs.sol");

    let mut session = Session::new("");
    session
        .add_stdin(format!("import \"{}\";", abs.display()))
        .unwrap();
    session.allow_directory(tmp.path().to_path_buf());
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn file_scheme_is_stripped_at_the_loader() {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), &[("abs.sol", "contract Abs {}")]);
    let abs = tmp.path().join("abs.sol");

    let mut session = Session::new("");
    let import = format!("file://{}", abs.display());
    session
        .add_stdin(format!("import \"{import}\";"))
        .unwrap();
    session.allow_directory(tmp.path().to_path_buf());
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    // The scheme survives in the source unit name; only the disk lookup
    // stripped it.
    assert!(session.vfs().contains(&import.as_str().into()));
}

#[test]
fn paths_outside_the_allow_list_are_forbidden() {
    let tmp = TempDir::new().unwrap();
    write_tree(
        tmp.path(),
        &[
            ("visible/main.sol", "import \"../hidden/secret.sol\";"),
            ("hidden/secret.sol", "contract Secret {}"),
        ],
    );

    let mut session = Session::new("");
    session
        .add_source_file(&tmp.path().join("visible/main.sol"))
        .unwrap();
    // Only visible/ is allowed (the CLI file's directory); hidden/ exists
    // on disk but must not be readable.
    session.install_host_loader();

    let errors = session.resolve_all();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], Error::Forbidden { path } if path.contains("secret.sol")));
}

#[test]
fn remapping_targets_extend_the_allow_list() {
    let tmp = TempDir::new().unwrap();
    write_tree(
        tmp.path(),
        &[
            ("src/main.sol", "import \"lib/dep.sol\";"),
            ("vendor/dep.sol", "contract Dep {}"),
        ],
    );

    let mut session = Session::new("");
    session
        .add_remapping(&format!("lib/={}/vendor/", tmp.path().display()))
        .unwrap();
    session
        .add_source_file(&tmp.path().join("src/main.sol"))
        .unwrap();
    session.install_host_loader();

    let errors = session.resolve_all();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let name = format!("{}/vendor/dep.sol", tmp.path().display());
    assert!(session.vfs().contains(&name.as_str().into()));
}

#[test]
fn missing_files_surface_as_file_not_found() {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), &[("main.sol", "import \"./nope.sol\";")]);

    let mut session = Session::new("");
    session
        .add_source_file(&tmp.path().join("main.sol"))
        .unwrap();
    session.install_host_loader();

    let errors = session.resolve_all();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        Error::FileNotFound { importer: Some(_), .. }
    ));
}

#[test]
fn allow_paths_are_recorded_in_order() {
    let mut session = Session::new("");
    session.allow_directory("/first");
    session.allow_directory(PathBuf::from("/second"));
    assert_eq!(
        session.allowed_directories(),
        &[PathBuf::from("/first"), PathBuf::from("/second")]
    );
}
