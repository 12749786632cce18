//! Extraction of import path literals from source text.
//!
//! Parsing proper is not this crate's job: the compiler's parser hands
//! import literals to the resolver one at a time. This scanner is the
//! drivable stand-in for that collaborator: it recognizes the statement
//! forms `import "p";`, `import "p" as X;`, `import * as X from "p";` and
//! `import {A, B} from "p";`, and nothing more. It does not understand
//! comments or nested strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMPORT_STATEMENT: Regex =
        Regex::new(r#"\bimport\s+(?:[^;"']*?\bfrom\s+)?(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// Collect the path literal of every import statement in `source`, in
/// order of appearance. Empty literals are returned too, so the resolver
/// can report them.
pub fn scan_imports(source: &str) -> Vec<String> {
    IMPORT_STATEMENT
        .captures_iter(source)
        .map(|captures| {
            captures
                .get(1)
                .or_else(|| captures.get(2))
                .map(|literal| literal.as_str().to_string())
                .unwrap_or_default()
        })
        .collect()
}
