//! Shared test utilities for the jemsite test suite.
//!
//! Provides the fixture site, file readers, and list-structure assertions
//! that work on rendered HTML.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! convert_manifest(tmp.path(), &SiteConfig::default());
//!
//! let html = read(&tmp.path().join("index.html"));
//! assert_tags_balanced(&html, &["ul", "ol", "li"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

/// The menu file of the fixture site.
pub const SAMPLE_MENU: &str = include_str!("../fixtures/site/MENU");

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Read a generated file. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

// =========================================================================
// Structure assertions
// =========================================================================

/// Assert every `<tag>` opened in `html` is closed, in nesting order.
pub fn assert_tags_balanced(html: &str, tags: &[&str]) {
    let mut stack: Vec<&str> = Vec::new();
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let end = rest.find('>').unwrap_or(rest.len());
        let raw = &rest[..end];
        let (closing, name) = match raw.strip_prefix('/') {
            Some(name) => (true, name),
            None => (false, raw.split([' ', '/']).next().unwrap_or(raw)),
        };
        if !tags.contains(&name) {
            continue;
        }
        if closing {
            let top = stack.pop();
            assert_eq!(top, Some(name), "unexpected </{name}> in:\n{html}");
        } else {
            stack.push(name);
        }
    }
    assert!(stack.is_empty(), "unclosed {stack:?} in:\n{html}");
}
