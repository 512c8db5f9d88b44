//! Centralized file naming for pages and their locale variants.
//!
//! Every page exists in two variants that share a base name. The secondary
//! locale is marked by a suffix on the file stem:
//!
//! - `research.jemdoc` → base="research", English
//! - `research_cn.jemdoc` → base="research", Chinese
//! - `research_cn.html` → same page, as a menu link target
//!
//! The same rule decides the locale of a page being rendered and the locale a
//! menu link points to, so a language-switch link and the page it targets
//! always agree.

use crate::types::Locale;
use std::path::{Path, PathBuf};

/// Locale of a page stem following the `<base>[<suffix>]` convention.
///
/// - `("index", "_cn")` → English
/// - `("index_cn", "_cn")` → Chinese
/// - `("_cn", "_cn")` → English (a bare suffix is not a variant)
pub fn stem_locale(stem: &str, suffix: &str) -> Locale {
    match stem.strip_suffix(suffix) {
        Some(base) if !base.is_empty() && !suffix.is_empty() => Locale::Chinese,
        _ => Locale::English,
    }
}

/// Locale of a file name, path or relative URL.
///
/// Only the final path component's stem is considered, so `../index_cn.html`
/// and `index_cn.jemdoc` are both Chinese. Query strings and fragments are
/// ignored.
pub fn locale_of(target: &str, suffix: &str) -> Locale {
    let target = target.split(['#', '?']).next().unwrap_or(target);
    let stem = Path::new(target)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem_locale(&stem, suffix)
}

/// File name of one page variant: `("index", Chinese, "_cn", "jemdoc")` → `index_cn.jemdoc`.
pub fn page_file_name(base: &str, locale: Locale, suffix: &str, extension: &str) -> String {
    match locale {
        Locale::English => format!("{base}.{extension}"),
        Locale::Chinese => format!("{base}{suffix}.{extension}"),
    }
}

/// Expand page base names into the full manifest, both locales per page.
pub fn manifest_file_names(names: &[String], suffix: &str, extension: &str) -> Vec<String> {
    names
        .iter()
        .flat_map(|base| {
            Locale::ALL
                .into_iter()
                .map(move |locale| page_file_name(base, locale, suffix, extension))
        })
        .collect()
}

/// Output path for an input document: same location, `.html` extension.
pub fn html_output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}
