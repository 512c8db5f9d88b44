//! # jemsite
//!
//! Converts jemdoc-style lightweight markup into XHTML pages for a small
//! bilingual personal website. Every page gets a sidebar menu built from a
//! shared `MENU` file and localized for the page's language.
//!
//! # Pipeline
//!
//! Each document goes through the same passes, independently of every other
//! document:
//!
//! ```text
//! MENU        →  menu entries      (loaded per document)
//! document    →  title + body      (first `# ` line)
//! body        →  content HTML      (headings → inline → images → lists)
//! all of it   →  page              (fixed XHTML template)
//! ```
//!
//! Batch mode runs this for every configured page name in both languages,
//! in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`menu`] | Parses the menu file, selects and renders the per-page sidebar |
//! | [`inline`] | Bold, italic, hyperlink, obfuscated email and line-break substitutions |
//! | [`blocks`] | Headings, image fences, and the list/paragraph state machine |
//! | [`page`] | Title extraction, pass ordering and the page template |
//! | [`generate`] | Reads documents, writes pages, single file and batch |
//! | [`config`] | `jemsite.toml` loading, merging and validation |
//! | [`types`] | Shared types: `Locale`, `MenuEntry` |
//! | [`naming`] | `_cn` file-name convention: locale detection and manifest names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Locale From File Names
//!
//! A page is Chinese when its file stem ends in the secondary suffix
//! (`index_cn.jemdoc`) and English otherwise. There is no locale marker
//! inside documents, so a page and its translation are plain siblings and
//! the menu can link between them by name.
//!
//! ## Malformed Markup Degrades
//!
//! Nothing in a document is an error. An unterminated `*`, a fence with too
//! few fields, a stray nested item: each falls back to literal text. Only
//! I/O can fail.
//!
//! ## Explicit List State
//!
//! The block writer tracks whether an ordered or unordered list is open in a
//! [`blocks::ListState`] value rather than by looking at the HTML it has
//! already emitted, which keeps every opened list tag paired with its close.
//!
//! ## Literal Page Template
//!
//! Menu markup uses [Maud](https://maud.lambda.xyz/) so labels are escaped.
//! The page skeleton itself is a fixed XHTML 1.1 string filled in one pass,
//! because it must reproduce the exact legacy layout (self-closing void
//! elements, `xml:lang`, the layout table) that the site's stylesheet
//! targets.

pub mod blocks;
pub mod config;
pub mod generate;
pub mod inline;
pub mod menu;
pub mod naming;
pub mod output;
pub mod page;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
