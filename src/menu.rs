//! Menu description file: loading and per-page rendering.
//!
//! ## File Format
//!
//! ```text
//! Menu
//!     Home            [index.html]
//!     Research        [research.html]
//! 菜单
//!     主页            [index_cn.html]
//!     研究            [research_cn.html]
//! Language
//!     中文            [index_cn.html]
//!     English         [index.html]
//! ```
//!
//! A line without `[url]` names a category; a line with one is an item of the
//! most recent category. Indentation is cosmetic.
//!
//! ## Per-Page Selection
//!
//! A page shows the category of its own locale (`Menu` on English pages,
//! `菜单` on Chinese ones) and one language category, which shows only the
//! link into the other locale. `Language` belongs to English pages and `语言`
//! to Chinese ones. A file with a single language category shares it between
//! both locales, under a localized header. Categories with any other name
//! are dropped without complaint.

use crate::naming;
use crate::types::{Locale, MenuEntry};
use maud::{Markup, html};
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

static BRACKETED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("bracketed url pattern"));

/// Parse menu file content into entries, in file order.
pub fn parse_menu(content: &str) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    let mut category = String::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match BRACKETED_URL.captures(trimmed) {
            Some(caps) => {
                let Some(bracket) = caps.get(0) else { continue };
                let text = format!("{}{}", &trimmed[..bracket.start()], &trimmed[bracket.end()..]);
                entries.push(MenuEntry::Item {
                    category: category.clone(),
                    url: caps[1].trim().to_string(),
                    text: text.trim().to_string(),
                });
            }
            None => {
                category = trimmed.to_string();
                entries.push(MenuEntry::Category {
                    name: category.clone(),
                });
            }
        }
    }
    entries
}

/// Read and parse the menu file. A missing file is an empty menu.
pub fn load_menu(path: &Path) -> io::Result<Vec<MenuEntry>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_menu(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// What a category name means to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryKind {
    /// Page links for one locale.
    Pages(Locale),
    /// Links switching away from the owning locale.
    Language(Locale),
}

impl CategoryKind {
    fn from_name(name: &str) -> Option<Self> {
        Locale::ALL.into_iter().find_map(|locale| {
            if locale.menu_label() == name {
                Some(CategoryKind::Pages(locale))
            } else if locale.language_label() == name {
                Some(CategoryKind::Language(locale))
            } else {
                None
            }
        })
    }
}

/// Index of the language category shown on pages of `locale`: its own one if
/// the file has it, otherwise the first of any locale.
fn language_category(entries: &[MenuEntry], locale: Locale) -> Option<usize> {
    let kinds: Vec<Option<CategoryKind>> = entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Category { name } => CategoryKind::from_name(name),
            MenuEntry::Item { .. } => None,
        })
        .collect();
    kinds
        .iter()
        .position(|k| *k == Some(CategoryKind::Language(locale)))
        .or_else(|| {
            kinds
                .iter()
                .position(|k| matches!(k, Some(CategoryKind::Language(_))))
        })
}

/// One rendered line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuLine {
    Header(String),
    Link {
        url: String,
        text: String,
        current: bool,
    },
}

/// Pick the menu lines shown on a page, in original order.
///
/// `current` is the file name of the page being rendered (`research_cn.html`);
/// the item linking to it is flagged so the page can highlight it.
pub fn select_menu(
    entries: &[MenuEntry],
    locale: Locale,
    current: &str,
    suffix: &str,
) -> Vec<MenuLine> {
    let language = language_category(entries, locale);
    let mut lines = Vec::new();
    // Kind of the category the following items belong to, if it is shown.
    let mut shown: Option<CategoryKind> = None;
    let mut switch_shown = false;
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            MenuEntry::Category { name } => {
                shown = CategoryKind::from_name(name).filter(|kind| match kind {
                    CategoryKind::Pages(owner) => *owner == locale,
                    CategoryKind::Language(_) => language == Some(index),
                });
                match shown {
                    Some(CategoryKind::Pages(_)) => lines.push(MenuLine::Header(name.clone())),
                    Some(CategoryKind::Language(_)) => {
                        lines.push(MenuLine::Header(locale.language_label().to_string()))
                    }
                    None => {}
                }
            }
            MenuEntry::Item { url, text, .. } => {
                let show = match shown {
                    Some(CategoryKind::Pages(_)) => true,
                    Some(CategoryKind::Language(_)) => {
                        let first_switch =
                            !switch_shown && naming::locale_of(url, suffix) == locale.other();
                        switch_shown |= first_switch;
                        first_switch
                    }
                    None => false,
                };
                if show {
                    lines.push(MenuLine::Link {
                        url: url.clone(),
                        text: text.clone(),
                        current: is_current(url, current),
                    });
                }
            }
        }
    }
    lines
}

fn is_current(url: &str, current: &str) -> bool {
    let url = url.split(['#', '?']).next().unwrap_or(url);
    !current.is_empty()
        && Path::new(url).file_name() == Path::new(current).file_name()
        && !url.contains("://")
}

/// Render the sidebar for a page.
pub fn render_menu(lines: &[MenuLine]) -> Markup {
    html! {
        @for line in lines {
            @match line {
                MenuLine::Header(text) => {
                    div.menu-category { (text) }
                }
                MenuLine::Link { url, text, current } => {
                    div.menu-item {
                        a href=(url) class=[current.then_some("current")] { (text) }
                    }
                }
            }
        }
    }
}
