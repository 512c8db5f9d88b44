//! Page assembly: title extraction, pass ordering and the page template.
//!
//! A document goes through the passes in this order:
//!
//! ```text
//! # Title line      ─► taken out, becomes <title> and <h1>
//! == / === lines    ─► heading tags
//! whole body        ─► inline substitutions
//! ~~~ fences        ─► image tables
//! remaining lines   ─► lists and paragraphs
//! ```
//!
//! The image pass must see the `{…}` fields intact, which the inline rules
//! leave alone, and must run before paragraphs are wrapped around its lines.
//!
//! ## Template
//!
//! The XHTML skeleton is fixed. Placeholders are filled in a single literal
//! pass: nothing is escaped and substituted text is never scanned again, so
//! a title containing `{content}` stays as written.

use crate::blocks;
use crate::config::{ImagesConfig, SiteConfig};
use crate::inline;
use crate::menu::{self, MenuLine};
use crate::naming;
use crate::types::{Locale, MenuEntry};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").expect("title pattern"));

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN"
  "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
<meta name="generator" content="jemsite" />
<meta http-equiv="Content-Type" content="text/html;charset=utf-8" />
<link rel="stylesheet" href="{stylesheet}" type="text/css" />
<title>{title}</title>
</head>
<body>
<table summary="Table for page layout." id="tlayout">
<tr valign="top">
<td id="layout-menu">
<div id="layout-menu-container">
{menu}
</div>
</td>
<td id="layout-content">
<div id="toptitle">
<h1>{title}</h1>
</div>
{content}
</td>
</tr>
</table>
</body>
</html>
"#;

/// Split the title line off a document.
///
/// The first line starting with `# ` is the title; it is removed from the
/// returned body. Later `# ` lines are left in the body.
pub fn extract_title(doc: &str) -> (Option<String>, String) {
    let Some(caps) = TITLE_LINE.captures(doc) else {
        return (None, doc.to_string());
    };
    let (Some(line), Some(title)) = (caps.get(0), caps.get(1)) else {
        return (None, doc.to_string());
    };
    let end = if doc[line.end()..].starts_with('\n') {
        line.end() + 1
    } else {
        line.end()
    };
    let body = format!("{}{}", &doc[..line.start()], &doc[end..]);
    (Some(title.as_str().trim().to_string()), body)
}

/// Render a document body (title already removed) to HTML.
pub fn render_body(body: &str, images: &ImagesConfig) -> String {
    let text = blocks::convert_headings(body);
    let text = inline::render(&text);
    blocks::render_blocks(&blocks::parse_blocks(&text, images))
}

/// A page ready for the template.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub title: String,
    pub locale: Locale,
    pub menu: String,
    pub content: String,
}

/// Run every pass over `doc` for the page written to `target`.
///
/// `target` is the output file (or its name); its stem decides the locale
/// and which menu item is current.
pub fn assemble(
    doc: &str,
    default_title: &str,
    target: &Path,
    menu_entries: &[MenuEntry],
    config: &SiteConfig,
) -> RenderedPage {
    let doc = doc.replace("\r\n", "\n");
    let (title, body) = extract_title(&doc);
    let target_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = &config.locale.secondary_suffix;
    let locale = naming::locale_of(&target_name, suffix);
    let lines: Vec<MenuLine> = menu::select_menu(menu_entries, locale, &target_name, suffix);
    RenderedPage {
        title: title.unwrap_or_else(|| default_title.to_string()),
        locale,
        menu: menu::render_menu(&lines).into_string(),
        content: render_body(&body, &config.images),
    }
}

impl RenderedPage {
    /// Merge into the fixed page template.
    pub fn to_html(&self, stylesheet: &str) -> String {
        fill_template(PAGE_TEMPLATE, |name| match name {
            "lang" => Some(self.locale.xml_lang()),
            "stylesheet" => Some(stylesheet),
            "title" => Some(self.title.as_str()),
            "menu" => Some(self.menu.as_str()),
            "content" => Some(self.content.as_str()),
            _ => None,
        })
    }
}

/// Convert a whole document to a finished page.
pub fn render_page(
    doc: &str,
    default_title: &str,
    target: &Path,
    menu_entries: &[MenuEntry],
    config: &SiteConfig,
) -> String {
    assemble(doc, default_title, target, menu_entries, config).to_html(&config.stylesheet)
}

/// Replace `{name}` placeholders in one left-to-right pass. Unknown names
/// are kept as written.
fn fill_template<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| Some((close, value(&after[..close])?))) {
            Some((close, replacement)) => {
                out.push_str(replacement);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
