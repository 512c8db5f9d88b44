//! Shared types used by the menu, the page assembler and the CLI.

use serde::Serialize;

/// Language variant of a page.
///
/// English is the default; a page whose file stem carries the configured
/// secondary suffix (`index_cn.jemdoc`) is Chinese.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Chinese,
}

impl Locale {
    /// Value of the `xml:lang` attribute on the page root.
    pub fn xml_lang(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Chinese => "zh-CN",
        }
    }

    /// Name of the menu category holding this locale's page links.
    pub fn menu_label(self) -> &'static str {
        match self {
            Locale::English => "Menu",
            Locale::Chinese => "菜单",
        }
    }

    /// Header shown above the language-switch link.
    pub fn language_label(self) -> &'static str {
        match self {
            Locale::English => "Language",
            Locale::Chinese => "语言",
        }
    }

    /// The locale a language-switch link on this page points to.
    pub fn other(self) -> Locale {
        match self {
            Locale::English => Locale::Chinese,
            Locale::Chinese => Locale::English,
        }
    }

    pub const ALL: [Locale; 2] = [Locale::English, Locale::Chinese];
}

/// One line of the menu-description file.
///
/// Entries keep file order; that order is the on-page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuEntry {
    Category {
        name: String,
    },
    Item {
        /// Name of the category this item was declared under
        category: String,
        url: String,
        text: String,
    },
}
