//! Block structure: headings, image fences, lists and paragraphs.
//!
//! Runs after the inline pass, over the document's lines:
//!
//! ```text
//! == Research            → <h2>Research</h2>
//! === Projects           → <h3>Projects</h3>
//! - item                 → <ul><li>item</li>…</ul>
//!   -- detail            → <ul><li>detail</li></ul> inside the open item
//! 1. step                → <ol><li>step</li>…</ol>
//! ~~~                    ┐
//! {}{img_left}{me.jpg}{Me}{131px}{160px}{}  │ two-cell image table
//! Caption lines          │
//! ~~~                    ┘
//! anything else          → <p>anything else</p>
//! ```
//!
//! ## List State
//!
//! Whether a list is open, and which kind, is an explicit [`ListState`]
//! carried by the writer. List boundaries follow only from which block comes
//! next: a list opens on the first item of its kind and closes before any
//! block that is not an item of the same kind, or at the end of input.
//!
//! ## Malformed Input
//!
//! A fence with no closing `~~~`, or whose first line has fewer than four
//! `{…}` fields, is not an image block. Its lines fall through to the
//! paragraph rule and render literally.

use crate::config::ImagesConfig;
use regex::Regex;
use std::sync::LazyLock;

static H2_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^== (.+)$").expect("h2 pattern"));
static H3_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^=== (.+)$").expect("h3 pattern"));
static HEADING_HTML: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<h([23])>(.*)</h[23]>$").expect("heading html pattern"));
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d*\. (.*)$").expect("ordered item pattern"));
static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\{[^}]*\})+\s*$").expect("field line pattern"));
static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("field pattern"));

const FENCE: &str = "~~~";
const NESTED_PREFIX: &str = "  -- ";
const UNORDERED_PREFIX: &str = "- ";
/// Fields needed before a fence is treated as an image block.
const MIN_IMAGE_FIELDS: usize = 4;

/// One unit of rendered output, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Image(ImageBlock),
    ListItem {
        ordered: bool,
        nested: bool,
        text: String,
    },
    Paragraph(String),
    Blank,
}

/// An image with a caption, from a `~~~` fence.
///
/// The first fence line holds `{title}{kind}{path}{alt}{width}{height}{link}`;
/// the title and kind fields are accepted but do not affect the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    pub width: String,
    pub height: String,
    pub link: Option<String>,
    /// Rendered HTML of the lines after the field line.
    pub caption: String,
}

impl ImageBlock {
    pub fn to_html(&self) -> String {
        let img = format!(
            r#"<img src="{}" alt="{}" width="{}" height="{}" />"#,
            self.src, self.alt, self.width, self.height
        );
        let img = match &self.link {
            Some(href) => format!(r#"<a href="{href}">{img}</a>"#),
            None => img,
        };
        format!(
            "<table class=\"imgtable\"><tr><td>\n{img}&nbsp;</td>\n<td align=\"left\">{}</td></tr></table>",
            self.caption
        )
    }
}

/// Rewrite `== ` and `=== ` lines into heading tags.
pub fn convert_headings(text: &str) -> String {
    let text = H3_LINE.replace_all(text, "<h3>${1}</h3>");
    H2_LINE.replace_all(&text, "<h2>${1}</h2>").into_owned()
}

/// Split a document into blocks, recognizing image fences first.
pub fn parse_blocks(text: &str, images: &ImagesConfig) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if is_fence(lines[i])
            && let Some(len) = lines[i + 1..].iter().position(|l| is_fence(l))
        {
            let inner = &lines[i + 1..i + 1 + len];
            match image_from_fence(inner, images) {
                Some(image) => blocks.push(Block::Image(image)),
                None => blocks.extend(lines[i..i + len + 2].iter().map(|l| classify(l))),
            }
            i += len + 2;
            continue;
        }
        blocks.push(classify(lines[i]));
        i += 1;
    }
    blocks
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == FENCE
}

fn image_from_fence(inner: &[&str], images: &ImagesConfig) -> Option<ImageBlock> {
    let (first, caption_lines) = inner.split_first()?;
    if !FIELD_LINE.is_match(first) {
        return None;
    }
    let fields: Vec<&str> = FIELD
        .captures_iter(first)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()))
        .collect();
    if fields.len() < MIN_IMAGE_FIELDS || fields[2].is_empty() {
        return None;
    }
    let field_or = |idx: usize, default: &str| {
        fields
            .get(idx)
            .filter(|f| !f.is_empty())
            .map_or_else(|| default.to_string(), |f| f.to_string())
    };
    let caption = render_blocks(&parse_blocks(&caption_lines.join("\n"), images));
    Some(ImageBlock {
        src: fields[2].to_string(),
        alt: field_or(3, &images.alt),
        width: field_or(4, &images.width),
        height: field_or(5, &images.height),
        link: fields
            .get(6)
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string()),
        caption: caption.trim_matches('\n').to_string(),
    })
}

/// Classify one line. Headings are recognized by the tags the heading pass
/// produced.
pub fn classify(line: &str) -> Block {
    if let Some(text) = line.strip_prefix(NESTED_PREFIX) {
        return Block::ListItem {
            ordered: false,
            nested: true,
            text: text.trim().to_string(),
        };
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::Blank;
    }
    if let Some(caps) = HEADING_HTML.captures(trimmed) {
        return Block::Heading {
            level: if &caps[1] == "2" { 2 } else { 3 },
            text: caps[2].to_string(),
        };
    }
    if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
        return Block::ListItem {
            ordered: true,
            nested: false,
            text: caps[1].trim().to_string(),
        };
    }
    if let Some(text) = trimmed.strip_prefix(UNORDERED_PREFIX) {
        return Block::ListItem {
            ordered: false,
            nested: false,
            text: text.trim().to_string(),
        };
    }
    Block::Paragraph(trimmed.to_string())
}

/// Which list, if any, is open at the current point of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    NoList,
    InOrderedList,
    InUnorderedList,
}

impl ListState {
    fn open_tag(self) -> Option<&'static str> {
        match self {
            ListState::NoList => None,
            ListState::InOrderedList => Some("<ol>"),
            ListState::InUnorderedList => Some("<ul>"),
        }
    }

    fn close_tag(self) -> Option<&'static str> {
        match self {
            ListState::NoList => None,
            ListState::InOrderedList => Some("</ol>"),
            ListState::InUnorderedList => Some("</ul>"),
        }
    }
}

/// The `<li>` currently left open so nested lists can go inside it.
struct OpenItem {
    has_nested: bool,
}

struct BlockWriter {
    state: ListState,
    item: Option<OpenItem>,
    lines: Vec<String>,
}

impl BlockWriter {
    fn new() -> Self {
        Self {
            state: ListState::NoList,
            item: None,
            lines: Vec::new(),
        }
    }

    fn write(&mut self, block: &Block) {
        match block {
            Block::ListItem {
                nested: true, text, ..
            } => {
                if self.state == ListState::InUnorderedList {
                    self.nested_item(text);
                } else {
                    self.close_list();
                    self.lines.push(format!("<p>-- {text}</p>"));
                }
            }
            Block::ListItem { ordered, text, .. } => {
                let target = if *ordered {
                    ListState::InOrderedList
                } else {
                    ListState::InUnorderedList
                };
                self.enter(target);
                self.item(text);
            }
            Block::Heading { level, text } => {
                self.close_list();
                self.lines.push(format!("<h{level}>{text}</h{level}>"));
            }
            Block::Image(image) => {
                self.close_list();
                self.lines.push(image.to_html());
            }
            Block::Paragraph(text) => {
                self.close_list();
                self.lines.push(format!("<p>{text}</p>"));
            }
            Block::Blank => {
                self.close_list();
                self.lines.push(String::new());
            }
        }
    }

    fn enter(&mut self, target: ListState) {
        if self.state == target {
            return;
        }
        self.close_list();
        if let Some(tag) = target.open_tag() {
            self.lines.push(tag.to_string());
        }
        self.state = target;
    }

    fn item(&mut self, text: &str) {
        self.close_item();
        self.lines.push(format!("<li>{text}"));
        self.item = Some(OpenItem { has_nested: false });
    }

    fn nested_item(&mut self, text: &str) {
        self.lines.push(format!("<ul><li>{text}</li></ul>"));
        if let Some(item) = self.item.as_mut() {
            item.has_nested = true;
        }
    }

    fn close_item(&mut self) {
        match self.item.take() {
            // Nothing was written since `<li>text`, so close it on the same line.
            Some(OpenItem { has_nested: false }) => {
                if let Some(last) = self.lines.last_mut() {
                    last.push_str("</li>");
                }
            }
            Some(OpenItem { has_nested: true }) => self.lines.push("</li>".to_string()),
            None => {}
        }
    }

    fn close_list(&mut self) {
        self.close_item();
        if let Some(tag) = self.state.close_tag() {
            self.lines.push(tag.to_string());
        }
        self.state = ListState::NoList;
    }

    fn finish(mut self) -> String {
        self.close_list();
        self.lines.join("\n")
    }
}

/// Render blocks to HTML, opening and closing lists as items come and go.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut writer = BlockWriter::new();
    for block in blocks {
        writer.write(block);
    }
    writer.finish()
}
