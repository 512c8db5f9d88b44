//! Inline substitutions: bold, italic, hyperlinks, obfuscated email and
//! explicit line breaks.
//!
//! ## Rule Order
//!
//! | # | Syntax | Output |
//! |---|--------|--------|
//! | 1 | `*bold*` | `<b>bold</b>` |
//! | 2 | `/italic/` | `<i>italic</i>` |
//! | 3 | `[http://x.org Link Text]` | `<a href="http://x.org">Link Text</a>` |
//! | 4 | `alice [@] example.com` | `alice@example.com` |
//! | 5 | `line \n` | `line<br />` |
//!
//! ## Opaque Output
//!
//! Text is carried as a list of [`Span`]s. A rule only ever rewrites
//! [`Span::Text`]; the tags it produces are [`Span::Markup`] and no later rule
//! can see them. The `/` in a generated `</b>` is therefore never mistaken
//! for an italic marker, and the text inside a bold or link span is still
//! plain text that later rules may rewrite.
//!
//! The hyperlink rule is the exception: a label may hold whole bold or
//! italic spans (`[cv.pdf *CV*]`), so it walks the span list instead of one
//! text span. The destination is always plain text, and italics never open
//! inside it.
//!
//! Every rule is a single left-to-right pass. Unbalanced markers stay as
//! they are; nothing here can fail.

use regex::{Captures, Regex};
use std::collections::VecDeque;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("bold pattern"));
static LINK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\s]+) ").expect("link pattern"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9._%+-]+) \\?\[@\\?\] ([A-Za-z0-9.-]+)").expect("email pattern")
});
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \\n").expect("line break pattern"));

#[derive(Debug, Clone, PartialEq)]
enum Span {
    /// Source text, still open to later rules.
    Text(String),
    /// Generated HTML, emitted verbatim.
    Markup(String),
}

/// Apply every inline rule to `text`.
pub fn render(text: &str) -> String {
    let spans = vec![Span::Text(text.to_string())];
    let spans = apply(apply(spans, bold), italic);
    let spans = hyperlink(spans);
    let spans = apply(apply(spans, email), line_break);
    spans
        .into_iter()
        .map(|span| match span {
            Span::Text(s) | Span::Markup(s) => s,
        })
        .collect()
}

fn apply(spans: Vec<Span>, rule: fn(&str) -> Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .flat_map(|span| match span {
            Span::Text(text) => rule(&text),
            markup => vec![markup],
        })
        .collect()
}

/// Split `text` around every match of `re`, replacing each match with the
/// spans built by `replace`.
fn split_matches(text: &str, re: &Regex, replace: impl Fn(&Captures) -> Vec<Span>) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut spans, &text[last..whole.start()]);
        spans.extend(replace(&caps));
        last = whole.end();
    }
    push_text(&mut spans, &text[last..]);
    spans
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if !text.is_empty() {
        spans.push(Span::Text(text.to_string()));
    }
}

fn wrap(open: &str, inner: &str, close: &str) -> Vec<Span> {
    vec![
        Span::Markup(open.to_string()),
        Span::Text(inner.to_string()),
        Span::Markup(close.to_string()),
    ]
}

fn bold(text: &str) -> Vec<Span> {
    split_matches(text, &BOLD, |caps| wrap("<b>", &caps[1], "</b>"))
}

/// Italic needs look-around on both slashes, which `regex` does not offer,
/// so it is scanned by hand.
fn italic(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_from = 0;
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('/') {
        let open = search_from + offset;
        match italic_close(text, open) {
            Some(close) => {
                push_text(&mut spans, &text[plain_from..open]);
                spans.extend(wrap("<i>", &text[open + 1..close], "</i>"));
                plain_from = close + 1;
                search_from = close + 1;
            }
            None => search_from = open + 1,
        }
    }
    push_text(&mut spans, &text[plain_from..]);
    spans
}

/// Byte index of the slash closing an italic span opened at `open`, if the
/// span is acceptable.
fn italic_close(text: &str, open: usize) -> Option<usize> {
    let before = text[..open].chars().next_back();
    if before.is_some_and(|c| c.is_alphanumeric() || matches!(c, ':' | '/' | '<')) {
        return None;
    }
    // Inside a `[destination` token
    let token = text[..open].rsplit(char::is_whitespace).next().unwrap_or("");
    if token.starts_with('[') {
        return None;
    }
    let rest = &text[open + 1..];
    let len = rest.find(['/', '\n'])?;
    let close = open + 1 + len;
    if !text[close..].starts_with('/') {
        return None;
    }
    let inner = &rest[..len];
    if inner.is_empty()
        || inner.starts_with(char::is_whitespace)
        || inner.ends_with(char::is_whitespace)
        || inner.starts_with('>')
        || inner.ends_with('<')
    {
        return None;
    }
    let after = text[close + 1..].chars().next();
    if after.is_some_and(|c| c.is_alphanumeric() || c == '>') {
        return None;
    }
    Some(close)
}

/// A `[destination label]` found starting in one text span.
struct LinkMatch {
    /// End of the text before the `[`.
    prefix_end: usize,
    href: String,
    label: Vec<Span>,
    /// Following spans taken into the label.
    consumed: usize,
    /// Text after the `]`, still to be scanned.
    suffix: String,
}

fn hyperlink(spans: Vec<Span>) -> Vec<Span> {
    let mut out = Vec::new();
    let mut rest: VecDeque<Span> = spans.into();
    while let Some(span) = rest.pop_front() {
        let text = match span {
            Span::Text(text) => text,
            markup => {
                out.push(markup);
                continue;
            }
        };
        let Some(link) = find_link(&text, rest.make_contiguous()) else {
            out.push(Span::Text(text));
            continue;
        };
        push_text(&mut out, &text[..link.prefix_end]);
        out.push(Span::Markup(format!(r#"<a href="{}">"#, link.href)));
        out.extend(link.label);
        out.push(Span::Markup("</a>".to_string()));
        rest.drain(..link.consumed);
        if !link.suffix.is_empty() {
            rest.push_front(Span::Text(link.suffix));
        }
    }
    out
}

/// First link whose `[destination ` opens in `text`. The label runs to the
/// next `]` on the same line and may cross whole `<b>`/`<i>` pairs in
/// `following`.
fn find_link(text: &str, following: &[Span]) -> Option<LinkMatch> {
    LINK_OPEN.captures_iter(text).find_map(|caps| {
        let open = caps.get(0)?;
        let mut link = LinkMatch {
            prefix_end: open.start(),
            href: caps[1].to_string(),
            label: Vec::new(),
            consumed: 0,
            suffix: String::new(),
        };
        let tail = &text[open.end()..];
        if let Some(end) = tail.find([']', '\n']) {
            if end == 0 || !tail[end..].starts_with(']') {
                return None;
            }
            push_text(&mut link.label, &tail[..end]);
            link.suffix = tail[end + 1..].to_string();
            return Some(link);
        }
        push_text(&mut link.label, tail);
        close_label(link, following)
    })
}

fn close_label(mut link: LinkMatch, following: &[Span]) -> Option<LinkMatch> {
    let mut depth = 0usize;
    for (i, span) in following.iter().enumerate() {
        match span {
            Span::Markup(tag) if matches!(tag.as_str(), "<b>" | "<i>") => depth += 1,
            Span::Markup(tag) if matches!(tag.as_str(), "</b>" | "</i>") && depth > 0 => {
                depth -= 1
            }
            Span::Markup(_) => return None,
            Span::Text(t) => {
                if let Some(end) = t.find([']', '\n']) {
                    if depth > 0 || !t[end..].starts_with(']') {
                        return None;
                    }
                    push_text(&mut link.label, &t[..end]);
                    link.consumed = i + 1;
                    link.suffix = t[end + 1..].to_string();
                    return Some(link);
                }
            }
        }
        link.label.push(span.clone());
    }
    None
}

fn email(text: &str) -> Vec<Span> {
    split_matches(text, &EMAIL, |caps| {
        vec![Span::Markup(format!("{}@{}", &caps[1], &caps[2]))]
    })
}

fn line_break(text: &str) -> Vec<Span> {
    split_matches(text, &LINE_BREAK, |_| vec![Span::Markup("<br />".to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_span() {
        assert_eq!(render("Some *bold* text"), "Some <b>bold</b> text");
    }

    #[test]
    fn bold_does_not_cross_lines() {
        assert_eq!(render("a *b\nc* d"), "a *b\nc* d");
    }

    #[test]
    fn unbalanced_bold_left_alone() {
        assert_eq!(render("5 * 3 = 15"), "5 * 3 = 15");
    }

    #[test]
    fn italic_span() {
        assert_eq!(render("an /italic/ word"), "an <i>italic</i> word");
    }

    #[test]
    fn italic_at_line_start() {
        assert_eq!(render("/Nature/, 2021"), "<i>Nature</i>, 2021");
    }

    #[test]
    fn italic_ignores_path_slashes() {
        assert_eq!(render("see a/b/c for details"), "see a/b/c for details");
    }

    #[test]
    fn italic_ignores_spaced_slashes() {
        assert_eq!(render("either / or / both"), "either / or / both");
    }

    #[test]
    fn two_bold_spans_survive_italic_rule() {
        assert_eq!(
            render("*one* and *two*"),
            "<b>one</b> and <b>two</b>"
        );
    }

    #[test]
    fn italic_inside_bold() {
        assert_eq!(render("*very /much/ so*"), "<b>very <i>much</i> so</b>");
    }

    #[test]
    fn hyperlink_with_label() {
        assert_eq!(
            render("[http://x.org Link Text]"),
            r#"<a href="http://x.org">Link Text</a>"#
        );
    }

    #[test]
    fn hyperlink_with_path_keeps_slashes() {
        assert_eq!(
            render("[http://x.org/a/b/ Docs]"),
            r#"<a href="http://x.org/a/b/">Docs</a>"#
        );
    }

    #[test]
    fn bracket_without_label_is_not_a_link() {
        assert_eq!(render("see [1]"), "see [1]");
    }

    #[test]
    fn hyperlink_with_bold_label() {
        assert_eq!(render("[cv.pdf *CV*]"), r#"<a href="cv.pdf"><b>CV</b></a>"#);
    }

    #[test]
    fn hyperlink_with_italic_label() {
        assert_eq!(
            render("[http://x.org /Nature/ paper], 2021"),
            r#"<a href="http://x.org"><i>Nature</i> paper</a>, 2021"#
        );
    }

    #[test]
    fn hyperlink_label_mixing_text_and_emphasis() {
        assert_eq!(
            render("see [p.pdf The *fast* /and/ small] and [q.pdf Q]"),
            r#"see <a href="p.pdf">The <b>fast</b> <i>and</i> small</a> and <a href="q.pdf">Q</a>"#
        );
    }

    #[test]
    fn bold_around_link_opening_is_not_a_link() {
        assert_eq!(render("*a [x.org b* c]"), "<b>a [x.org b</b> c]");
    }

    #[test]
    fn link_label_does_not_cross_lines() {
        assert_eq!(render("[x.org *a*\nb]"), "[x.org <b>a</b>\nb]");
    }

    #[test]
    fn italic_never_opens_inside_link_destination() {
        assert_eq!(
            render("[https://gitlab.com/-/ide/ IDE]"),
            r#"<a href="https://gitlab.com/-/ide/">IDE</a>"#
        );
        assert_eq!(render("[a_/b/ c]"), r#"<a href="a_/b/">c</a>"#);
    }

    #[test]
    fn obfuscated_email() {
        assert_eq!(
            render("Contact: alice [@] example.com"),
            "Contact: alice@example.com"
        );
    }

    #[test]
    fn escaped_obfuscated_email() {
        assert_eq!(
            render(r"bob.smith \[@\] mail.example.org"),
            "bob.smith@mail.example.org"
        );
    }

    #[test]
    fn explicit_line_break() {
        assert_eq!(render(r"first line \n second"), "first line<br /> second");
    }

    #[test]
    fn rendering_twice_is_stable() {
        let once = render("*a* /b/ [http://x.org/y c] d [@] e.org line \\n *f* /g/");
        assert_eq!(render(&once), once);
    }

    #[test]
    fn line_break_output_is_not_italic() {
        let once = render(r"a \n b \n c");
        assert_eq!(once, "a<br /> b<br /> c");
        assert_eq!(render(&once), once);
    }

    #[test]
    fn unicode_text_preserved() {
        assert_eq!(render("*中文* 文本"), "<b>中文</b> 文本");
    }
}
