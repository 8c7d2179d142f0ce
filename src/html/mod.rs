//! HTML structural interpretation shared by both container pipelines.
//!
//! Documents are held in an arena-backed DOM ([`scraper::Html`]); the
//! interpreters walk it with forward sibling cursors only.

pub(crate) mod mwb;
pub(crate) mod watchtower;

use crate::lang::LanguageProfile;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const NON_BREAKING_SPACE: char = '\u{a0}';

pub(crate) static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
pub(crate) static H2: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
pub(crate) static H3: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
pub(crate) static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub(crate) static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
pub(crate) static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
pub(crate) static P_GROUP: LazyLock<Selector> = LazyLock::new(|| selector(".pGroup"));
static RUBY_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("rt"));

/// Builds a selector from a static, known-good CSS string.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static css selector")
}

/// Interpretation inputs shared across documents of one issue.
pub(crate) struct Interpretation<'a> {
    /// The issue year, used when normalizing week dates.
    pub year: i32,
    /// The enhanced language profile, `None` when enhanced parsing is
    /// disabled or the language is unsupported.
    pub profile: Option<&'a LanguageProfile>,
}

/// Parses a document and strips ruby annotation text (`<rt>`), which
/// would otherwise leak pronunciation glosses into extracted fields.
pub(crate) fn parse_document(text: &str) -> Html {
    let mut document = Html::parse_document(text);

    let ruby_nodes: Vec<_> = document
        .select(&RUBY_TEXT)
        .map(|element| element.id())
        .collect();
    for id in ruby_nodes {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
}

/// Collapsed text of an element's descendants.
///
/// ASCII whitespace runs shrink to a single space and the ends are
/// trimmed, mirroring how browsers render the markup. Non-breaking
/// spaces survive collapsing; see [`normalize_text`].
pub(crate) fn element_text(element: &ElementRef) -> String {
    let mut text = String::new();
    let mut pending_space = false;

    for chunk in element.text() {
        for character in chunk.chars() {
            if character.is_ascii_whitespace() {
                pending_space = !text.is_empty();
            } else {
                if pending_space {
                    text.push(' ');
                    pending_space = false;
                }
                text.push(character);
            }
        }
    }

    text
}

/// Replaces non-breaking spaces with plain spaces and trims the ends.
pub(crate) fn normalize_text(text: &str) -> String {
    text.replace(NON_BREAKING_SPACE, " ").trim().to_owned()
}

/// The next sibling that is an element, skipping text and comments.
pub(crate) fn next_element_sibling<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Whether the element carries the given `class` token.
pub(crate) fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|candidate| candidate == class)
}

/// Whether the element's tag name matches, ASCII case-insensitive.
pub(crate) fn is_tag(element: &ElementRef, tag: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ruby_annotations() {
        let document =
            parse_document("<p>聖書<rt>せいしょ</rt>を<ruby>読<rt>よ</rt></ruby>む</p>");
        let paragraph = document.select(&PARAGRAPH).next().unwrap();

        assert_eq!("聖書を読む", element_text(&paragraph));
    }

    #[test]
    fn collapses_whitespace_like_rendered_markup() {
        let document = parse_document("<p>  SONG\n\t 1 \n <b>| Prayer</b>  </p>");
        let paragraph = document.select(&PARAGRAPH).next().unwrap();

        assert_eq!("SONG 1 | Prayer", element_text(&paragraph));
    }

    #[test]
    fn normalizes_non_breaking_spaces() {
        assert_eq!("January 1-7", normalize_text("\u{a0}January\u{a0}1-7  "));
        assert_eq!("", normalize_text("  \u{a0} "));
    }

    #[test]
    fn walks_forward_to_element_siblings() {
        let document = parse_document("<h3>A</h3> text <!-- note --> <div>B</div><h3>C</h3>");
        let heading = document.select(&H3).next().unwrap();

        let sibling = next_element_sibling(&heading).unwrap();
        assert!(is_tag(&sibling, "div"));
        assert_eq!("B", element_text(&sibling));
    }
}
