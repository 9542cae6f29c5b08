// src/extractors/elements.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
// Block elements that can carry narrative flow: headings plus paragraph-like
// containers. Old filings often use bare <div>s as paragraphs.
static CANDIDATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, div")
        .expect("Failed to compile CANDIDATE_SELECTOR")
});

// Block-level children that mark a <div> as a container rather than a leaf
// paragraph.
static BLOCK_CHILD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, div, table, h1, h2, h3, h4, h5, h6, ul, ol")
        .expect("Failed to compile BLOCK_CHILD_SELECTOR")
});

// Emphasis wrappers that make a paragraph read as a heading.
static BOLD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("b, strong").expect("Failed to compile BOLD_SELECTOR"));

// Hyperlinks; paragraphs that are nothing but a link are table-of-contents
// entries, not narrative.
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR"));

/// A typed node of the filing's narrative flow. Consumed read-only by the
/// section extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentElement {
    /// A heading-like element (structural title)
    Heading(String),
    /// A body-text-like element (prose)
    Text(String),
}

/// Parses filing HTML into an ordered stream of heading and body-text
/// elements. Nodes that carry no narrative flow (empty, table-nested, link
/// targets, container divs) are dropped at trace level.
pub fn parse_document_elements(html: &str) -> Vec<DocumentElement> {
    let document = Html::parse_document(html);

    let mut elements = Vec::new();
    for element in document.select(&CANDIDATE_SELECTOR) {
        if let Some(parsed) = classify_element(element) {
            elements.push(parsed);
        }
    }

    tracing::debug!("Parsed {} document elements", elements.len());
    elements
}

fn classify_element(element: ElementRef) -> Option<DocumentElement> {
    // Table cells and link text belong to exhibits, data tables, or the
    // table of contents, not the narrative flow.
    if in_table_or_link(element) {
        tracing::trace!("Skipping table/link-nested <{}>", element.value().name());
        return None;
    }

    let text = collect_text(element);
    if text.is_empty() {
        return None;
    }

    // A block whose whole text is one hyperlink is a ToC entry.
    if covered_by(element, &LINK_SELECTOR, &text) {
        tracing::trace!("Skipping link-wrapped <{}>", element.value().name());
        return None;
    }

    let name = element.value().name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(DocumentElement::Heading(text)),
        "p" => {
            if covered_by(element, &BOLD_SELECTOR, &text) {
                Some(DocumentElement::Heading(text))
            } else {
                Some(DocumentElement::Text(text))
            }
        }
        "div" => {
            if element.select(&BLOCK_CHILD_SELECTOR).next().is_some() {
                // container div; its paragraphs are visited on their own
                tracing::trace!("Skipping container <div>");
                None
            } else if covered_by(element, &BOLD_SELECTOR, &text) {
                Some(DocumentElement::Heading(text))
            } else {
                Some(DocumentElement::Text(text))
            }
        }
        _ => None,
    }
}

/// Element text with non-breaking spaces normalized and whitespace runs
/// collapsed to single spaces.
fn collect_text(element: ElementRef) -> String {
    let raw = element.text().collect::<String>().replace('\u{a0}', " ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_table_or_link(element: ElementRef) -> bool {
    for ancestor_node in element.ancestors() {
        if let Some(ancestor) = ElementRef::wrap(ancestor_node) {
            let name = ancestor.value().name();
            if ["td", "th", "tr", "table"].contains(&name) {
                return true;
            }
            if name == "a" && ancestor.value().attr("href").is_some() {
                return true;
            }
            if name == "body" {
                break;
            }
        }
    }
    false
}

/// True when the element's entire text sits inside descendants matching
/// `selector`: bold wrappers mark headings, link wrappers mark ToC entries.
fn covered_by(element: ElementRef, selector: &Selector, full_text: &str) -> bool {
    let wrapped = element
        .select(selector)
        .flat_map(|child| child.text())
        .collect::<String>()
        .replace('\u{a0}', " ");
    let wrapped = wrapped.split_whitespace().collect::<Vec<_>>().join(" ");
    !wrapped.is_empty() && wrapped == full_text
}
