//! Minimal HTML document model for the counter markup.
//!
//! Only what the page-load handler needs is modelled: `<meta>` attributes
//! and elements tagged with a `data-count` attribute. Everything else in the
//! source is carried through untouched, so a document nobody wrote into
//! renders byte-identical to its input.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

pub const NAMESPACE_META: &str = "countapi-namespace";
pub const SLOT_ATTRIBUTE: &str = "data-count";

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"<([A-Za-z][A-Za-z0-9-]*)"#,
        r#"((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)"#,
        r#"\s*(/?)>"#,
    ))
    .expect("tag pattern")
});

static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)(?:[\s/][^>]*)?>").expect("open/close pattern")
});

/// Comments and the raw text of elements whose content is not markup.
static OPAQUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)<!--.*?(?:-->|\z)",
        r"|<script\b[^>]*>.*?(?:</script\s*>|\z)",
        r"|<style\b[^>]*>.*?(?:</style\s*>|\z)",
        r"|<textarea\b[^>]*>.*?(?:</textarea\s*>|\z)",
        r"|<title\b[^>]*>.*?(?:</title\s*>|\z)",
    ))
    .expect("opaque pattern")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Anything that can receive the text of a counter.
pub trait TextTarget: Send {
    fn set_text(&mut self, text: &str);
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    slot: String,
    content: Option<Range<usize>>,
    text: Option<String>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of the element's `data-count` attribute.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Text written since the document was parsed.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Void and self-closing elements accept writes but have no content to
    /// replace.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

impl TextTarget for Element {
    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}

/// Disjoint handles to the first `total` and `today` elements of a page.
#[derive(Debug)]
pub struct CounterSlots<'a> {
    pub total: Option<&'a mut Element>,
    pub today: Option<&'a mut Element>,
}

#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    metas: Vec<HashMap<String, String>>,
    elements: Vec<Element>,
}

impl Document {
    pub fn parse(html: impl Into<String>) -> Self {
        let source = html.into();
        let mut metas = Vec::new();
        let mut elements = Vec::new();
        let opaque: Vec<Range<usize>> = OPAQUE_RE.find_iter(&source).map(|m| m.range()).collect();

        for caps in TAG_RE.captures_iter(&source) {
            let Some(whole) = caps.get(0) else { continue };
            if inside(&opaque, whole.start()) {
                continue;
            }
            let tag = caps[1].to_ascii_lowercase();
            let attrs = parse_attributes(caps.get(2).map_or("", |m| m.as_str()));

            if tag == "meta" {
                metas.push(attrs);
                continue;
            }

            let Some(slot) = attrs.get(SLOT_ATTRIBUTE) else {
                continue;
            };
            let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            let content = if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                None
            } else {
                find_content(&source, &opaque, &tag, whole.end())
            };

            elements.push(Element {
                slot: slot.clone(),
                tag,
                content,
                text: None,
            });
        }

        Self {
            source,
            metas,
            elements,
        }
    }

    /// `content` of the first `<meta>` whose `name` matches. A tag without a
    /// `content` attribute yields an empty string.
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.metas
            .iter()
            .find(|attrs| attrs.get("name").map(String::as_str) == Some(name))
            .map(|attrs| attrs.get("content").cloned().unwrap_or_default())
    }

    pub fn namespace(&self) -> Option<String> {
        self.meta_content(NAMESPACE_META)
    }

    pub fn element(&self, slot: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.slot == slot)
    }

    pub fn element_mut(&mut self, slot: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.slot == slot)
    }

    pub fn counter_slots(&mut self) -> CounterSlots<'_> {
        let mut slots = CounterSlots {
            total: None,
            today: None,
        };
        for el in self.elements.iter_mut() {
            match el.slot.as_str() {
                "total" if slots.total.is_none() => slots.total = Some(el),
                "today" if slots.today.is_none() => slots.today = Some(el),
                _ => {}
            }
        }
        slots
    }

    pub fn render(&self) -> String {
        let mut edits: Vec<(&Range<usize>, &str)> = self
            .elements
            .iter()
            .filter_map(|el| Some((el.content.as_ref()?, el.text.as_deref()?)))
            .collect();
        edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (range, text) in edits {
            // nested inside an element that was already replaced
            if range.start < cursor {
                continue;
            }
            out.push_str(&self.source[cursor..range.start]);
            out.push_str(&escape_text(text));
            cursor = range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for caps in ATTR_RE.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or(String::new(), |m| unescape_attribute(m.as_str()));
        attrs.entry(name).or_insert(value);
    }
    attrs
}

fn find_content(
    source: &str,
    opaque: &[Range<usize>],
    tag: &str,
    start: usize,
) -> Option<Range<usize>> {
    let mut depth = 0usize;
    for caps in ANY_TAG_RE.captures_iter(&source[start..]) {
        let m = caps.get(0)?;
        let at = start + m.start();
        if !caps[2].eq_ignore_ascii_case(tag) || inside(opaque, at) {
            continue;
        }
        if caps[1].is_empty() {
            depth += 1;
        } else if depth == 0 {
            return Some(start..at);
        } else {
            depth -= 1;
        }
    }
    None
}

/// True when `pos` falls after the start of one of `ranges`. A range's own
/// opening tag (e.g. `<script>`) is still visible.
fn inside(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|range| pos > range.start && pos < range.end)
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_attribute(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
