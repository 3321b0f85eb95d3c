// Document module - in-memory page tree the animator works against
//
// A deliberately small DOM: elements with a tag, an optional id, classes,
// attributes, text content, inline style and a vertical box (top + height).
// Horizontal layout is not modeled; visibility only depends on the vertical axis.
//
// Elements live in an arena indexed by `ElementId`. Ids are never reused, so a
// handle stays valid for the whole page lifetime.

mod manifest;
mod selector;

pub use manifest::{PageManifest, ScrollStep};
pub use selector::Selector;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Stable handle to an element in a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Vertical box of an element in document coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Everything needed to create an element
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub rect: Rect,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[cfg(test)]
    pub fn rect(mut self, top: f64, height: f64) -> Self {
        self.rect = Rect::new(top, height);
        self
    }
}

/// A single node of the page tree
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub text: String,
    /// Inline style, ordered by property name for stable output
    pub style: BTreeMap<String, String>,
    pub rect: Rect,
    children: Vec<ElementId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The page tree
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element as the last child of `parent` (or as a new root)
    ///
    /// # Panics
    /// If `parent` does not belong to this document.
    pub fn append(&mut self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: spec.tag,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            text: spec.text,
            style: BTreeMap::new(),
            rect: spec.rect,
            children: Vec::new(),
        });

        match parent {
            Some(p) => self.elements[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map(|el| el.text.as_str()).unwrap_or("")
    }

    /// Replace an element's text. Returns true if the text actually changed.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        match self.elements.get_mut(id.0) {
            Some(el) if el.text != text => {
                el.text = text.to_string();
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    /// Set an inline style property. Returns true if the value actually changed.
    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> bool {
        let Some(el) = self.elements.get_mut(id.0) else {
            return false;
        };
        if el.style.get(property).map(String::as_str) == Some(value) {
            return false;
        }
        el.style.insert(property.to_string(), value.to_string());
        true
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|el| el.rect)
    }

    /// Total scrollable height: the lowest bottom edge of any element
    pub fn height(&self) -> f64 {
        self.elements
            .iter()
            .map(|el| el.rect.bottom())
            .fold(0.0, f64::max)
    }

    /// All elements in document (pre-)order
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.elements[id.0].children.iter().rev().copied());
            Some(id)
        })
    }

    /// Descendants of `root` in document order, excluding `root` itself
    pub fn descendants(&self, root: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack: Vec<ElementId> = self
            .get(root)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.elements[id.0].children.iter().rev().copied());
            Some(id)
        })
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<ElementId> {
        self.iter().find(|&id| selector.matches(&self.elements[id.0]))
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.iter()
            .filter(|&id| selector.matches(&self.elements[id.0]))
            .collect()
    }

    /// Matching descendants of `root`
    pub fn query_within(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(root)
            .filter(|&id| selector.matches(&self.elements[id.0]))
            .collect()
    }

    /// Short human-readable label such as `div#stats.stats-section`
    pub fn label(&self, id: ElementId) -> String {
        let Some(el) = self.get(id) else {
            return id.to_string();
        };
        let mut label = el.tag.clone();
        if let Some(dom_id) = &el.id {
            label.push('#');
            label.push_str(dom_id);
        }
        for class in &el.classes {
            label.push('.');
            label.push_str(class);
        }
        if el.id.is_none() {
            label.push_str(&id.to_string());
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let section = doc.append(
            None,
            ElementSpec::new("section")
                .id("stats")
                .class("stats-section")
                .rect(1000.0, 400.0),
        );
        let first = doc.append(
            Some(section),
            ElementSpec::new("span")
                .class("counter")
                .attr("data-target", "250")
                .text("0"),
        );
        let footer = doc.append(None, ElementSpec::new("footer").rect(1400.0, 200.0));
        (doc, section, first, footer)
    }

    #[test]
    fn test_document_order_follows_tree() {
        let (mut doc, section, first, footer) = sample();
        // Appended after the footer, but belongs before it in document order
        let second = doc.append(Some(section), ElementSpec::new("span").class("counter"));

        let order: Vec<_> = doc.iter().collect();
        assert_eq!(order, vec![section, first, second, footer]);
    }

    #[test]
    fn test_query_within_excludes_root_and_outsiders() {
        let (mut doc, section, first, _) = sample();
        let outside = doc.append(None, ElementSpec::new("span").class("counter"));

        let counter = Selector::parse(".counter").unwrap();
        assert_eq!(doc.query_within(section, &counter), vec![first]);
        assert_eq!(doc.query_selector_all(&counter), vec![first, outside]);
    }

    #[test]
    fn test_set_text_reports_change_only() {
        let (mut doc, _, first, _) = sample();
        assert!(!doc.set_text(first, "0"));
        assert!(doc.set_text(first, "12"));
        assert_eq!(doc.text(first), "12");
    }

    #[test]
    fn test_set_style_reports_change_only() {
        let (mut doc, section, _, _) = sample();
        assert!(doc.set_style(section, "opacity", "0"));
        assert!(!doc.set_style(section, "opacity", "0"));
        assert!(doc.set_style(section, "opacity", "1"));
        assert_eq!(doc.style(section, "opacity"), Some("1"));
    }

    #[test]
    fn test_height_is_lowest_bottom_edge() {
        let (doc, ..) = sample();
        assert_eq!(doc.height(), 1600.0);
    }

    #[test]
    fn test_label() {
        let (doc, section, first, _) = sample();
        assert_eq!(doc.label(section), "section#stats.stats-section");
        assert_eq!(doc.label(first), format!("span.counter{}", first));
    }
}
