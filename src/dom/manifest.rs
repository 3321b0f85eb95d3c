// Page manifest - TOML description of a page layout plus a scroll script
//
// Example:
//
//   title = "Buildex"
//   viewport_height = 800
//
//   [[elements]]
//   tag = "section"
//   class = "stats-section"
//   top = 1200
//   height = 400
//
//   [[elements.children]]
//   class = "counter"
//   text = "0"
//   attrs = { data-target = "250" }
//
//   [[scroll]]
//   at_ms = 500
//   y = 900
//
// Child `top` is relative to the parent; a missing `height` inherits the parent's.

use super::{Document, ElementId, ElementSpec, Rect};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One step of the scroll script: at `at_ms` page time, scroll to `y`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScrollStep {
    pub at_ms: u64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ElementNode {
    #[serde(default = "default_tag")]
    tag: String,
    id: Option<String>,
    #[serde(default)]
    class: String,
    #[serde(default)]
    top: f64,
    height: Option<f64>,
    #[serde(default)]
    text: String,
    /// Attribute values may be written as strings or bare numbers
    #[serde(default)]
    attrs: HashMap<String, toml::Value>,
    #[serde(default)]
    children: Vec<ElementNode>,
}

fn default_tag() -> String {
    "div".to_string()
}

/// A parsed page description
#[derive(Debug, Clone, Deserialize)]
pub struct PageManifest {
    #[serde(default)]
    pub title: String,
    pub viewport_height: Option<f64>,
    #[serde(default)]
    elements: Vec<ElementNode>,
    #[serde(default)]
    scroll: Vec<ScrollStep>,
}

impl PageManifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page manifest {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid page manifest {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse page manifest TOML")
    }

    /// Build the element tree with absolute geometry
    pub fn build_document(&self) -> Document {
        let mut doc = Document::new();
        for node in &self.elements {
            append_node(&mut doc, None, Rect::default(), node);
        }
        doc
    }

    /// Scroll steps ordered by time (stable for equal timestamps)
    pub fn scroll_script(&self) -> Vec<ScrollStep> {
        let mut steps = self.scroll.clone();
        steps.sort_by_key(|s| s.at_ms);
        steps
    }
}

fn append_node(doc: &mut Document, parent: Option<ElementId>, parent_rect: Rect, node: &ElementNode) {
    let rect = Rect::new(
        parent_rect.top + node.top,
        node.height.unwrap_or(parent_rect.height),
    );

    let mut spec = ElementSpec::new(node.tag.as_str())
        .class(&node.class)
        .text(node.text.as_str());
    spec.rect = rect;
    if let Some(id) = &node.id {
        spec = spec.id(id.as_str());
    }
    for (name, value) in &node.attrs {
        let value = match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        spec = spec.attr(name.as_str(), value);
    }

    let id = doc.append(parent, spec);
    for child in &node.children {
        append_node(doc, Some(id), rect, child);
    }
}
