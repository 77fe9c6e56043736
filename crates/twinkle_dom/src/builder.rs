//! Fluent element builders
//!
//! Builders describe a subtree without touching a document; pass one to
//! [`Document::insert`](crate::Document::insert) to materialise it.
//!
//! ```rust
//! use twinkle_dom::prelude::*;
//!
//! let row = div()
//!     .class("stars")
//!     .children((1..=3).map(|i| span().class("star").attr("data-value", i.to_string())));
//!
//! let mut doc = Document::new();
//! let id = doc.insert(row);
//! assert_eq!(doc.query_class(id, "star").len(), 3);
//! ```

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::node::ElementData;

/// Description of an element and its children
#[derive(Clone, Debug)]
pub struct ElementBuilder {
    data: ElementData,
    text: Option<String>,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            data: ElementData::new(tag),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.data.id = Some(id.into());
        self
    }

    /// Add one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.data.has_class(class) {
                self.data.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.attributes.insert(name.into(), value.into());
        self
    }

    /// Inline `style` attribute
    pub fn style(self, css: impl Into<String>) -> Self {
        self.attr("style", css)
    }

    /// Leading text content, placed before any children
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn classes(&self) -> &SmallVec<[String; 4]> {
        &self.data.classes
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.data.attributes
    }

    pub(crate) fn into_parts(self) -> (ElementData, Option<String>, Vec<ElementBuilder>) {
        (self.data, self.text, self.children)
    }
}

/// Create a builder for any tag
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(tag)
}

pub fn div() -> ElementBuilder {
    el("div")
}

pub fn span() -> ElementBuilder {
    el("span")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_splits_and_dedupes() {
        let b = div().class("star-wrapper  big").class("big");
        assert_eq!(b.classes().as_slice(), &["star-wrapper", "big"]);
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let b = span().attr("data-value", "3").attr("role", "button").attr("data-value", "4");
        let pairs: Vec<_> = b.attributes().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("data-value", "4"), ("role", "button")]);
    }
}
