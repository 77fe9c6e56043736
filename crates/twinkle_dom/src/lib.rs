//! Twinkle Document Model
//!
//! A small retained element tree that widgets render into:
//!
//! - **Elements**: arena-backed nodes with tags, ids, class lists and attributes
//! - **Head styles**: CSS fragments keyed by a unique id, inserted at most once
//! - **Events**: listeners per node, bubbling from target to root
//! - **Serialisation**: HTML output for embedding in a host page
//!
//! # Example
//!
//! ```rust
//! use twinkle_dom::prelude::*;
//!
//! let mut doc = Document::new();
//! let card = doc.insert(div().class("card").child(span().text("hi")));
//! doc.append_child(doc.body(), card).unwrap();
//!
//! assert_eq!(doc.to_html(card), r#"<div class="card"><span>hi</span></div>"#);
//! ```

pub mod builder;
pub mod css;
pub mod document;
pub mod error;
pub mod html;
pub mod node;

pub use builder::{div, el, span, ElementBuilder};
pub use css::{CssError, CssRule, Declaration, StyleFragment};
pub use document::{Document, StyleRegistration};
pub use error::DomError;
pub use node::NodeId;

pub mod prelude {
    pub use crate::builder::{div, el, span, ElementBuilder};
    pub use crate::document::{Document, StyleRegistration};
    pub use crate::node::NodeId;
    pub use twinkle_core::events::{event_types, Event};
}
