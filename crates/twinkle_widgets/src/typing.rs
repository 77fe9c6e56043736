//! Typing indicator capability
//!
//! The host decides what "a response is pending" looks like. The star rating
//! widget only calls [`TypingIndicator::show_typing`] before reporting a
//! rating, so tests can pass a recorder and hosts can append a bubble.

use twinkle_dom::Document;

/// Host capability signalling that a reply is on its way
pub trait TypingIndicator: Send + Sync {
    fn show_typing(&self, doc: &mut Document);
}

impl<F> TypingIndicator for F
where
    F: Fn(&mut Document) + Send + Sync,
{
    fn show_typing(&self, doc: &mut Document) {
        self(doc)
    }
}

/// Absent capability: showing the indicator does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTyping;

impl TypingIndicator for NoTyping {
    fn show_typing(&self, _doc: &mut Document) {}
}
