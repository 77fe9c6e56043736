//! Five-star rating selector
//!
//! Renders a row of five star glyphs, each labelled with its value, inside a
//! bot message bubble. Clicking star `n` selects stars `1..=n`, shows the
//! host's typing indicator and reports `n` to the rating callback.
//!
//! The committed rating lives in the document itself: it is the prefix of
//! stars carrying the `selected` class. Hovering a star only toggles a
//! cosmetic `hovered` class.
//!
//! # Example
//!
//! ```rust
//! use twinkle_dom::Document;
//! use twinkle_widgets::{ensure_star_rating_styles, star_rating, Rating, StarRatingStyle};
//!
//! let mut doc = Document::new();
//! ensure_star_rating_styles(&mut doc, &StarRatingStyle::default()).unwrap();
//!
//! let widget = star_rating()
//!     .on_rate(|rating| println!("rated {rating}"))
//!     .build(&mut doc);
//! doc.append_child(doc.body(), widget.container()).unwrap();
//!
//! let three = Rating::new(3).unwrap();
//! doc.click(widget.star(three));
//! assert_eq!(widget.selected(&doc), Some(three));
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use twinkle_core::events::event_types;
use twinkle_core::fsm::StateMachine;
use twinkle_dom::prelude::*;

use crate::rating::Rating;
use crate::style::{StarRatingStyle, STAR_RATING_STYLE_ID};
use crate::typing::{NoTyping, TypingIndicator};

/// The star glyph (BLACK STAR)
pub const STAR_GLYPH: &str = "\u{2605}";

/// Class names forming the widget's visual contract
pub mod classes {
    pub const CONTAINER: &str = "rating-container";
    pub const BUBBLE: &str = "botMsg";
    pub const ROW: &str = "stars";
    pub const WRAPPER: &str = "star-wrapper";
    pub const STAR: &str = "star";
    pub const LABEL: &str = "star-label";
    pub const SELECTED: &str = "selected";
    pub const HOVERED: &str = "hovered";
}

/// Hover states for a single star
pub mod states {
    pub const IDLE: u32 = 0;
    pub const HOVERED: u32 = 1;
}

/// Callback receiving the committed rating
pub type RatingCallback = Arc<dyn Fn(Rating) + Send + Sync>;

/// Handle to a built star rating widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarRating {
    container: NodeId,
    stars: Vec<NodeId>,
}

impl StarRating {
    /// Root element, ready to be appended anywhere in the document
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Glyph element for a rating value
    pub fn star(&self, rating: Rating) -> NodeId {
        self.stars[usize::from(rating.get() - Rating::MIN)]
    }

    /// Glyph elements in ascending value order
    pub fn stars(&self) -> &[NodeId] {
        &self.stars
    }

    /// The committed rating, read back from the `selected` classes
    pub fn selected(&self, doc: &Document) -> Option<Rating> {
        let count = self
            .stars
            .iter()
            .take_while(|star| doc.has_class(**star, classes::SELECTED))
            .count();
        u8::try_from(count).ok().and_then(|n| Rating::new(n).ok())
    }

    /// Values of every star currently marked selected
    pub fn selected_values(&self, doc: &Document) -> Vec<u8> {
        Rating::all()
            .zip(&self.stars)
            .filter(|(_, star)| doc.has_class(**star, classes::SELECTED))
            .map(|(rating, _)| rating.get())
            .collect()
    }

    /// Values of every star currently showing the hover affordance
    pub fn hovered_values(&self, doc: &Document) -> Vec<u8> {
        Rating::all()
            .zip(&self.stars)
            .filter(|(_, star)| doc.has_class(**star, classes::HOVERED))
            .map(|(rating, _)| rating.get())
            .collect()
    }
}

/// Builder for [`StarRating`]
pub struct StarRatingBuilder {
    on_rate: Option<RatingCallback>,
    typing: Arc<dyn TypingIndicator>,
    style: StarRatingStyle,
}

impl StarRatingBuilder {
    pub fn new() -> Self {
        Self {
            on_rate: None,
            typing: Arc::new(NoTyping),
            style: StarRatingStyle::default(),
        }
    }

    /// Set the rating callback.
    ///
    /// Called once per click with the clicked star's value, after the typing
    /// indicator.
    pub fn on_rate<F>(mut self, callback: F) -> Self
    where
        F: Fn(Rating) + Send + Sync + 'static,
    {
        self.on_rate = Some(Arc::new(callback));
        self
    }

    /// Set the typing indicator shown before the callback fires
    pub fn typing(mut self, indicator: impl TypingIndicator + 'static) -> Self {
        self.typing = Arc::new(indicator);
        self
    }

    /// Share an indicator already held by the host
    pub fn typing_shared(mut self, indicator: Arc<dyn TypingIndicator>) -> Self {
        self.typing = indicator;
        self
    }

    /// Use non-default tokens for the inline bubble style
    pub fn style(mut self, style: StarRatingStyle) -> Self {
        self.style = style;
        self
    }

    /// Create the widget's elements in `doc` and wire their listeners.
    ///
    /// The container is returned detached.
    pub fn build(self, doc: &mut Document) -> StarRating {
        if doc.style(STAR_RATING_STYLE_ID).is_none() {
            tracing::warn!(
                id = STAR_RATING_STYLE_ID,
                "building a star rating before its stylesheet is registered"
            );
        }

        let row = div().class(classes::ROW).children(Rating::all().map(|rating| {
            div()
                .class(classes::WRAPPER)
                .child(
                    span()
                        .class(classes::STAR)
                        .attr("data-value", rating.to_string())
                        .text(STAR_GLYPH),
                )
                .child(div().class(classes::LABEL).text(rating.to_string()))
        }));
        let container = doc.insert(
            div().class(classes::CONTAINER).child(
                div()
                    .class(classes::BUBBLE)
                    .style(self.style.bubble_style())
                    .child(row),
            ),
        );

        let stars = doc.query_class(container, classes::STAR);
        let widget = StarRating { container, stars };

        for (index, rating) in Rating::all().enumerate() {
            let star = widget.stars[index];
            wire_click(doc, star, index, rating, &widget.stars, &self);
            wire_hover(doc, star);
        }

        tracing::debug!(
            container = ?container,
            has_callback = self.on_rate.is_some(),
            "built star rating"
        );
        widget
    }
}

impl Default for StarRatingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a star rating builder
pub fn star_rating() -> StarRatingBuilder {
    StarRatingBuilder::new()
}

fn wire_click(
    doc: &mut Document,
    star: NodeId,
    index: usize,
    rating: Rating,
    stars: &[NodeId],
    builder: &StarRatingBuilder,
) {
    let stars = stars.to_vec();
    let typing = builder.typing.clone();
    let on_rate = builder.on_rate.clone();

    doc.add_listener(star, event_types::CLICK, move |doc, _event| {
        for (i, s) in stars.iter().enumerate() {
            doc.toggle_class(*s, classes::SELECTED, Some(i <= index));
        }
        tracing::debug!(rating = rating.get(), "star rating selected");

        isolate("typing indicator", || typing.show_typing(doc));
        if let Some(callback) = &on_rate {
            isolate("rating callback", || callback(rating));
        }
    });
}

fn wire_hover(doc: &mut Document, star: NodeId) {
    let fsm = Arc::new(Mutex::new(
        StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_ENTER, states::HOVERED)
            .on(states::HOVERED, event_types::POINTER_LEAVE, states::IDLE)
            .build(),
    ));

    for event_type in [event_types::POINTER_ENTER, event_types::POINTER_LEAVE] {
        let fsm = fsm.clone();
        doc.add_listener(star, event_type, move |doc, event| {
            let hovered = {
                let mut fsm = fsm.lock().unwrap_or_else(PoisonError::into_inner);
                fsm.send(event.event_type);
                fsm.is_in(states::HOVERED)
            };
            doc.toggle_class(star, classes::HOVERED, Some(hovered));
        });
    }
}

/// Run a host-supplied side effect so that a panic inside it cannot skip
/// the side effects after it.
fn isolate(what: &'static str, side_effect: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(side_effect)).is_err() {
        tracing::error!(side_effect = what, "star rating side effect panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(doc: &mut Document) -> StarRating {
        let widget = star_rating().build(doc);
        doc.append_child(doc.body(), widget.container()).unwrap();
        widget
    }

    fn rating(n: u8) -> Rating {
        Rating::new(n).unwrap()
    }

    #[test]
    fn test_structure() {
        let mut doc = Document::new();
        let widget = built(&mut doc);

        assert!(doc.has_class(widget.container(), classes::CONTAINER));
        assert_eq!(widget.stars().len(), 5);
        assert_eq!(doc.query_class(widget.container(), classes::WRAPPER).len(), 5);

        let labels = doc.query_class(widget.container(), classes::LABEL);
        let label_text: Vec<_> = labels.iter().map(|l| doc.text_content(*l)).collect();
        assert_eq!(label_text, vec!["1", "2", "3", "4", "5"]);

        for (n, star) in (1..=5).zip(widget.stars()) {
            assert_eq!(doc.tag(*star), Some("span"));
            assert_eq!(doc.attribute(*star, "data-value"), Some(n.to_string().as_str()));
            assert_eq!(doc.text_content(*star), STAR_GLYPH);
        }
    }

    #[test]
    fn test_label_sits_below_glyph() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        let wrapper = doc.query_class(widget.container(), classes::WRAPPER)[0];
        let children = doc.children(wrapper);

        assert!(doc.has_class(children[0], classes::STAR));
        assert!(doc.has_class(children[1], classes::LABEL));
    }

    #[test]
    fn test_initially_unset() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        assert_eq!(widget.selected(&doc), None);
        assert!(widget.selected_values(&doc).is_empty());
    }

    #[test]
    fn test_click_selects_prefix() {
        for n in 1..=5u8 {
            let mut doc = Document::new();
            let widget = built(&mut doc);

            doc.click(widget.star(rating(n)));
            let expected: Vec<u8> = (1..=n).collect();
            assert_eq!(widget.selected_values(&doc), expected);
            assert_eq!(widget.selected(&doc), Some(rating(n)));
        }
    }

    #[test]
    fn test_last_click_wins() {
        let mut doc = Document::new();
        let widget = built(&mut doc);

        doc.click(widget.star(rating(4)));
        doc.click(widget.star(rating(2)));
        assert_eq!(widget.selected_values(&doc), vec![1, 2]);

        doc.click(widget.star(rating(5)));
        assert_eq!(widget.selected_values(&doc), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_repeat_click_is_idempotent() {
        let mut doc = Document::new();
        let widget = built(&mut doc);

        doc.click(widget.star(rating(3)));
        doc.click(widget.star(rating(3)));
        assert_eq!(widget.selected_values(&doc), vec![1, 2, 3]);
    }

    #[test]
    fn test_click_without_callback_does_not_panic() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        for star in widget.stars().to_vec() {
            doc.click(star);
        }
        assert_eq!(widget.selected(&doc), Some(rating(5)));
    }

    #[test]
    fn test_hover_is_cosmetic() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        doc.click(widget.star(rating(2)));

        doc.pointer_enter(widget.star(rating(4)));
        assert_eq!(widget.hovered_values(&doc), vec![4]);
        assert_eq!(widget.selected_values(&doc), vec![1, 2]);

        doc.pointer_leave(widget.star(rating(4)));
        assert!(widget.hovered_values(&doc).is_empty());
        assert_eq!(widget.selected(&doc), Some(rating(2)));
    }

    #[test]
    fn test_leaving_selected_star_keeps_selection() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        doc.click(widget.star(rating(2)));

        let first = widget.star(rating(1));
        doc.pointer_enter(first);
        assert!(doc.has_class(first, classes::HOVERED));
        assert!(doc.has_class(first, classes::SELECTED));

        doc.pointer_leave(first);
        assert!(!doc.has_class(first, classes::HOVERED));
        assert!(doc.has_class(first, classes::SELECTED));
        assert_eq!(widget.selected_values(&doc), vec![1, 2]);
    }

    #[test]
    fn test_hover_does_not_reach_the_callback() {
        let calls = Arc::new(Mutex::new(0u32));
        let sink = calls.clone();
        let mut doc = Document::new();
        let widget = star_rating()
            .on_rate(move |_| *sink.lock().unwrap() += 1)
            .build(&mut doc);

        doc.pointer_enter(widget.star(rating(3)));
        doc.pointer_leave(widget.star(rating(3)));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_detached_widget_still_responds() {
        let mut doc = Document::new();
        let widget = star_rating().build(&mut doc);
        doc.click(widget.star(rating(1)));
        assert_eq!(widget.selected(&doc), Some(rating(1)));
    }

    #[test]
    fn test_removing_container_drops_listeners() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        assert!(doc.listener_count() > 0);

        doc.remove(widget.container());
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(widget.selected(&doc), None);
    }

    #[test]
    fn test_build_never_registers_styles() {
        let mut doc = Document::new();
        let widget = built(&mut doc);
        star_rating().build(&mut doc);

        assert_eq!(doc.styles().count(), 0);
        assert_eq!(doc.style_count_with_id(STAR_RATING_STYLE_ID), 0);
        assert_eq!(doc.head_html(), "");

        doc.click(widget.star(rating(3)));
        assert_eq!(widget.selected(&doc), Some(rating(3)));
    }

    #[test]
    fn test_bubble_uses_configured_margin() {
        let mut doc = Document::new();
        let style = StarRatingStyle {
            bubble_margin: 4.0,
            ..StarRatingStyle::default()
        };
        let widget = star_rating().style(style).build(&mut doc);
        let bubble = doc.query_class(widget.container(), classes::BUBBLE)[0];
        assert_eq!(doc.attribute(bubble, "style"), Some("margin-top: 4px;"));
    }
}
