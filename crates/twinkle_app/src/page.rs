//! Chat page host
//!
//! Owns the document, registers the star rating stylesheet once at startup
//! and places rating requests into the transcript. Ratings are queued in an
//! outbox for whatever transport the embedding application uses.

use std::sync::{Arc, Mutex, PoisonError};

use twinkle_dom::html::escape_text;
use twinkle_dom::prelude::*;
use twinkle_dom::DomError;
use twinkle_widgets::{
    ensure_star_rating_styles, star_rating, Rating, StarRating, TypingIndicator,
};

use crate::config::TwinkleConfig;

/// Id of the transcript element
pub const CHAT_BOX_ID: &str = "chat-box";
/// Id of the "bot is typing" bubble
pub const TYPING_ID: &str = "bot-typing";

/// A message queued for the bot backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutgoingMessage {
    Text(String),
    Rating(Rating),
}

impl OutgoingMessage {
    /// Wire form: plain text, or an intent with a `rating` entity
    pub fn payload(&self) -> String {
        match self {
            OutgoingMessage::Text(text) => text.clone(),
            OutgoingMessage::Rating(rating) => format!("/rate{{\"rating\":{rating}}}"),
        }
    }
}

/// Bot reply acknowledging a rating
pub fn thank_you_message(rating: Rating) -> String {
    let plural = if rating.get() > 1 { "s" } else { "" };
    format!("Thanks for rating us {rating} star{plural}!")
}

type Outbox = Arc<Mutex<Vec<OutgoingMessage>>>;

/// Appends a single typing bubble to the transcript
struct BotTyping {
    chat_box: NodeId,
}

impl TypingIndicator for BotTyping {
    fn show_typing(&self, doc: &mut Document) {
        if doc.get_element_by_id(TYPING_ID).is_some() {
            return;
        }

        let bubble = doc.insert(
            div()
                .id(TYPING_ID)
                .class("botTyping")
                .children((0..3).map(|_| span().class("dot"))),
        );
        if let Err(err) = doc.append_child(self.chat_box, bubble) {
            tracing::warn!(%err, "could not show typing indicator");
            doc.remove(bubble);
        }
    }
}

/// A chat transcript page
pub struct ChatPage {
    doc: Document,
    chat_box: NodeId,
    config: TwinkleConfig,
    typing: Arc<dyn TypingIndicator>,
    outbox: Outbox,
}

impl ChatPage {
    /// Build the page: styles first, then the transcript and greeting
    pub fn new(config: TwinkleConfig) -> Result<Self, DomError> {
        let mut doc = Document::new();
        ensure_star_rating_styles(&mut doc, &config.rating)?;

        let chat_box = doc.insert(div().id(CHAT_BOX_ID).class("chat-box"));
        let body = doc.body();
        doc.append_child(body, chat_box)?;

        let greeting = config.page.greeting.clone();
        let mut page = Self {
            doc,
            chat_box,
            config,
            typing: Arc::new(BotTyping { chat_box }),
            outbox: Arc::new(Mutex::new(Vec::new())),
        };
        page.push_bot_message(greeting)?;

        tracing::info!(title = %page.config.page.title, "chat page ready");
        Ok(page)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &TwinkleConfig {
        &self.config
    }

    /// Transcript entries in order
    pub fn messages(&self) -> &[NodeId] {
        self.doc.children(self.chat_box)
    }

    /// Append a bot message, replacing the typing bubble if shown
    pub fn push_bot_message(&mut self, text: impl Into<String>) -> Result<NodeId, DomError> {
        self.hide_typing();
        self.push_message("botMsg", text.into())
    }

    /// Append a user message and queue it for the backend
    pub fn push_user_message(&mut self, text: impl Into<String>) -> Result<NodeId, DomError> {
        let text = text.into();
        let node = self.push_message("userMsg", text.clone())?;
        self.enqueue(OutgoingMessage::Text(text));
        Ok(node)
    }

    /// Ask the user for a star rating
    pub fn request_rating(&mut self) -> Result<StarRating, DomError> {
        let prompt = self.config.page.rating_prompt.clone();
        self.push_bot_message(prompt)?;

        let outbox = self.outbox.clone();
        let widget = star_rating()
            .style(self.config.rating.clone())
            .typing_shared(self.typing.clone())
            .on_rate(move |rating| {
                outbox
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(OutgoingMessage::Rating(rating));
            })
            .build(&mut self.doc);

        self.doc.append_child(self.chat_box, widget.container())?;
        Ok(widget)
    }

    /// Click a star on one of this page's widgets
    pub fn rate(&mut self, widget: &StarRating, rating: Rating) {
        self.doc.click(widget.star(rating));
    }

    /// Reply to a rating the way the bot backend does
    pub fn acknowledge(&mut self, rating: Rating) -> Result<NodeId, DomError> {
        self.push_bot_message(thank_you_message(rating))
    }

    pub fn is_typing(&self) -> bool {
        self.doc.get_element_by_id(TYPING_ID).is_some()
    }

    pub fn hide_typing(&mut self) {
        if let Some(bubble) = self.doc.get_element_by_id(TYPING_ID) {
            self.doc.remove(bubble);
        }
    }

    /// Drain queued messages
    pub fn take_outbox(&self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Full HTML page: head styles plus the body tree
    pub fn render_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n{}\n</html>\n",
            escape_text(&self.config.page.title),
            self.doc.head_html(),
            self.doc.to_html(self.doc.body()),
        )
    }

    fn push_message(&mut self, class: &str, text: String) -> Result<NodeId, DomError> {
        let node = self.doc.insert(div().class(class).text(text));
        self.doc.append_child(self.chat_box, node)?;
        Ok(node)
    }

    fn enqueue(&self, message: OutgoingMessage) {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}
