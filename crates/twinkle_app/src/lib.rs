//! Twinkle application layer
//!
//! Hosts the star rating widget in a chat transcript page:
//!
//! - [`ChatPage`]: document owner, startup style registration, typing bubble
//!   and rating outbox
//! - [`TwinkleConfig`]: TOML configuration for page text and widget styling

pub mod config;
pub mod page;

pub use config::{ConfigError, PageConfig, TwinkleConfig};
pub use page::{thank_you_message, ChatPage, OutgoingMessage};
