//! Twinkle Widget Library
//!
//! Chat transcript widgets built on the Twinkle document model.
//!
//! - [`star_rating()`]: five-star rating selector reporting through a callback
//! - [`ensure_star_rating_styles`]: idempotent registration of its stylesheet
//! - [`TypingIndicator`]: host capability shown before a rating is reported

pub mod rating;
pub mod star_rating;
pub mod style;
pub mod typing;

pub use rating::{Rating, RatingError};
pub use star_rating::{star_rating, RatingCallback, StarRating, StarRatingBuilder, STAR_GLYPH};
pub use style::{ensure_star_rating_styles, StarRatingStyle, STAR_RATING_STYLE_ID};
pub use typing::{NoTyping, TypingIndicator};
