//! Star rating appearance and its shared stylesheet
//!
//! The stylesheet is registered once per document under
//! [`STAR_RATING_STYLE_ID`]. Hosts call [`ensure_star_rating_styles`] during
//! startup; repeated calls are no-ops.

use serde::{Deserialize, Serialize};
use twinkle_dom::{Document, DomError, StyleRegistration};

/// Unique id of the shared star rating style fragment
pub const STAR_RATING_STYLE_ID: &str = "star-rating-style";

/// Visual tokens for the star rating widget.
///
/// Every field has a default so partial configuration files work.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StarRatingStyle {
    /// Glyph font size in px
    pub star_size: f32,
    /// Horizontal gap between stars in px
    pub gap: f32,
    /// Vertical padding of the star row in px
    pub padding: f32,
    /// Colour of unselected stars
    pub idle_color: String,
    /// Colour of hovered and selected stars
    pub active_color: String,
    /// Scale applied to a hovered star
    pub hover_scale: f32,
    /// Row colour transition in seconds
    pub row_transition: f32,
    /// Star transform/colour transition in seconds
    pub star_transition: f32,
    /// Label font size in px
    pub label_size: f32,
    pub label_color: String,
    /// Space between a star and its label in px
    pub label_margin: f32,
    /// Space above the bubble holding the stars in px
    pub bubble_margin: f32,
}

impl Default for StarRatingStyle {
    fn default() -> Self {
        Self {
            star_size: 32.0,
            gap: 8.0,
            padding: 8.0,
            idle_color: "#ccc".to_string(),
            active_color: "gold".to_string(),
            hover_scale: 1.2,
            row_transition: 0.3,
            star_transition: 0.2,
            label_size: 14.0,
            label_color: "#888".to_string(),
            label_margin: 2.0,
            bubble_margin: 10.0,
        }
    }
}

impl StarRatingStyle {
    /// Render the shared stylesheet for these tokens
    pub fn to_css(&self) -> String {
        format!(
            r#".rating-container .stars {{
  display: flex;
  justify-content: start;
  gap: {gap}px;
  font-size: {star_size}px;
  padding: {padding}px 0;
  cursor: pointer;
  color: {idle};
  transition: color {row_t}s ease;
}}

.rating-container .star {{
  transition: transform {star_t}s, color {star_t}s;
}}

.rating-container .star:hover,
.rating-container .star.hovered {{
  transform: scale({scale});
  color: {active};
}}

.rating-container .star.selected {{
  color: {active};
}}

.rating-container .star-wrapper {{
  display: flex;
  flex-direction: column;
  align-items: center;
}}

.rating-container .star-label {{
  font-size: {label_size}px;
  color: {label_color};
  margin-top: {label_margin}px;
}}
"#,
            gap = self.gap,
            star_size = self.star_size,
            padding = self.padding,
            idle = self.idle_color,
            row_t = self.row_transition,
            star_t = self.star_transition,
            scale = self.hover_scale,
            active = self.active_color,
            label_size = self.label_size,
            label_color = self.label_color,
            label_margin = self.label_margin,
        )
    }

    /// Inline style for the bot bubble wrapping the stars
    pub fn bubble_style(&self) -> String {
        format!("margin-top: {}px;", self.bubble_margin)
    }
}

/// Register the shared star rating stylesheet exactly once.
///
/// Fails only if the configured tokens produce CSS the document rejects,
/// e.g. a colour containing `;` or `}`.
pub fn ensure_star_rating_styles(
    doc: &mut Document,
    style: &StarRatingStyle,
) -> Result<StyleRegistration, DomError> {
    let registration = doc.ensure_style(STAR_RATING_STYLE_ID, style.to_css())?;
    if registration == StyleRegistration::Inserted {
        tracing::debug!(id = STAR_RATING_STYLE_ID, "star rating styles registered");
    }
    Ok(registration)
}
