//! CSS fragment parser
//!
//! Parses the rule-list subset that widget stylesheets use: selectors,
//! `property: value` declarations and `/* comments */`. Selectors and values
//! are kept as text; nothing is resolved against the element tree. The parsed
//! rules let hosts and tests inspect a fragment's visual contract.
//!
//! # Example
//!
//! ```rust
//! use twinkle_dom::css::parse_rules;
//!
//! let rules = parse_rules(".star:hover { color: gold; transform: scale(1.2) }").unwrap();
//! assert_eq!(rules[0].selector, ".star:hover");
//! assert_eq!(rules[0].get("transform"), Some("scale(1.2)"));
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace1},
    combinator::{all_consuming, cut, opt, value},
    error::{context, VerboseError, VerboseErrorKind},
    multi::{many0, many0_count},
    sequence::{preceded, terminated, tuple},
    Finish, IResult, Offset,
};
use thiserror::Error;

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// A CSS parse failure with its position in the source (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct CssError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl CssError {
    fn from_verbose(source: &str, err: VerboseError<&str>) -> Self {
        let offset = err
            .errors
            .first()
            .map_or(source.len(), |(input, _)| source.offset(input))
            .min(source.len());
        let consumed = &source[..offset];
        let remaining = &source[offset..];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;

        let expected = err
            .errors
            .iter()
            .find_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(ctx) => Some(*ctx),
                _ => None,
            })
            .unwrap_or("rule");
        let found: String = remaining.chars().take(12).collect();
        let message = if found.is_empty() {
            format!("expected {expected}, found end of input")
        } else {
            format!("expected {expected}, found `{found}`")
        };

        Self {
            message,
            line,
            column,
        }
    }
}

/// A single `property: value` pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A selector with its declarations, in source order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl CssRule {
    /// Value of a property; later declarations win
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// A keyed stylesheet entry living in the document head
#[derive(Clone, Debug)]
pub struct StyleFragment {
    id: String,
    source: String,
    rules: Vec<CssRule>,
}

impl StyleFragment {
    /// Parse `source` into a fragment registered under `id`
    pub fn parse(id: impl Into<String>, source: impl Into<String>) -> Result<Self, CssError> {
        let source = source.into();
        let rules = parse_rules(&source)?;
        Ok(Self {
            id: id.into(),
            source,
            rules,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Find the last rule whose selector matches `selector` modulo whitespace
    pub fn rule(&self, selector: &str) -> Option<&CssRule> {
        let wanted = normalize_selector(selector);
        self.rules.iter().rev().find(|r| r.selector == wanted)
    }

    /// Shorthand for `rule(selector)?.get(property)`
    pub fn declaration(&self, selector: &str, property: &str) -> Option<&str> {
        self.rule(selector)?.get(property)
    }
}

/// Parse a CSS rule list
pub fn parse_rules(css: &str) -> Result<Vec<CssRule>, CssError> {
    let mut parser = all_consuming(terminated(many0(preceded(trivia, rule)), trivia));
    match parser(css).finish() {
        Ok((_, rules)) => Ok(rules),
        Err(err) => {
            let err = CssError::from_verbose(css, err);
            tracing::debug!(error = %err, "css fragment rejected");
            Err(err)
        }
    }
}

fn normalize_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn comment(input: &str) -> ParseResult<'_, ()> {
    value((), tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// Whitespace and comments
fn trivia(input: &str) -> ParseResult<'_, ()> {
    value((), many0_count(alt((value((), multispace1), comment))))(input)
}

fn property_name(input: &str) -> ParseResult<'_, &str> {
    context(
        "property name",
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    )(input)
}

fn declaration(input: &str) -> ParseResult<'_, Declaration> {
    let (input, property) = preceded(trivia, property_name)(input)?;
    let (input, _) = trivia(input)?;
    let (input, _) = context("`:`", cut(char(':')))(input)?;
    let (input, raw) = context("value", cut(take_while1(|c: char| c != ';' && c != '}')))(input)?;
    let (input, _) = opt(char(';'))(input)?;

    let value = raw.trim();
    if value.is_empty() {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(raw, VerboseErrorKind::Context("value"))],
        }));
    }

    Ok((
        input,
        Declaration {
            property: property.to_ascii_lowercase(),
            value: value.to_string(),
        },
    ))
}

fn rule(input: &str) -> ParseResult<'_, CssRule> {
    let (input, raw_selector) =
        context("selector", take_while1(|c: char| c != '{' && c != '}'))(input)?;
    let (input, _) = context("`{`", cut(char('{')))(input)?;
    let (input, declarations) = many0(declaration)(input)?;
    let (input, _) = trivia(input)?;
    let (input, _) = context("`}`", cut(char('}')))(input)?;

    let selector = normalize_selector(raw_selector);
    if selector.is_empty() {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(raw_selector, VerboseErrorKind::Context("selector"))],
        }));
    }

    Ok((
        input,
        CssRule {
            selector,
            declarations,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_rules() {
        let css = r#"
            .rating-container .stars {
                display: flex;
                gap: 8px;
            }

            .rating-container .star.selected { color: gold; }
        "#;

        let rules = parse_rules(css).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, ".rating-container .stars");
        assert_eq!(rules[0].get("display"), Some("flex"));
        assert_eq!(rules[0].get("gap"), Some("8px"));
        assert_eq!(rules[1].selector, ".rating-container .star.selected");
        assert_eq!(rules[1].get("color"), Some("gold"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let rules = parse_rules(".a { color: red; color: blue }").unwrap();
        assert_eq!(rules[0].get("color"), Some("blue"));
        assert_eq!(rules[0].declarations.len(), 2);
    }

    #[test]
    fn test_comments_and_multi_word_values() {
        let css = "/* stars */ .s { transition: transform 0.2s, color 0.2s; /* tail */ }";
        let rules = parse_rules(css).unwrap();
        assert_eq!(rules[0].get("transition"), Some("transform 0.2s, color 0.2s"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("  /* nothing */  ").unwrap().is_empty());
    }

    #[test]
    fn test_property_names_are_lowercased() {
        let rules = parse_rules(".a { Font-Size: 14px }").unwrap();
        assert_eq!(rules[0].get("font-size"), Some("14px"));
    }

    #[test]
    fn test_missing_closing_brace_reports_position() {
        let err = parse_rules(".a {\n  color: red;\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("`}`"), "{}", err.message);
    }

    #[test]
    fn test_missing_colon_is_an_error() {
        let err = parse_rules(".a { color red }").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("`:`"), "{}", err.message);
    }

    #[test]
    fn test_empty_value_is_an_error() {
        assert!(parse_rules(".a { color: ; }").is_err());
    }

    #[test]
    fn test_stray_brace_is_an_error() {
        assert!(parse_rules("}").is_err());
    }

    #[test]
    fn test_fragment_lookup_normalizes_selector() {
        let fragment =
            StyleFragment::parse("demo", ".rating-container   .star:hover { color: gold }").unwrap();
        assert_eq!(fragment.id(), "demo");
        assert_eq!(
            fragment.declaration(".rating-container .star:hover", "color"),
            Some("gold")
        );
        assert!(fragment.rule(".star").is_none());
    }
}
