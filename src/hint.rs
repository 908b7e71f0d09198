//! Pre-render theme hint.
//!
//! Hosting pages write the `--initial-theme` custom property on the root
//! element before the UI mounts so the first frame uses the right mode. These
//! helpers read that property back.

use cssparser::{Parser, ParserInput};

use crate::theme::ColorMode;

/// Name of the custom property carrying the hint.
pub const INITIAL_THEME_PROPERTY: &str = "--initial-theme";

/// Parses a `--initial-theme` value such as `dark`, ` light ` or `"dark"`.
///
/// Returns `None` for empty or unrecognized values.
///
/// # Example
///
/// ```rust
/// use themekit::{parse_hint, ColorMode};
///
/// assert_eq!(parse_hint(" light "), Some(ColorMode::Light));
/// assert_eq!(parse_hint("'dark'"), Some(ColorMode::Dark));
/// assert_eq!(parse_hint(""), None);
/// ```
pub fn parse_hint(value: &str) -> Option<ColorMode> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let token = parser.expect_ident_or_string().ok()?.clone();
    parser.expect_exhausted().ok()?;
    token.parse().ok()
}

/// Finds the `--initial-theme` declaration in an inline style attribute.
///
/// The last declaration wins, as it does in CSS.
///
/// # Example
///
/// ```rust
/// use themekit::{hint_from_inline_style, ColorMode};
///
/// let style = "color-scheme: light dark; --initial-theme: dark";
/// assert_eq!(hint_from_inline_style(style), Some(ColorMode::Dark));
/// ```
pub fn hint_from_inline_style(style: &str) -> Option<ColorMode> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .rfind(|(name, _)| name.trim() == INITIAL_THEME_PROPERTY)
        .and_then(|(_, value)| parse_hint(value))
}
