//! Theme struct for building style collections.

use std::collections::BTreeMap;

use console::{Color, Style};
use once_cell::sync::Lazy;

/// A named collection of styles handed to the styling layer.
///
/// The controller never interprets the styles itself; it only selects which
/// theme is active. Hosts look styles up by role name.
///
/// # Example
///
/// ```rust
/// use themekit::Theme;
/// use console::Style;
///
/// let theme = Theme::new("solarized")
///     .add("text", Style::new().color256(240))
///     .add("accent", Style::new().yellow().bold());
///
/// assert!(theme.has("accent"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    styles: BTreeMap<String, Style>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: BTreeMap::new(),
        }
    }

    /// The built-in light theme.
    pub fn light() -> &'static Theme {
        &LIGHT_THEME
    }

    /// The built-in dark theme.
    pub fn dark() -> &'static Theme {
        &DARK_THEME
    }

    /// Adds a named style, returning an updated theme for chaining.
    pub fn add(mut self, role: &str, style: Style) -> Self {
        self.styles.insert(role.to_string(), style);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, role: &str) -> Option<&Style> {
        self.styles.get(role)
    }

    pub fn has(&self, role: &str) -> bool {
        self.styles.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Styles `text` with the style registered for `role`.
    ///
    /// Unknown roles leave the text untouched.
    pub fn apply(&self, role: &str, text: &str) -> String {
        match self.styles.get(role) {
            Some(style) => style.apply_to(text).to_string(),
            None => text.to_string(),
        }
    }
}

static LIGHT_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new("light")
        .add("background", Style::new().on_white())
        .add("text", Style::new().black())
        .add("muted", Style::new().color256(244))
        .add("accent", Style::new().blue().bold())
        .add("link", Style::new().blue().underlined())
        .add("success", Style::new().green())
        .add("warning", Style::new().fg(Color::Color256(130)))
        .add("error", Style::new().red().bold())
});

static DARK_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new("dark")
        .add("background", Style::new().on_black())
        .add("text", Style::new().white())
        .add("muted", Style::new().color256(245).dim())
        .add("accent", Style::new().cyan().bold())
        .add("link", Style::new().cyan().underlined())
        .add("success", Style::new().green().bright())
        .add("warning", Style::new().yellow())
        .add("error", Style::new().red().bright().bold())
});
