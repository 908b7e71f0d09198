//! Light/dark theme pairs and the per-selection memo.

use std::sync::Arc;

use super::mode::ColorMode;
use super::theme::Theme;

/// Separate themes for light and dark modes.
///
/// # Example
///
/// ```rust
/// use themekit::{ColorMode, Theme, ThemePair};
/// use console::Style;
///
/// let light = Theme::new("paper").add("tone", Style::new().green());
/// let dark = Theme::new("ink").add("tone", Style::new().yellow().italic());
/// let pair = ThemePair::new(light, dark);
///
/// assert_eq!(pair.resolve(ColorMode::Dark).name(), "ink");
/// ```
#[derive(Debug, Clone)]
pub struct ThemePair {
    light: Arc<Theme>,
    dark: Arc<Theme>,
}

impl ThemePair {
    pub fn new(light: Theme, dark: Theme) -> Self {
        Self {
            light: Arc::new(light),
            dark: Arc::new(dark),
        }
    }

    /// Returns the theme for `mode`.
    pub fn resolve(&self, mode: ColorMode) -> Arc<Theme> {
        match mode {
            ColorMode::Light => Arc::clone(&self.light),
            ColorMode::Dark => Arc::clone(&self.dark),
        }
    }
}

impl Default for ThemePair {
    /// The built-in light and dark themes.
    fn default() -> Self {
        Self::new(Theme::light().clone(), Theme::dark().clone())
    }
}

/// Cached theme lookup, recomputed only when the selection changes.
#[derive(Debug, Default)]
pub(crate) struct ResolvedTheme {
    cached: Option<(ColorMode, Arc<Theme>)>,
    #[cfg_attr(not(test), allow(dead_code))]
    computations: usize,
}

impl ResolvedTheme {
    pub(crate) fn get(&mut self, mode: ColorMode, pair: &ThemePair) -> Arc<Theme> {
        if let Some((cached_mode, theme)) = &self.cached {
            if *cached_mode == mode {
                return Arc::clone(theme);
            }
        }
        let theme = pair.resolve(mode);
        self.computations += 1;
        self.cached = Some((mode, Arc::clone(&theme)));
        theme
    }

    #[cfg(test)]
    pub(crate) fn computations(&self) -> usize {
        self.computations
    }
}
