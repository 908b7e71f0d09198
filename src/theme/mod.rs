//! Theme system for selecting style collections by color mode.
//!
//! This module provides:
//!
//! - [`ColorMode`]: Light or dark selection
//! - [`Preference`]: Persisted user choice, possibly unset
//! - [`Theme`]: A named collection of styles
//! - [`ThemePair`]: Light/dark theme pairs resolved by mode

mod mode;
mod pair;
#[allow(clippy::module_inception)]
mod theme;

pub use mode::{ColorMode, ParseModeError, Preference};
pub use pair::ThemePair;
pub(crate) use pair::ResolvedTheme;
pub use theme::Theme;
