//! Color modes and persisted preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The active color mode driving visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Returns the opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Maps a "prefers light" signal reading to a mode.
    pub fn from_prefers_light(prefers_light: bool) -> Self {
        if prefers_light {
            ColorMode::Light
        } else {
            ColorMode::Dark
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("light") => Ok(ColorMode::Light),
            v if v.eq_ignore_ascii_case("dark") => Ok(ColorMode::Dark),
            other => Err(ParseModeError::new(other)),
        }
    }
}

/// The durably stored user choice.
///
/// `Unset` means the user never picked a mode explicitly, in which case the
/// controller follows the OS color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    Dark,
    #[default]
    Unset,
}

impl Preference {
    /// Returns the explicitly chosen mode, if any.
    pub fn mode(self) -> Option<ColorMode> {
        match self {
            Preference::Light => Some(ColorMode::Light),
            Preference::Dark => Some(ColorMode::Dark),
            Preference::Unset => None,
        }
    }

    pub fn is_unset(self) -> bool {
        self == Preference::Unset
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::Unset => "unset",
        }
    }
}

impl From<ColorMode> for Preference {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Preference::Light,
            ColorMode::Dark => Preference::Dark,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("unset") {
            return Ok(Preference::Unset);
        }
        s.parse::<ColorMode>().map(Preference::from)
    }
}

/// Error returned when a string names no known mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color mode '{value}'")]
pub struct ParseModeError {
    value: String,
}

impl ParseModeError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}
