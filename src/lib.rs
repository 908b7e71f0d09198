//! # Themekit - Light/dark theme control for UI trees
//!
//! `themekit` keeps track of which color mode a UI should render with. It
//! remembers an explicit user choice across restarts and, until the user
//! makes one, follows the operating system's color-scheme preference.
//!
//! ## Concepts
//!
//! - [`ColorMode`]: the active selection, light or dark
//! - [`Preference`]: the stored choice, light, dark or unset
//! - [`Theme`] / [`ThemePair`]: style collections selected by mode
//! - [`PreferenceStore`]: durable storage ([`MemoryStore`], [`FileStore`])
//! - [`ColorSchemeSignal`]: the OS preference ([`ManualSignal`], [`OsSignal`])
//! - [`ThemeController`] / [`ThemeHandle`]: the state owner and the handle
//!   passed to descendants
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use themekit::{ColorMode, ManualSignal, MemoryStore, ThemeController};
//!
//! let controller = ThemeController::builder()
//!     .inline_style("--initial-theme: light")
//!     .store(MemoryStore::new())
//!     .signal(Rc::new(ManualSignal::new(true)))
//!     .mount();
//!
//! let handle = controller.handle();
//! assert_eq!(handle.theme(), ColorMode::Light);
//! println!("{}", handle.resolved_theme().apply("accent", "Hello"));
//!
//! handle.toggle_theme();
//! assert_eq!(handle.theme(), ColorMode::Dark);
//! assert!(!handle.is_following_system());
//! ```
//!
//! ## Threading
//!
//! Controllers and handles are single-threaded (`!Send`). Drive signals and
//! toggles from the UI event loop.

mod controller;
mod detect;
mod hint;
mod signal;
mod store;
mod theme;

pub use controller::{
    ControllerConfig, ThemeController, ThemeControllerBuilder, ThemeHandle, DEFAULT_STORAGE_KEY,
};
pub use detect::{detect_color_mode, reset_theme_detector, set_theme_detector};
pub use hint::{hint_from_inline_style, parse_hint, INITIAL_THEME_PROPERTY};
pub use signal::{ColorSchemeSignal, ManualSignal, OsSignal, Subscription};
pub use store::{load_or_unset, FileStore, MemoryStore, PreferenceStore, StoreError};
pub use theme::{ColorMode, ParseModeError, Preference, Theme, ThemePair};
