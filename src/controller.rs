//! The theme controller and the handle it hands to UI code.
//!
//! [`ThemeController`] owns the selection for one UI tree. Descendants get a
//! [`ThemeHandle`] passed down explicitly; the handle reads the current mode,
//! toggles it, and resolves the active [`Theme`].
//!
//! While the persisted preference is [`Preference::Unset`] the controller keeps
//! a subscription on the OS color-scheme signal and follows it. The first
//! toggle makes the preference explicit and releases that subscription.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::hint::hint_from_inline_style;
use crate::signal::{ColorSchemeSignal, Listeners, OsSignal, Subscription};
use crate::store::{load_or_unset, MemoryStore, PreferenceStore};
use crate::theme::{ColorMode, Preference, ResolvedTheme, Theme, ThemePair};

/// Default key the preference is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Controller settings.
///
/// Deserializable so hosts can embed it in their own configuration files;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Key of the persisted preference.
    pub storage_key: String,
    /// Selection used when no pre-render hint is available.
    pub fallback: ColorMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            fallback: ColorMode::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    selection: ColorMode,
    preference: Preference,
}

struct Shared {
    key: String,
    state: RefCell<State>,
    store: RefCell<Box<dyn PreferenceStore>>,
    signal: Rc<dyn ColorSchemeSignal>,
    os_signal: Option<Rc<OsSignal>>,
    system_watch: RefCell<Option<Subscription>>,
    themes: ThemePair,
    resolved: RefCell<ResolvedTheme>,
    observers: Listeners<ColorMode>,
    mounted: Cell<bool>,
}

impl Shared {
    fn selection(&self) -> ColorMode {
        self.state.borrow().selection
    }

    fn preference(&self) -> Preference {
        self.state.borrow().preference
    }

    fn toggle(self: &Rc<Self>) -> ColorMode {
        let next = self.selection().toggled();
        let preference = Preference::from(next);
        *self.state.borrow_mut() = State {
            selection: next,
            preference,
        };
        debug!("Theme toggled to {next}");

        if let Err(e) = self.store.borrow_mut().save(&self.key, preference) {
            error!("Failed to persist theme preference '{}': {e}", self.key);
        }

        self.sync_system_watch();
        self.observers.notify(next);
        next
    }

    fn apply_system(&self, prefers_light: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            // Events still in flight after a toggle.
            if !state.preference.is_unset() {
                return;
            }
            let mode = ColorMode::from_prefers_light(prefers_light);
            let changed = state.selection != mode;
            state.selection = mode;
            changed
        };

        if changed {
            let mode = self.selection();
            debug!("Theme follows OS color scheme: {mode}");
            self.observers.notify(mode);
        }
    }

    fn wants_system_watch(&self) -> bool {
        self.mounted.get() && self.preference().is_unset()
    }

    /// Holds the OS subscription exactly while mounted with an unset preference.
    ///
    /// `system_watch` is never borrowed across a call into the signal: a
    /// signal may run the listener from inside `subscribe` or on release.
    fn sync_system_watch(self: &Rc<Self>) {
        let active = self.system_watch.borrow().is_some();

        if self.wants_system_watch() && !active {
            let weak = Rc::downgrade(self);
            let subscription = self.signal.subscribe(Box::new(move |prefers_light: bool| {
                if let Some(shared) = weak.upgrade() {
                    shared.apply_system(prefers_light);
                }
            }));

            // The listener may have toggled while subscribing.
            if self.wants_system_watch() {
                let previous = self.system_watch.borrow_mut().replace(subscription);
                drop(previous);
                debug!("Subscribed to OS color scheme changes");
            }
        } else if !self.wants_system_watch() && active {
            let released = self.system_watch.borrow_mut().take();
            drop(released);
            debug!("Unsubscribed from OS color scheme changes");
        }
    }

    fn poll_system(&self) -> bool {
        match &self.os_signal {
            Some(signal) => signal.poll(),
            None => false,
        }
    }

    fn unmount(&self) {
        self.mounted.set(false);
        let released = self.system_watch.borrow_mut().take();
        drop(released);
    }
}

/// Read/toggle access to the theme for descendants of the controller.
///
/// Handles are cheap to clone and all clones observe the same state.
#[derive(Clone)]
pub struct ThemeHandle {
    shared: Rc<Shared>,
}

impl ThemeHandle {
    /// The current selection.
    pub fn theme(&self) -> ColorMode {
        self.shared.selection()
    }

    /// Switches to the opposite mode and persists it as the explicit choice.
    ///
    /// Returns the new selection. Never fails: persistence errors are logged
    /// and the in-memory state still changes.
    pub fn toggle_theme(&self) -> ColorMode {
        self.shared.toggle()
    }

    /// The persisted preference as last read or written.
    pub fn preference(&self) -> Preference {
        self.shared.preference()
    }

    /// Whether the selection currently follows the OS color scheme.
    pub fn is_following_system(&self) -> bool {
        self.shared.system_watch.borrow().is_some()
    }

    /// The theme for the current selection.
    ///
    /// The lookup is cached and only redone after the selection changes.
    pub fn resolved_theme(&self) -> Arc<Theme> {
        let mode = self.theme();
        self.shared
            .resolved
            .borrow_mut()
            .get(mode, &self.shared.themes)
    }

    /// Re-reads the OS color scheme when the controller polls it itself.
    ///
    /// Controllers mounted without an explicit signal own an [`OsSignal`];
    /// call this from the UI loop (on a tick, on window focus) to follow OS
    /// changes. Returns `true` if the OS reading changed. Always `false` for
    /// controllers given a signal through [`ThemeControllerBuilder::signal`],
    /// whose owner drives it.
    pub fn poll_system(&self) -> bool {
        self.shared.poll_system()
    }

    /// Registers `callback` to run after every selection change.
    ///
    /// Callbacks may use the handle, including toggling.
    pub fn on_change(&self, callback: impl Fn(ColorMode) + 'static) -> Subscription {
        self.shared.observers.add(callback)
    }
}

impl fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeHandle")
            .field("theme", &self.theme())
            .field("preference", &self.preference())
            .field("following_system", &self.is_following_system())
            .finish()
    }
}

/// Owns theme state for one UI tree.
///
/// Dropping the controller unmounts it: the OS subscription is released.
/// Handles that outlive it keep working but no longer follow the OS.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use themekit::{ColorMode, ManualSignal, MemoryStore, Preference, ThemeController};
///
/// let store = MemoryStore::new();
/// let signal = Rc::new(ManualSignal::new(false));
/// let controller = ThemeController::builder()
///     .store(store.clone())
///     .signal(signal.clone())
///     .mount();
///
/// assert_eq!(controller.theme(), ColorMode::Dark);
///
/// signal.emit(true);
/// assert_eq!(controller.theme(), ColorMode::Light);
///
/// controller.toggle_theme();
/// assert_eq!(controller.theme(), ColorMode::Dark);
/// assert_eq!(store.get("theme"), Some(Preference::Dark));
/// ```
pub struct ThemeController {
    handle: ThemeHandle,
}

impl ThemeController {
    pub fn builder() -> ThemeControllerBuilder {
        ThemeControllerBuilder::new()
    }

    /// A handle to pass down to descendants.
    pub fn handle(&self) -> ThemeHandle {
        self.handle.clone()
    }

    pub fn theme(&self) -> ColorMode {
        self.handle.theme()
    }

    pub fn toggle_theme(&self) -> ColorMode {
        self.handle.toggle_theme()
    }

    pub fn preference(&self) -> Preference {
        self.handle.preference()
    }

    pub fn is_following_system(&self) -> bool {
        self.handle.is_following_system()
    }

    pub fn resolved_theme(&self) -> Arc<Theme> {
        self.handle.resolved_theme()
    }

    pub fn poll_system(&self) -> bool {
        self.handle.poll_system()
    }
}

impl Drop for ThemeController {
    fn drop(&mut self) {
        self.handle.shared.unmount();
        debug!("Theme controller unmounted");
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ThemeController").field(&self.handle).finish()
    }
}

/// Builder for [`ThemeController`].
///
/// Without explicit collaborators the controller uses an in-memory store and
/// an owned [`OsSignal`], driven through [`ThemeHandle::poll_system`].
pub struct ThemeControllerBuilder {
    config: ControllerConfig,
    store: Option<Box<dyn PreferenceStore>>,
    signal: Option<Rc<dyn ColorSchemeSignal>>,
    hint: Option<ColorMode>,
    themes: ThemePair,
}

impl ThemeControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            store: None,
            signal: None,
            hint: None,
            themes: ThemePair::default(),
        }
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    pub fn fallback(mut self, mode: ColorMode) -> Self {
        self.config.fallback = mode;
        self
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn signal<S: ColorSchemeSignal + 'static>(mut self, signal: Rc<S>) -> Self {
        self.signal = Some(signal as Rc<dyn ColorSchemeSignal>);
        self
    }

    /// Sets the pre-render hint. `None` means no document context.
    pub fn hint(mut self, hint: Option<ColorMode>) -> Self {
        self.hint = hint;
        self
    }

    /// Reads the pre-render hint from the root element's inline style.
    pub fn inline_style(mut self, style: &str) -> Self {
        self.hint = hint_from_inline_style(style);
        self
    }

    pub fn themes(mut self, themes: ThemePair) -> Self {
        self.themes = themes;
        self
    }

    /// Mounts the controller.
    ///
    /// The selection comes from the hint (or the fallback), the preference
    /// from the store. The OS subscription starts only if the preference is
    /// unset.
    pub fn mount(self) -> ThemeController {
        let store: Box<dyn PreferenceStore> = match self.store {
            Some(store) => store,
            None => Box::new(MemoryStore::new()),
        };
        let (signal, os_signal): (Rc<dyn ColorSchemeSignal>, _) = match self.signal {
            Some(signal) => (signal, None),
            None => {
                let os_signal = Rc::new(OsSignal::new());
                (Rc::clone(&os_signal) as Rc<dyn ColorSchemeSignal>, Some(os_signal))
            }
        };

        let preference = load_or_unset(store.as_ref(), &self.config.storage_key);
        let selection = self.hint.unwrap_or(self.config.fallback);
        debug!("Mounting theme controller: selection={selection}, preference={preference}");

        let shared = Rc::new(Shared {
            key: self.config.storage_key,
            state: RefCell::new(State {
                selection,
                preference,
            }),
            store: RefCell::new(store),
            signal,
            os_signal,
            system_watch: RefCell::new(None),
            themes: self.themes,
            resolved: RefCell::new(ResolvedTheme::default()),
            observers: Listeners::new(),
            mounted: Cell::new(true),
        });
        shared.sync_system_watch();

        ThemeController {
            handle: ThemeHandle { shared },
        }
    }
}

impl Default for ThemeControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
