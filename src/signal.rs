//! OS color-scheme signals and scoped subscriptions.
//!
//! A [`ColorSchemeSignal`] reports whether the platform currently prefers a
//! light color scheme and notifies listeners when that changes. Listeners stay
//! registered exactly as long as the [`Subscription`] returned for them is
//! alive.
//!
//! Everything here is single-threaded: callbacks are delivered on the thread
//! that drives the signal, in registration order.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::detect::detect_color_mode;
use crate::theme::ColorMode;

/// Source of the OS-level "prefers light" preference.
pub trait ColorSchemeSignal {
    /// Current reading of the signal.
    fn prefers_light(&self) -> bool;

    /// Registers `listener` for change notifications.
    ///
    /// The listener receives the new "prefers light" value and is removed
    /// when the returned subscription is dropped.
    fn subscribe(&self, listener: Box<dyn Fn(bool)>) -> Subscription;
}

/// Guard that keeps a listener registered.
///
/// Dropping the guard (or calling [`Subscription::cancel`]) deregisters the
/// listener.
#[must_use = "dropping a Subscription deregisters its listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Deregisters the listener now.
    pub fn cancel(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

type Callback<T> = Rc<dyn Fn(T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A list of callbacks handing out [`Subscription`] guards.
pub(crate) struct Listeners<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: Copy + 'static> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub(crate) fn add(&self, callback: impl Fn(T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };

        let weak = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Calls every registered callback with `value`.
    ///
    /// The list is snapshotted first so callbacks may subscribe or
    /// unsubscribe while being notified.
    pub(crate) fn notify(&self, value: T) {
        let callbacks: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// A signal driven by the host.
///
/// Use this when the platform pushes color-scheme changes through its own
/// event loop (a `matchMedia` change handler, a desktop settings portal) and
/// in tests.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use themekit::{ColorSchemeSignal, ManualSignal};
///
/// let signal = ManualSignal::new(false);
/// let seen = Rc::new(Cell::new(None));
/// let sink = Rc::clone(&seen);
/// let sub = signal.subscribe(Box::new(move |light: bool| sink.set(Some(light))));
///
/// signal.emit(true);
/// assert_eq!(seen.get(), Some(true));
/// drop(sub);
/// ```
pub struct ManualSignal {
    prefers_light: Cell<bool>,
    listeners: Listeners<bool>,
}

impl ManualSignal {
    pub fn new(prefers_light: bool) -> Self {
        Self {
            prefers_light: Cell::new(prefers_light),
            listeners: Listeners::new(),
        }
    }

    /// Records a change event and notifies every listener.
    pub fn emit(&self, prefers_light: bool) {
        self.prefers_light.set(prefers_light);
        self.listeners.notify(prefers_light);
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for ManualSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ColorSchemeSignal for ManualSignal {
    fn prefers_light(&self) -> bool {
        self.prefers_light.get()
    }

    fn subscribe(&self, listener: Box<dyn Fn(bool)>) -> Subscription {
        self.listeners.add(listener)
    }
}

impl fmt::Debug for ManualSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualSignal")
            .field("prefers_light", &self.prefers_light.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A signal backed by OS detection.
///
/// The OS offers no portable change callback, so the host calls
/// [`OsSignal::poll`] from its event loop (on a tick, on window focus).
/// Listeners are notified only when the detected mode differs from the
/// previous reading.
pub struct OsSignal {
    last: Cell<ColorMode>,
    listeners: Listeners<bool>,
}

impl OsSignal {
    /// Creates a signal seeded with the current OS reading.
    pub fn new() -> Self {
        Self {
            last: Cell::new(detect_color_mode()),
            listeners: Listeners::new(),
        }
    }

    /// Re-reads the OS preference, returning `true` if it changed.
    pub fn poll(&self) -> bool {
        let mode = detect_color_mode();
        if mode == self.last.get() {
            return false;
        }
        debug!("OS color scheme changed to {mode}");
        self.last.set(mode);
        self.listeners.notify(mode == ColorMode::Light);
        true
    }
}

impl Default for OsSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSignal for OsSignal {
    fn prefers_light(&self) -> bool {
        self.last.get() == ColorMode::Light
    }

    fn subscribe(&self, listener: Box<dyn Fn(bool)>) -> Subscription {
        self.listeners.add(listener)
    }
}
