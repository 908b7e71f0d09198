use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use serial_test::serial;
use tempfile::TempDir;
use themekit::{
    reset_theme_detector, set_theme_detector, ColorMode, FileStore, ManualSignal, MemoryStore,
    Preference, PreferenceStore, Theme, ThemeController,
};

fn mount(store: &MemoryStore, signal: &Rc<ManualSignal>, hint: Option<ColorMode>) -> ThemeController {
    ThemeController::builder()
        .store(store.clone())
        .signal(Rc::clone(signal))
        .hint(hint)
        .mount()
}

#[test]
fn no_document_and_no_stored_value_starts_dark_then_toggles_light() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, None);

    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(controller.preference(), Preference::Unset);

    assert_eq!(controller.toggle_theme(), ColorMode::Light);
    assert_eq!(controller.theme(), ColorMode::Light);
    assert_eq!(store.get("theme"), Some(Preference::Light));
}

#[test]
fn hint_wins_at_mount_and_stored_choice_skips_os_subscription() {
    let store = MemoryStore::with("theme", Preference::Light);
    let signal = Rc::new(ManualSignal::default());
    let controller = ThemeController::builder()
        .store(store.clone())
        .signal(Rc::clone(&signal))
        .inline_style("--initial-theme: dark")
        .mount();

    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(controller.preference(), Preference::Light);
    assert!(!controller.is_following_system());
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn unparsable_hint_falls_back() {
    let signal = Rc::new(ManualSignal::default());
    let controller = ThemeController::builder()
        .store(MemoryStore::new())
        .signal(signal)
        .fallback(ColorMode::Light)
        .inline_style("--initial-theme: sepia")
        .mount();

    assert_eq!(controller.theme(), ColorMode::Light);
}

#[test]
fn os_changes_are_followed_while_unset() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, Some(ColorMode::Dark));
    assert!(controller.is_following_system());

    signal.emit(true);
    assert_eq!(controller.theme(), ColorMode::Light);
    signal.emit(false);
    assert_eq!(controller.theme(), ColorMode::Dark);
    signal.emit(false);
    assert_eq!(controller.theme(), ColorMode::Dark);

    assert_eq!(store.get("theme"), None);
}

#[test]
fn os_changes_are_ignored_once_explicit() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, None);

    controller.toggle_theme();
    assert!(!controller.is_following_system());
    assert_eq!(signal.listener_count(), 0);

    signal.emit(false);
    assert_eq!(controller.theme(), ColorMode::Light);
    signal.emit(true);
    signal.emit(false);
    assert_eq!(controller.theme(), ColorMode::Light);
}

#[test]
fn toggling_back_to_os_mode_stays_explicit() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::new(false));
    let controller = mount(&store, &signal, None);

    controller.toggle_theme();
    controller.toggle_theme();

    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(controller.preference(), Preference::Dark);
    assert!(!controller.is_following_system());
}

#[test]
fn resolved_theme_matches_selection() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, None);

    assert_eq!(&*controller.resolved_theme(), Theme::dark());
    signal.emit(true);
    assert_eq!(&*controller.resolved_theme(), Theme::light());
    controller.toggle_theme();
    assert_eq!(&*controller.resolved_theme(), Theme::dark());
}

#[test]
fn handles_share_state_and_notify_observers() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, None);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = controller
        .handle()
        .on_change(move |mode| sink.borrow_mut().push(mode));

    let child = controller.handle();
    signal.emit(true);
    child.toggle_theme();

    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(*seen.borrow(), vec![ColorMode::Light, ColorMode::Dark]);
}

#[test]
fn observer_may_toggle_from_os_event() {
    let store = MemoryStore::new();
    let signal = Rc::new(ManualSignal::default());
    let controller = mount(&store, &signal, None);

    let handle = controller.handle();
    let _sub = controller.handle().on_change(move |mode| {
        if mode == ColorMode::Light && handle.preference().is_unset() {
            handle.toggle_theme();
        }
    });

    signal.emit(true);
    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(controller.preference(), Preference::Dark);
    assert_eq!(signal.listener_count(), 0);
}

#[test]
#[serial]
fn default_signal_follows_os_through_poll() {
    set_theme_detector(|| ColorMode::Dark);
    let controller = ThemeController::builder()
        .store(MemoryStore::new())
        .hint(Some(ColorMode::Dark))
        .mount();
    assert!(controller.is_following_system());
    assert!(!controller.poll_system());

    set_theme_detector(|| ColorMode::Light);
    let handle = controller.handle();
    assert!(handle.poll_system());
    assert_eq!(controller.theme(), ColorMode::Light);

    assert_eq!(controller.toggle_theme(), ColorMode::Dark);
    assert!(!controller.is_following_system());

    set_theme_detector(|| ColorMode::Dark);
    assert!(handle.poll_system());
    set_theme_detector(|| ColorMode::Light);
    assert!(handle.poll_system());
    assert_eq!(controller.theme(), ColorMode::Dark);
    assert_eq!(controller.preference(), Preference::Dark);

    reset_theme_detector();
}

#[test]
fn file_store_choice_survives_remount() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");
    let signal = Rc::new(ManualSignal::default());

    {
        let controller = ThemeController::builder()
            .store(FileStore::new(&path))
            .signal(Rc::clone(&signal))
            .mount();
        controller.toggle_theme();
    }
    assert_eq!(signal.listener_count(), 0);

    let controller = ThemeController::builder()
        .store(FileStore::new(&path))
        .signal(Rc::clone(&signal))
        .mount();
    assert_eq!(controller.preference(), Preference::Light);
    assert!(!controller.is_following_system());
    assert_eq!(
        FileStore::new(&path).load("theme").unwrap(),
        Some(Preference::Light)
    );
}

proptest! {
    #[test]
    fn toggle_parity(initial_light in any::<bool>(), toggles in 0usize..40) {
        let store = MemoryStore::new();
        let signal = Rc::new(ManualSignal::default());
        let initial = ColorMode::from_prefers_light(initial_light);
        let controller = mount(&store, &signal, Some(initial));

        for _ in 0..toggles {
            let mode = controller.toggle_theme();
            prop_assert_eq!(store.get("theme"), Some(Preference::from(mode)));
        }

        let expected = if toggles % 2 == 0 { initial } else { initial.toggled() };
        prop_assert_eq!(controller.theme(), expected);
        if toggles > 0 {
            prop_assert_eq!(controller.preference(), Preference::from(expected));
        }
    }

    #[test]
    fn os_events_track_only_while_unset(events in prop::collection::vec(any::<bool>(), 1..20)) {
        let store = MemoryStore::new();
        let signal = Rc::new(ManualSignal::default());
        let controller = mount(&store, &signal, None);

        for &prefers_light in &events {
            signal.emit(prefers_light);
            prop_assert_eq!(controller.theme(), ColorMode::from_prefers_light(prefers_light));
        }

        let pinned = controller.toggle_theme();
        for &prefers_light in &events {
            signal.emit(prefers_light);
            prop_assert_eq!(controller.theme(), pinned);
        }
    }
}
