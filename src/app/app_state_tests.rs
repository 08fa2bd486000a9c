//! Tests for app_state

use super::*;
use crate::suggest::{EngineState, PhrasebookProvider};
use std::thread;
use std::time::{Duration, Instant};

fn test_config() -> Config {
    let mut config = Config::default();
    config.suggest.debounce_ms = 0;
    config
}

/// Tick until `done` holds or a second has passed
fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        app.tick();
        if done(app) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_new_app_is_dirty_and_armed() {
    let app = App::new("hello", &test_config());
    assert!(app.should_render());
    assert!(!app.should_quit());
    assert_eq!(app.content(), "hello");
    assert_eq!(app.engine.state(), EngineState::DebouncePending);
    assert!(app.provider_name.is_none());
}

#[test]
fn test_clear_dirty() {
    let mut app = App::new("", &test_config());
    app.clear_dirty();
    assert!(!app.should_render());
    app.show_warning("offline");
    assert!(app.should_render());
    assert_eq!(app.warning.as_deref(), Some("offline"));
}

#[test]
fn test_disabled_config_stays_idle() {
    let mut config = test_config();
    config.suggest.enabled = false;
    let mut app = App::new("best re", &config);
    app.connect(Arc::new(PhrasebookProvider::default()));
    app.tick();
    assert_eq!(app.engine.state(), EngineState::Idle);
    assert!(!app.engine.is_enabled());
}

#[test]
fn test_connected_provider_shows_suggestion() {
    let mut app = App::new("best re", &test_config());
    app.connect(Arc::new(PhrasebookProvider::default()));
    assert_eq!(app.provider_name.as_deref(), Some("Phrasebook"));

    assert!(tick_until(&mut app, |app| app.engine.state() == EngineState::Displayed));

    assert_eq!(app.engine.active().map(|s| s.text.as_str()), Some("gards"));
    assert_eq!(app.content(), "best re");
    assert_eq!(app.stats.shown, 1);
    assert_eq!(app.stats.fetched, 1);
}

#[test]
fn test_no_provider_means_no_suggestion() {
    let mut app = App::new("best re", &test_config());
    app.tick();
    app.tick();
    assert_eq!(app.engine.state(), EngineState::Idle);
    assert_eq!(app.stats.shown, 0);
}
