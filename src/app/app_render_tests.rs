//! Rendering tests against ratatui's TestBackend

use crate::app::app_state::App;
use crate::config::Config;
use crate::suggest::PhrasebookProvider;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const TEST_WIDTH: u16 = 120;
const TEST_HEIGHT: u16 = 10;

fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = create_test_terminal(width, height);
    terminal.draw(|f| app.render(f)).unwrap();
    terminal.backend().to_string()
}

fn test_app(text: &str) -> App {
    let mut config = Config::default();
    config.suggest.debounce_ms = 0;
    App::new(text, &config)
}

fn app_with_suggestion(text: &str) -> App {
    let mut app = test_app(text);
    app.connect(Arc::new(PhrasebookProvider::default()));
    let deadline = Instant::now() + Duration::from_secs(1);
    while app.engine.active().is_none() && Instant::now() < deadline {
        app.tick();
        thread::sleep(Duration::from_millis(5));
    }
    assert!(app.engine.active().is_some(), "suggestion should be displayed");
    app
}

#[test]
fn test_renders_document_text() {
    let mut app = test_app("first line\nsecond line");
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("first line"));
    assert!(output.contains("second line"));
    assert!(output.contains("ghostwrite"));
}

#[test]
fn test_renders_ghost_text_after_caret() {
    let mut app = app_with_suggestion("best re");
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("best regards"));
    assert!(output.contains("suggesting"));
    assert!(output.contains("Phrasebook"));
    assert!(output.contains("Tab Accept"));
}

#[test]
fn test_ghost_text_is_styled_differently() {
    let mut app = app_with_suggestion("best re");
    let mut terminal = create_test_terminal(TEST_WIDTH, TEST_HEIGHT);
    terminal.draw(|f| app.render(f)).unwrap();

    let buffer = terminal.backend().buffer();
    // Border occupies column 0 and row 0; "best re" is 7 cells wide
    let committed = &buffer[(1, 1)];
    let ghost = &buffer[(8, 1)];
    assert_eq!(committed.symbol(), "b");
    assert_eq!(ghost.symbol(), "g");
    assert_ne!(committed.fg, ghost.fg);
    assert!(ghost.modifier.contains(ratatui::style::Modifier::ITALIC));
}

#[test]
fn test_footer_shows_disabled_state() {
    let mut app = test_app("text");
    app.handle_key_event(ratatui::crossterm::event::KeyEvent::new(
        ratatui::crossterm::event::KeyCode::Char('e'),
        ratatui::crossterm::event::KeyModifiers::CONTROL,
    ));
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("disabled"));
}

#[test]
fn test_footer_shows_warning() {
    let mut app = test_app("text");
    app.show_warning("using offline phrasebook");
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("using offline phrasebook"));
}

#[test]
fn test_footer_shows_stats_after_accept() {
    let mut app = app_with_suggestion("best re");
    app.handle_key_event(ratatui::crossterm::event::KeyEvent::new(
        ratatui::crossterm::event::KeyCode::Tab,
        ratatui::crossterm::event::KeyModifiers::NONE,
    ));
    app.tick();
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("best regards"));
    assert!(output.contains("accepted 1"));
    assert!(output.contains("accept 100%"));
}

#[test]
fn test_long_document_scrolls_to_caret() {
    let text: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
    let mut app = test_app(&text.join("\n"));
    let output = render_to_string(&mut app, TEST_WIDTH, TEST_HEIGHT);
    assert!(output.contains("line 19"));
    assert!(!output.contains("line 0 "));
}
