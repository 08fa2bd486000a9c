use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use super::app_state::App;
use crate::surface::{DocumentSurface, EditableSurface};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

impl App {
    pub fn handle_events(&mut self) -> io::Result<()> {
        self.tick();

        if event::poll(EVENT_POLL_TIMEOUT)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key_event(key_event);
                }
                Event::Paste(text) => {
                    self.handle_paste_event(text);
                }
                Event::FocusLost => {
                    self.surface.blur();
                    self.engine.on_blur(&mut self.surface);
                    self.mark_dirty();
                }
                Event::FocusGained => {
                    self.surface.focus();
                    self.engine.on_selection_changed(&mut self.surface);
                    self.mark_dirty();
                }
                Event::Resize(_, _) => self.mark_dirty(),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_paste_event(&mut self, text: String) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if self.surface.insert_plain_text(&text) {
            self.engine.on_content_changed(&mut self.surface, None);
        }
        self.mark_dirty();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        self.warning = None;
        self.mark_dirty();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('e') => {
                    let enabled = !self.engine.is_enabled();
                    self.engine.set_enabled(&mut self.surface, enabled);
                    if enabled {
                        self.engine.on_selection_changed(&mut self.surface);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.engine.accept(&mut self.surface);
            }
            KeyCode::Esc => {
                self.engine.reject(&mut self.surface);
            }
            KeyCode::Enter => self.type_char('\n'),
            KeyCode::Backspace => {
                if self.surface.delete_backward() {
                    self.engine.on_content_changed(&mut self.surface, None);
                }
            }
            KeyCode::Left => self.move_caret(|surface| surface.move_left()),
            KeyCode::Right => self.move_caret(|surface| surface.move_right()),
            KeyCode::Home => self.move_caret(|surface| surface.move_line_start()),
            KeyCode::End => self.move_caret(|surface| surface.move_line_end()),
            KeyCode::Char(c) => self.type_char(c),
            _ => {}
        }
    }

    fn type_char(&mut self, c: char) {
        if self.surface.type_char(c) {
            self.engine.on_content_changed(&mut self.surface, Some(c));
        }
    }

    fn move_caret(&mut self, movement: impl FnOnce(&mut DocumentSurface) -> bool) {
        if movement(&mut self.surface) {
            self.engine.on_selection_changed(&mut self.surface);
        }
    }
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod app_events_tests;
