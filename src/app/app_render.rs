use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::app_state::App;
use crate::suggest::EngineState;
use crate::surface::{EditableSurface, Fragment, fragments};
use crate::theme;

macro_rules! hints {
    ($($key:literal => $desc:literal),+ $(,)?) => {
        vec![$(($key, $desc)),+]
    };
}

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_editor(frame, layout[0]);
        self.render_status(frame, layout[1]);
        self.render_help(frame, layout[2]);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let focused = self.surface.has_focus();
        let border_color = if focused {
            theme::editor::BORDER_FOCUSED
        } else {
            theme::editor::BORDER_UNFOCUSED
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Span::styled(" ghostwrite ", theme::editor::TITLE))
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::editor::BACKGROUND));
        let inner = block.inner(area);

        let mut ghost_style = theme::editor::GHOST;
        if self.italic_ghost {
            ghost_style = ghost_style.add_modifier(Modifier::ITALIC);
        }
        let lines = editor_lines(&fragments(self.surface.tree()), ghost_style);

        let cursor = self.surface.preceding_text().map(|text| cursor_cell(&text));
        let scroll = match cursor {
            Some((row, _)) if inner.height > 0 && row >= inner.height => {
                row - inner.height + 1
            }
            _ => 0,
        };

        let editor = Paragraph::new(lines).block(block).scroll((scroll, 0));
        frame.render_widget(editor, area);

        if focused && let Some((row, col)) = cursor {
            let x = inner.x.saturating_add(col.min(inner.width.saturating_sub(1)));
            let y = inner.y.saturating_add(row - scroll);
            frame.set_cursor_position((x, y));
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (label, color) = if !self.engine.is_enabled() {
            ("disabled", theme::footer::STATE_DISABLED)
        } else {
            let state = self.engine.state();
            let color = match state {
                EngineState::Idle => theme::footer::STATE_IDLE,
                EngineState::DebouncePending | EngineState::Fetching => theme::footer::STATE_BUSY,
                EngineState::Displayed => theme::footer::STATE_DISPLAYED,
            };
            (state.label(), color)
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                format!("\u{25CF} {}", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(name) = &self.provider_name {
            spans.push(Span::styled(" \u{2022} ", theme::footer::SEPARATOR));
            spans.push(Span::styled(name.clone(), theme::footer::STATS));
        }

        spans.push(Span::styled(" \u{2022} ", theme::footer::SEPARATOR));
        spans.push(Span::styled(self.stats_summary(), theme::footer::STATS));

        if let Some(warning) = &self.warning {
            spans.push(Span::styled(" \u{2022} ", theme::footer::SEPARATOR));
            spans.push(Span::styled(format!("\u{26A0} {}", warning), theme::footer::WARNING));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn stats_summary(&self) -> String {
        let stats = &self.stats;
        let mut summary = format!(
            "shown {} | accepted {} | rejected {} | cached {}",
            stats.shown,
            stats.accepted,
            stats.rejected(),
            stats.cache_served
        );
        if let Some(latency) = stats.mean_latency_ms() {
            summary.push_str(&format!(" | avg {}ms", latency));
        }
        if let Some(rate) = stats.acceptance_rate() {
            summary.push_str(&format!(" | accept {:.0}%", rate * 100.0));
        }
        summary
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.engine.state() == EngineState::Displayed {
            hints!["Tab" => "Accept", "Esc" => "Dismiss", "Ctrl+E" => "Toggle", "Ctrl+Q" => "Quit"]
        } else {
            hints!["Ctrl+E" => "Toggle Suggestions", "Ctrl+Q" => "Quit"]
        };
        frame.render_widget(Paragraph::new(Line::from(build_styled_spans(&hints))), area);
    }
}

fn build_styled_spans(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 4 + 1);
    spans.push(Span::raw(" "));

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" \u{2022} ", theme::footer::SEPARATOR));
        }
        spans.push(Span::styled(*key, theme::footer::KEY));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, theme::footer::DESCRIPTION));
    }

    spans
}

/// Split rendered fragments into display lines, keeping ghost styling per span
fn editor_lines(fragments: &[Fragment], ghost_style: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];

    for fragment in fragments {
        let (text, style) = match fragment {
            Fragment::Text(text) => (text, theme::editor::TEXT),
            Fragment::Ghost(text) => (text, ghost_style),
        };
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !part.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    lines
}

/// Row and column of the caret given the committed text before it
fn cursor_cell(preceding: &str) -> (u16, u16) {
    let row = preceding.matches('\n').count();
    let col = preceding
        .rsplit('\n')
        .next()
        .map_or(0, |line| line.chars().count());
    (
        u16::try_from(row).unwrap_or(u16::MAX),
        u16::try_from(col).unwrap_or(u16::MAX),
    )
}
