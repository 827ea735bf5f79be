use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{ui::app::App, util::colors};

const KEY_HINTS: &str =
    "h/l tabs · + new · j/k move · Enter play · x close · s save · o sort · q quit";

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title("playtabs")
            .title_alignment(Alignment::Center);
        let content_inner = content_block.inner(main_area);
        f.render_widget(content_block, main_area);

        self.app
            .view
            .render(f, content_inner, self.app.store.state());

        let status = match self.app.store.error_message() {
            Some(message) => Line::from(vec![
                Span::styled(
                    message.to_string(),
                    Style::default()
                        .fg(colors::ERROR)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Esc to dismiss)", Style::default().fg(colors::NEUTRAL)),
            ]),
            None => Line::styled(KEY_HINTS, Style::default().fg(colors::NEUTRAL)),
        };
        f.render_widget(Paragraph::new(status), status_area);
    }
}
