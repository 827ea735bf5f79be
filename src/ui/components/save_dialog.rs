use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::{model::Playlist, ui::util::truncate_to_width, util::colors};

pub const MAX_TITLE_CHARS: usize = 100;

/// Local state of the "save as new playlist" dialog. The dialog is only
/// visible while one of these exists, so it always carries its playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDialogState {
    pub playlist: Playlist,
    pub title: String,
    pub is_public: bool,
    pub is_saving: bool,
}

impl SaveDialogState {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            title: playlist.title.clone(),
            is_public: playlist.is_public,
            is_saving: false,
            playlist,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if !self.is_saving && self.title.chars().count() < MAX_TITLE_CHARS {
            self.title.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_saving {
            self.title.pop();
        }
    }

    pub fn toggle_public(&mut self) {
        if !self.is_saving {
            self.is_public = !self.is_public;
        }
    }
}

pub struct SaveDialog<'a> {
    state: &'a SaveDialogState,
}

impl<'a> SaveDialog<'a> {
    pub fn new(state: &'a SaveDialogState) -> Self {
        Self { state }
    }
}

impl Widget for SaveDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(colors::PRIMARY))
            .title(" Save playlist ");
        let inner = block.inner(area);
        block.render(area, buf);

        let field_width = inner.width.saturating_sub(9) as usize;
        let title = truncate_to_width(&self.state.title, field_width);
        let checkbox = if self.state.is_public { "[x]" } else { "[ ]" };

        let footer = if self.state.is_saving {
            Line::from(Span::styled(
                "Saving...",
                Style::default()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(
                "Enter save · Tab public · Esc cancel",
                Style::default().fg(colors::NEUTRAL),
            ))
        };

        Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Title: "),
                Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("▏", Style::default().fg(colors::PRIMARY)),
            ]),
            Line::from(format!("{checkbox} Public")),
            Line::default(),
            footer,
        ])
        .render(inner, buf);
    }
}
