use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::util::colors;

/// Blocking message for features that are not available. Swallows input
/// until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    DownloadUnsupported,
    UpdateUnsupported,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::DownloadUnsupported => "Downloading playlists is not implemented yet.",
            Notice::UpdateUnsupported => "Updating an existing playlist is not implemented yet.",
        }
    }
}

impl Widget for Notice {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        Paragraph::new(vec![
            Line::from(self.message()),
            Line::default(),
            Line::styled("Press any key", Style::default().fg(colors::NEUTRAL)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(colors::ACCENT))
                .title(" Not implemented ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .render(area, buf);
    }
}
