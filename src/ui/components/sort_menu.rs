use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::{model::SortKey, util::colors};

/// Open sort dropdown. Holds the highlighted entry only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortMenuState {
    selected: usize,
}

impl SortMenuState {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % SortKey::ALL.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + SortKey::ALL.len() - 1) % SortKey::ALL.len();
    }

    pub fn key(&self) -> SortKey {
        SortKey::ALL[self.selected]
    }
}

pub struct SortMenu {
    state: SortMenuState,
}

impl SortMenu {
    pub fn new(state: SortMenuState) -> Self {
        Self { state }
    }

    pub const HEIGHT: u16 = SortKey::ALL.len() as u16 + 2;
    pub const WIDTH: u16 = 16;
}

impl Widget for SortMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let items: Vec<ListItem> = SortKey::ALL
            .iter()
            .map(|key| ListItem::new(key.label()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .title(" Sort by "),
            )
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default().with_selected(Some(self.state.selected));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
