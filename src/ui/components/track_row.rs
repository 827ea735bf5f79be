use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

use crate::{
    model::{Track, TrackId},
    ui::util::get_active_track_icon,
    util::colors,
};

pub fn track_row(
    idx: usize,
    track_id: TrackId,
    track: Option<&Track>,
    is_playing: bool,
) -> ListItem<'static> {
    let prefix = if is_playing {
        format!("{} ", get_active_track_icon(true))
    } else {
        "  ".to_string()
    };

    let mut spans = vec![
        Span::raw(prefix),
        Span::styled(format!("{:>3}. ", idx + 1), Style::default().fg(colors::NEUTRAL)),
    ];
    match track {
        Some(track) => {
            spans.push(Span::raw(track.title.clone()));
            spans.push(Span::raw(" - "));
            spans.push(Span::raw(track.artist_or_unknown().to_string()));
            spans.push(Span::styled(
                format!("  {}", track.duration_label()),
                Style::default().fg(colors::NEUTRAL),
            ));
        }
        None => spans.push(Span::styled(
            format!("Unknown track #{track_id}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    }

    let item = ListItem::new(Line::from(spans));
    if is_playing {
        item.style(
            Style::default()
                .fg(colors::SECONDARY)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        item
    }
}
