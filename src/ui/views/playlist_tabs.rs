use std::sync::Arc;

use flume::Sender;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    event::events::Event,
    http::PlaylistApi,
    model::{Playlist, PlaylistId, PlaylistState, SortKey, TabKey, Track, TrackId},
    store::{Dispatch, StateSnapshot, StoreAction},
    ui::{
        components::{
            notice::Notice,
            save_dialog::{SaveDialog, SaveDialogState},
            sort_menu::{SortMenu, SortMenuState},
            spinner::Spinner,
            track_row::track_row,
        },
        util::{centered_rect, truncate_to_width},
    },
    util::colors,
};

pub const SAVE_FAILED_MESSAGE: &str =
    "Could not save playlist. The name may already be taken or the server is unavailable.";

const TAB_TITLE_WIDTH: usize = 20;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveError {
    #[error("No playlist is active")]
    NoActivePlaylist,

    #[error("Playlist has no tracks to save")]
    EmptyPlaylist,

    #[error("Save dialog is not open")]
    DialogClosed,

    #[error("A save is already in progress")]
    AlreadySaving,

    #[error("Updating an existing playlist is not implemented")]
    UpdateNotImplemented,
}

pub struct TrackRow<'a> {
    pub idx: usize,
    pub track_id: TrackId,
    pub track: Option<&'a Track>,
    pub is_playing: bool,
}

/// What the body of a tab shows.
pub enum TabBody<'a> {
    Missing,
    Loading,
    Ready {
        playlist: &'a Playlist,
        can_save: bool,
        rows: Vec<TrackRow<'a>>,
    },
}

/// A row is highlighted when it sits in the active playlist at the playing index.
pub fn is_playing_row(state: &dyn StateSnapshot, plid: PlaylistId, idx: usize) -> bool {
    state.active_playlist_id() == Some(plid) && state.playing_track_idx() == Some(idx)
}

pub fn tab_keys(state: &dyn StateSnapshot) -> Vec<TabKey> {
    state
        .open_playlist_ids()
        .iter()
        .map(|&plid| TabKey::Playlist(plid))
        .chain(std::iter::once(TabKey::NewPlaylist))
        .collect()
}

pub fn tab_body(state: &dyn StateSnapshot, plid: PlaylistId) -> TabBody<'_> {
    let Some(playlist) = state.playlist(plid) else {
        return TabBody::Missing;
    };
    let Some(track_ids) = playlist.track_ids.as_ref() else {
        return TabBody::Loading;
    };

    let rows = track_ids
        .iter()
        .enumerate()
        .map(|(idx, &track_id)| TrackRow {
            idx,
            track_id,
            track: state.track(track_id),
            is_playing: is_playing_row(state, plid, idx),
        })
        .collect();

    TabBody::Ready {
        playlist,
        can_save: !track_ids.is_empty(),
        rows,
    }
}

/// Tabbed view over the open playlists.
///
/// Reads state through [`StateSnapshot`] and writes only by dispatching
/// [`StoreAction`]s. The save dialog, sort dropdown and notices are local
/// state and die with the view, as does an in-flight save request.
pub struct PlaylistTabs {
    dispatch: Arc<dyn Dispatch>,
    api: Arc<dyn PlaylistApi>,
    event_tx: Sender<Event>,
    save_dialog: Option<SaveDialogState>,
    save_handle: Option<JoinHandle<()>>,
    sort_menu: Option<SortMenuState>,
    notice: Option<Notice>,
    list_state: ListState,
    cursor_plid: Option<PlaylistId>,
}

impl Drop for PlaylistTabs {
    fn drop(&mut self) {
        if let Some(handle) = self.save_handle.take() {
            handle.abort();
        }
    }
}

impl PlaylistTabs {
    pub fn new(
        dispatch: Arc<dyn Dispatch>,
        api: Arc<dyn PlaylistApi>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            dispatch,
            api,
            event_tx,
            save_dialog: None,
            save_handle: None,
            sort_menu: None,
            notice: None,
            list_state: ListState::default(),
            cursor_plid: None,
        }
    }

    pub fn save_dialog(&self) -> Option<&SaveDialogState> {
        self.save_dialog.as_ref()
    }

    pub fn is_save_dialog_visible(&self) -> bool {
        self.save_dialog.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.save_dialog.as_ref().is_some_and(|d| d.is_saving)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn on_tab_select(&self, key: TabKey) {
        match key {
            TabKey::NewPlaylist => self.dispatch.dispatch(StoreAction::CreatePlaylist),
            TabKey::Playlist(plid) => self.dispatch.dispatch(StoreAction::ActivatePlaylist(plid)),
        }
    }

    /// Index bounds are the store's concern.
    pub fn on_track_select(&self, plid: PlaylistId, idx: usize) {
        self.dispatch.dispatch(StoreAction::SetPlayingPlaylist(plid));
        self.dispatch
            .dispatch(StoreAction::PlayTrackInPlaylist { plid, idx });
    }

    pub fn sort_handler(&self, plid: PlaylistId) -> impl Fn(SortKey) + Send + Sync + 'static {
        let dispatch = Arc::clone(&self.dispatch);
        move |key| dispatch.dispatch(StoreAction::SortPlaylistTracks { plid, key })
    }

    pub fn on_tab_close(&self, plid: PlaylistId) {
        self.dispatch.dispatch(StoreAction::ClosePlaylistTab(plid));
    }

    pub fn on_download(&mut self) {
        self.notice = Some(Notice::DownloadUnsupported);
    }

    /// Snapshots the active playlist into the save dialog.
    pub fn open_save_dialog(&mut self, state: &dyn StateSnapshot) -> Result<(), SaveError> {
        let plid = state
            .active_playlist_id()
            .ok_or(SaveError::NoActivePlaylist)?;
        let playlist = state.playlist(plid).ok_or(SaveError::NoActivePlaylist)?;
        if playlist.track_count() == 0 {
            return Err(SaveError::EmptyPlaylist);
        }

        self.save_dialog = Some(SaveDialogState::new(playlist.clone()));
        Ok(())
    }

    pub fn cancel_save(&mut self) {
        self.save_dialog = None;
    }

    /// Submits the dialog. Local playlists are sent to the server; the result
    /// arrives later as [`Event::PlaylistSaved`] or [`Event::PlaylistSaveFailed`].
    /// A second submission while one is pending is rejected.
    pub fn confirm_save(&mut self, title: String, is_public: bool) -> Result<(), SaveError> {
        let in_flight = self.save_handle.as_ref().is_some_and(|h| !h.is_finished());
        let dialog = self.save_dialog.as_mut().ok_or(SaveError::DialogClosed)?;
        if dialog.is_saving || in_flight {
            warn!(plid = %dialog.playlist.plid, "save already in progress");
            return Err(SaveError::AlreadySaving);
        }

        dialog.title = title.clone();
        dialog.is_public = is_public;

        let local_id = dialog.playlist.plid;
        if !local_id.is_local() {
            self.notice = Some(Notice::UpdateUnsupported);
            return Err(SaveError::UpdateNotImplemented);
        }

        dialog.is_saving = true;
        let track_ids = dialog.playlist.track_ids.clone().unwrap_or_default();
        info!(%local_id, title = %title, is_public, tracks = track_ids.len(), "saving new playlist");

        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();
        self.save_handle = Some(tokio::spawn(async move {
            let saved = api
                .save_new_playlist(local_id, &title, is_public, &track_ids)
                .await;
            let event = match saved {
                Ok(playlist) => Event::PlaylistSaved { local_id, playlist },
                Err(e) => {
                    warn!(%local_id, "failed to save playlist: {e}");
                    Event::PlaylistSaveFailed {
                        local_id,
                        reason: e.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        }));

        Ok(())
    }

    fn confirm_from_dialog(&mut self) {
        let Some(dialog) = &self.save_dialog else {
            return;
        };
        let (title, is_public) = (dialog.title.clone(), dialog.is_public);
        if let Err(e) = self.confirm_save(title, is_public) {
            debug!("save not submitted: {e}");
        }
    }

    pub fn on_event(&mut self, event: &Event) {
        match event {
            Event::PlaylistSaved { local_id, playlist } => {
                self.save_handle = None;
                if self.is_dialog_for(*local_id) {
                    self.save_dialog = None;
                }
                self.dispatch.dispatch(StoreAction::ReplacePlaylist {
                    old: *local_id,
                    new: playlist.clone(),
                });
            }
            Event::PlaylistSaveFailed { local_id, .. } => {
                self.save_handle = None;
                if self.is_dialog_for(*local_id) {
                    if let Some(dialog) = self.save_dialog.as_mut() {
                        dialog.is_saving = false;
                    }
                }
                self.dispatch
                    .dispatch(StoreAction::ShowError(SAVE_FAILED_MESSAGE.to_string()));
            }
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some(dialog) = self.save_dialog.as_mut() {
            text.chars()
                .filter(|c| !c.is_control())
                .for_each(|c| dialog.push_char(c));
        }
    }

    fn is_dialog_for(&self, plid: PlaylistId) -> bool {
        self.save_dialog
            .as_ref()
            .is_some_and(|d| d.playlist.plid == plid)
    }

    fn select_adjacent_tab(&self, state: &dyn StateSnapshot, forward: bool) {
        let keys = tab_keys(state);
        let current = state
            .active_playlist_id()
            .and_then(|active| keys.iter().position(|k| *k == TabKey::Playlist(active)));

        let next = match (current, forward) {
            (None, _) => Some(0),
            (Some(i), true) if i + 1 < keys.len() => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };

        if let Some(key) = next.and_then(|i| keys.get(i)) {
            self.on_tab_select(*key);
        }
    }

    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent, state: &dyn StateSnapshot) -> bool {
        if self.notice.take().is_some() {
            return true;
        }

        if self.save_dialog.is_some() {
            match key.code {
                KeyCode::Esc => self.cancel_save(),
                KeyCode::Enter => self.confirm_from_dialog(),
                code => {
                    if let Some(dialog) = self.save_dialog.as_mut() {
                        match code {
                            KeyCode::Tab => dialog.toggle_public(),
                            KeyCode::Backspace => dialog.pop_char(),
                            KeyCode::Char(c) => dialog.push_char(c),
                            _ => {}
                        }
                    }
                }
            }
            return true;
        }

        let active = state.active_playlist_id();

        if let Some(mut menu) = self.sort_menu {
            self.sort_menu = match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    menu.next();
                    Some(menu)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    menu.previous();
                    Some(menu)
                }
                KeyCode::Enter => {
                    if let Some(plid) = active {
                        self.sort_handler(plid)(menu.key());
                    }
                    None
                }
                KeyCode::Esc | KeyCode::Char('o') => None,
                _ => Some(menu),
            };
            return true;
        }

        let (is_ready, len) = match active.map(|plid| tab_body(state, plid)) {
            Some(TabBody::Ready { rows, .. }) => (true, rows.len()),
            _ => (false, 0),
        };

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.select_adjacent_tab(state, false),
            KeyCode::Right | KeyCode::Char('l') => self.select_adjacent_tab(state, true),
            KeyCode::Char('+') => self.on_tab_select(TabKey::NewPlaylist),
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let i = self
                    .list_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(len - 1));
                self.list_state.select(Some(i));
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.list_state.select(Some(i));
            }
            KeyCode::Char('g') if len > 0 => self.list_state.select(Some(0)),
            KeyCode::Char('G') if len > 0 => self.list_state.select(Some(len - 1)),
            KeyCode::Enter => {
                if let (Some(plid), Some(i)) = (active, self.list_state.selected()) {
                    self.on_track_select(plid, i);
                }
            }
            KeyCode::Char('x') => {
                if let Some(plid) = active {
                    self.on_tab_close(plid);
                }
            }
            KeyCode::Char('s') => {
                if let Err(e) = self.open_save_dialog(state) {
                    debug!("save dialog not opened: {e}");
                }
            }
            KeyCode::Char('o') if is_ready => self.sort_menu = Some(SortMenuState::default()),
            KeyCode::Char('d') if is_ready => self.on_download(),
            _ => return false,
        }
        true
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &dyn StateSnapshot) {
        let [tabs_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

        self.render_tabs(f, tabs_area, state);

        match state.active_playlist_id() {
            Some(plid) => self.render_body(f, body_area, state, plid),
            None => f.render_widget(
                Paragraph::new("No open playlists. Press + to create one.")
                    .style(Style::default().fg(colors::NEUTRAL)),
                body_area,
            ),
        }

        if let Some(menu) = self.sort_menu {
            let popup = centered_rect(SortMenu::WIDTH, SortMenu::HEIGHT, body_area);
            f.render_widget(SortMenu::new(menu), popup);
        }
        if let Some(dialog) = &self.save_dialog {
            f.render_widget(SaveDialog::new(dialog), centered_rect(50, 6, area));
        }
        if let Some(notice) = self.notice {
            f.render_widget(notice, centered_rect(44, 6, area));
        }
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect, state: &dyn StateSnapshot) {
        let keys = tab_keys(state);
        let titles: Vec<Line> = keys
            .iter()
            .map(|key| match key {
                TabKey::NewPlaylist => Line::from(" + "),
                TabKey::Playlist(plid) => match state.playlist(*plid) {
                    Some(p) if p.state == PlaylistState::New => Line::styled(
                        format!("*{}", truncate_to_width(&p.title, TAB_TITLE_WIDTH)),
                        Style::default()
                            .fg(colors::ACCENT)
                            .add_modifier(Modifier::ITALIC),
                    ),
                    Some(p) => Line::from(truncate_to_width(&p.title, TAB_TITLE_WIDTH)),
                    None => Line::from(format!("#{plid}")),
                },
            })
            .collect();

        let selected = state
            .active_playlist_id()
            .and_then(|active| keys.iter().position(|k| *k == TabKey::Playlist(active)));

        let tabs = Tabs::new(titles)
            .select(selected)
            .divider("|")
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_set(border::PLAIN),
            );
        f.render_widget(tabs, area);
    }

    fn render_body(
        &mut self,
        f: &mut Frame,
        area: Rect,
        state: &dyn StateSnapshot,
        plid: PlaylistId,
    ) {
        let (playlist, can_save, rows) = match tab_body(state, plid) {
            TabBody::Missing => return,
            TabBody::Loading => {
                let spinner = Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Loading playlist...");
                f.render_widget(spinner, area);
                return;
            }
            TabBody::Ready {
                playlist,
                can_save,
                rows,
            } => (playlist, can_save, rows),
        };

        if self.cursor_plid != Some(plid) {
            self.cursor_plid = Some(plid);
            self.list_state
                .select(if rows.is_empty() { None } else { Some(0) });
        } else if let Some(i) = self.list_state.selected() {
            if i >= rows.len() {
                self.list_state.select(rows.len().checked_sub(1));
            }
        }

        let [actions_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

        let enabled = Style::default().fg(colors::PRIMARY);
        let disabled = Style::default()
            .fg(colors::NEUTRAL)
            .add_modifier(Modifier::DIM);
        let actions = Line::from(vec![
            Span::styled("[s] Save", if can_save { enabled } else { disabled }),
            Span::raw("  "),
            Span::styled("[o] Sort ▾", enabled),
            Span::raw("  "),
            Span::styled("[d] Download", enabled),
            Span::styled(
                format!("   {} tracks", playlist.track_count()),
                Style::default().fg(colors::NEUTRAL),
            ),
        ]);
        f.render_widget(Paragraph::new(actions), actions_area);

        if rows.is_empty() {
            f.render_widget(
                Paragraph::new("This playlist is empty.")
                    .style(Style::default().fg(colors::NEUTRAL)),
                list_area,
            );
            return;
        }

        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| track_row(row.idx, row.track_id, row.track, row.is_playing))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, list_area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::{
        store::StoreState,
        testing::{FakeApi, RecordingDispatch, SaveCall},
    };

    struct Harness {
        view: PlaylistTabs,
        dispatch: Arc<RecordingDispatch>,
        api: Arc<FakeApi>,
        rx: flume::Receiver<Event>,
    }

    fn harness(api: FakeApi) -> Harness {
        let dispatch = Arc::new(RecordingDispatch::default());
        let api = Arc::new(api);
        let (tx, rx) = flume::unbounded();
        let view = PlaylistTabs::new(dispatch.clone(), api.clone(), tx);
        Harness {
            view,
            dispatch,
            api,
            rx,
        }
    }

    fn playlist(plid: i64, title: &str, tracks: Option<Vec<i64>>) -> Playlist {
        Playlist {
            plid: PlaylistId(plid),
            title: title.to_string(),
            state: if plid < 0 {
                PlaylistState::New
            } else {
                PlaylistState::Saved
            },
            is_public: false,
            track_ids: tracks.map(|ids| ids.into_iter().map(TrackId).collect()),
        }
    }

    fn state_with(playlists: Vec<Playlist>, active: i64) -> StoreState {
        let mut state = StoreState::default();
        for p in playlists {
            state.open_playlist_ids.push(p.plid);
            state.playlists.insert(p.plid, p);
        }
        state.active_playlist_id = Some(PlaylistId(active));
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn render_to_string(view: &mut PlaylistTabs, state: &StoreState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 14)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, state);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn placeholder_tab_creates_playlist() {
        let h = harness(FakeApi::rejecting());

        h.view.on_tab_select(TabKey::NewPlaylist);
        assert_eq!(h.dispatch.take(), vec![StoreAction::CreatePlaylist]);

        h.view.on_tab_select(TabKey::Playlist(PlaylistId(3)));
        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::ActivatePlaylist(PlaylistId(3))]
        );
    }

    #[test]
    fn moving_past_last_tab_selects_placeholder() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(1, "A", Some(vec![])), playlist(2, "B", Some(vec![]))], 2);

        assert!(h.view.handle_key(key(KeyCode::Right), &state));
        assert_eq!(h.dispatch.take(), vec![StoreAction::CreatePlaylist]);

        assert!(h.view.handle_key(key(KeyCode::Char('h')), &state));
        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::ActivatePlaylist(PlaylistId(1))]
        );
    }

    #[test]
    fn track_select_sets_playing_then_plays() {
        let h = harness(FakeApi::rejecting());

        h.view.on_track_select(PlaylistId(4), 9);

        assert_eq!(
            h.dispatch.take(),
            vec![
                StoreAction::SetPlayingPlaylist(PlaylistId(4)),
                StoreAction::PlayTrackInPlaylist {
                    plid: PlaylistId(4),
                    idx: 9
                },
            ]
        );
    }

    #[test]
    fn sort_handler_is_bound_to_its_playlist() {
        let h = harness(FakeApi::rejecting());
        let sort = h.view.sort_handler(PlaylistId(8));

        sort(SortKey::Artist);

        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::SortPlaylistTracks {
                plid: PlaylistId(8),
                key: SortKey::Artist
            }]
        );
    }

    #[test]
    fn sort_menu_dispatches_selected_key() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(1, "A", Some(vec![1]))], 1);

        h.view.handle_key(key(KeyCode::Char('o')), &state);
        h.view.handle_key(key(KeyCode::Down), &state);
        h.view.handle_key(key(KeyCode::Enter), &state);

        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::SortPlaylistTracks {
                plid: PlaylistId(1),
                key: SortKey::Title
            }]
        );
    }

    #[test]
    fn closing_tab_dispatches_only_close() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(6, "A", Some(vec![1, 2]))], 6);

        h.view.on_tab_close(PlaylistId(6));
        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::ClosePlaylistTab(PlaylistId(6))]
        );

        h.view.handle_key(key(KeyCode::Char('x')), &state);
        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::ClosePlaylistTab(PlaylistId(6))]
        );
    }

    #[test]
    fn loading_playlist_shows_spinner_without_actions() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(1, "Pending", None)], 1);

        assert!(matches!(tab_body(&state, PlaylistId(1)), TabBody::Loading));

        let screen = render_to_string(&mut h.view, &state);
        assert!(screen.contains("Loading playlist..."));
        assert!(!screen.contains("[s] Save"));
        assert!(!screen.contains("Download"));
    }

    #[test]
    fn loaded_playlist_shows_actions() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(1, "Ready", Some(vec![1]))], 1);

        let screen = render_to_string(&mut h.view, &state);
        assert!(screen.contains("[s] Save"));
        assert!(screen.contains("[d] Download"));
        assert!(!screen.contains("Loading"));
    }

    #[test]
    fn save_is_disabled_exactly_for_empty_playlists() {
        let state = state_with(
            vec![playlist(1, "Empty", Some(vec![])), playlist(2, "Full", Some(vec![5]))],
            1,
        );

        let can_save = |plid| match tab_body(&state, PlaylistId(plid)) {
            TabBody::Ready { can_save, .. } => can_save,
            _ => panic!("playlist should be ready"),
        };
        assert!(!can_save(1));
        assert!(can_save(2));

        let mut h = harness(FakeApi::rejecting());
        assert_eq!(h.view.open_save_dialog(&state), Err(SaveError::EmptyPlaylist));
        assert!(!h.view.is_save_dialog_visible());
    }

    #[test]
    fn only_playing_row_of_active_playlist_is_highlighted() {
        let mut state = state_with(
            vec![
                playlist(1, "Active", Some(vec![10, 11, 12])),
                playlist(2, "Other", Some(vec![20, 21, 22])),
            ],
            1,
        );
        state.playing_playlist_id = Some(PlaylistId(1));
        state.playing_track_idx = Some(1);

        let highlighted = |plid| match tab_body(&state, PlaylistId(plid)) {
            TabBody::Ready { rows, .. } => rows
                .iter()
                .filter(|r| r.is_playing)
                .map(|r| r.idx)
                .collect::<Vec<_>>(),
            _ => panic!("playlist should be ready"),
        };

        assert_eq!(highlighted(1), vec![1]);
        assert!(highlighted(2).is_empty());
    }

    #[tokio::test]
    async fn saving_local_playlist_replaces_it_on_success() {
        let mut h = harness(FakeApi::resolving(42));
        let state = state_with(vec![playlist(-7, "Untitled", Some(vec![1, 2]))], -7);

        h.view.open_save_dialog(&state).unwrap();
        assert!(h.view.is_save_dialog_visible());

        h.view.confirm_save("Road Trip".into(), true).unwrap();
        assert!(h.view.is_saving());

        let event = h.rx.recv_async().await.unwrap();
        h.view.on_event(&event);

        assert_eq!(
            *h.api.calls.lock().unwrap(),
            vec![SaveCall::new(-7, "Road Trip", true, &[1, 2])]
        );
        let actions = h.dispatch.take();
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            StoreAction::ReplacePlaylist { old, new } => {
                assert_eq!(*old, PlaylistId(-7));
                assert_eq!(new.plid, PlaylistId(42));
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert!(!h.view.is_save_dialog_visible());
        assert!(!h.view.is_saving());
    }

    #[tokio::test]
    async fn failed_save_keeps_dialog_open_for_retry() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(-7, "Untitled", Some(vec![1]))], -7);

        h.view.open_save_dialog(&state).unwrap();
        h.view.confirm_save("Road Trip".into(), true).unwrap();

        let event = h.rx.recv_async().await.unwrap();
        h.view.on_event(&event);

        assert_eq!(
            h.dispatch.take(),
            vec![StoreAction::ShowError(SAVE_FAILED_MESSAGE.to_string())]
        );
        assert!(h.view.is_save_dialog_visible());
        assert!(!h.view.is_saving());
        assert_eq!(h.view.save_dialog().unwrap().title, "Road Trip");
    }

    #[tokio::test]
    async fn saving_persisted_playlist_is_not_implemented() {
        let mut h = harness(FakeApi::resolving(42));
        let state = state_with(vec![playlist(5, "Saved", Some(vec![1]))], 5);

        h.view.open_save_dialog(&state).unwrap();
        let result = h.view.confirm_save("Renamed".into(), false);

        assert_eq!(result, Err(SaveError::UpdateNotImplemented));
        assert_eq!(h.view.notice(), Some(Notice::UpdateUnsupported));
        assert!(!h.view.is_saving());
        tokio::task::yield_now().await;
        assert_eq!(h.api.call_count(), 0);
        assert!(h.dispatch.take().is_empty());
        assert!(h.rx.is_empty());
    }

    #[tokio::test]
    async fn second_submission_while_saving_is_rejected() {
        let mut h = harness(FakeApi::resolving(42));
        let state = state_with(vec![playlist(-1, "Mix", Some(vec![1]))], -1);

        h.view.open_save_dialog(&state).unwrap();
        h.view.confirm_save("Mix".into(), false).unwrap();
        assert_eq!(
            h.view.confirm_save("Mix".into(), false),
            Err(SaveError::AlreadySaving)
        );

        let event = h.rx.recv_async().await.unwrap();
        h.view.on_event(&event);
        assert_eq!(h.api.call_count(), 1);
    }

    #[tokio::test]
    async fn reopening_dialog_does_not_resubmit_pending_save() {
        let mut api = FakeApi::resolving(42);
        api.delay = Duration::from_millis(200);
        let mut h = harness(api);
        let state = state_with(vec![playlist(-7, "Untitled", Some(vec![4, 5]))], -7);

        h.view.open_save_dialog(&state).unwrap();
        h.view.confirm_save("Road Trip".into(), true).unwrap();
        h.view.cancel_save();
        h.view.open_save_dialog(&state).unwrap();

        assert_eq!(
            h.view.confirm_save("Road Trip".into(), true),
            Err(SaveError::AlreadySaving)
        );

        let event = h.rx.recv_async().await.unwrap();
        h.view.on_event(&event);

        assert_eq!(h.api.call_count(), 1);
        let actions = h.dispatch.take();
        assert_eq!(actions.len(), 1);
        assert!(matches!(
            &actions[0],
            StoreAction::ReplacePlaylist { old, .. } if *old == PlaylistId(-7)
        ));
        assert!(!h.view.is_save_dialog_visible());
    }

    #[tokio::test]
    async fn dropping_view_cancels_pending_save() {
        let mut api = FakeApi::resolving(42);
        api.delay = Duration::from_secs(30);
        let mut h = harness(api);
        let state = state_with(vec![playlist(-1, "Mix", Some(vec![1]))], -1);

        h.view.open_save_dialog(&state).unwrap();
        h.view.confirm_save("Mix".into(), false).unwrap();
        drop(h.view);

        let outcome = tokio::time::timeout(Duration::from_secs(5), h.rx.recv_async()).await;
        assert!(matches!(outcome, Ok(Err(_))));
    }

    #[tokio::test]
    async fn dialog_keys_edit_and_submit() {
        let mut h = harness(FakeApi::resolving(3));
        let state = state_with(vec![playlist(-2, "Mix", Some(vec![1]))], -2);

        h.view.handle_key(key(KeyCode::Char('s')), &state);
        assert!(h.view.is_save_dialog_visible());

        h.view.handle_key(key(KeyCode::Backspace), &state);
        h.view.handle_key(key(KeyCode::Char('e')), &state);
        h.view.handle_key(key(KeyCode::Tab), &state);
        h.view.handle_key(key(KeyCode::Enter), &state);

        let event = h.rx.recv_async().await.unwrap();
        h.view.on_event(&event);
        assert_eq!(
            *h.api.calls.lock().unwrap(),
            vec![SaveCall::new(-2, "Mie", true, &[1])]
        );
    }

    #[test]
    fn cancel_hides_dialog_without_dispatch() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(-2, "Mix", Some(vec![1]))], -2);

        h.view.open_save_dialog(&state).unwrap();
        h.view.handle_key(key(KeyCode::Esc), &state);

        assert!(!h.view.is_save_dialog_visible());
        assert!(h.dispatch.take().is_empty());
    }

    #[test]
    fn download_raises_blocking_notice() {
        let mut h = harness(FakeApi::rejecting());
        let state = state_with(vec![playlist(1, "A", Some(vec![1]))], 1);

        h.view.handle_key(key(KeyCode::Char('d')), &state);
        assert_eq!(h.view.notice(), Some(Notice::DownloadUnsupported));

        // Swallowed by the notice, not treated as close.
        assert!(h.view.handle_key(key(KeyCode::Char('x')), &state));
        assert!(h.dispatch.take().is_empty());
        assert_eq!(h.view.notice(), None);
    }
}
