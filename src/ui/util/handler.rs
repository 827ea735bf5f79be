use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    event::events::Event,
    store::StoreAction,
    ui::{
        app::App,
        input::{AppMessage, InputHandler},
        tui::{TerminalEvent, Tui},
    },
};

pub struct EventHandler;

impl EventHandler {
    /// Waits for the next terminal event, then drains pending app events.
    /// Returns whether the screen needs redrawing.
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await {
            if Self::handle_event(app, evt, tui)? {
                should_render = true;
            }
        }

        if Self::drain_actions(app) {
            should_render = true;
        }

        Ok(should_render)
    }

    pub fn drain_actions(app: &mut App) -> bool {
        let mut handled = false;
        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt);
            handled = true;
        }
        handled
    }

    pub fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => app.load_playlists(),
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key),
            TerminalEvent::Paste(text) => app.view.handle_paste(&text),
            TerminalEvent::Tick => return Ok(app.has_focus),
            TerminalEvent::Resize(..) => {}
        }

        Ok(true)
    }

    pub fn handle_action(app: &mut App, evt: Event) {
        app.view.on_event(&evt);

        match evt {
            Event::Dispatch(action) => app.apply(action),
            Event::PlaylistsFetched(playlists) => {
                app.apply(StoreAction::PlaylistsLoaded(playlists));
            }
            Event::PlaylistDetailFetched(playlist, tracks) => {
                app.apply(StoreAction::PlaylistDetailLoaded { playlist, tracks });
            }
            Event::FetchError(message) => app.apply(StoreAction::ShowError(message)),
            Event::PlaylistSaved { .. } | Event::PlaylistSaveFailed { .. } => {}
        }
    }

    pub fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        if evt.code == KeyCode::Char('c') && evt.modifiers == KeyModifiers::CONTROL {
            app.update(AppMessage::Quit);
            return;
        }

        if app.view.handle_key(evt, app.store.state()) {
            return;
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg);
        }
    }
}
