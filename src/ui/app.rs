use std::sync::Arc;

use flume::{Receiver, Sender};
use tracing::{info, warn};

use crate::{
    config::Config,
    event::events::{ChannelDispatcher, Event},
    http::{ApiService, PlaylistApi},
    store::{Store, StoreAction, StoreEffect},
    util::task::TaskManager,
};

use super::{
    input::AppMessage,
    layout::AppLayout,
    tui::{self, TerminalEvent},
    util::handler::EventHandler,
    views::PlaylistTabs,
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub event_tx: Sender<Event>,
    pub api: Arc<dyn PlaylistApi>,
    pub store: Store,
    pub view: PlaylistTabs,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> color_eyre::Result<Self> {
        let api = Arc::new(ApiService::new(config)?);
        info!(api_url = %config.api_url, "starting");
        Ok(Self::with_api(api))
    }

    pub fn with_api(api: Arc<dyn PlaylistApi>) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let dispatch = Arc::new(ChannelDispatcher::new(event_tx.clone()));
        let view = PlaylistTabs::new(dispatch, api.clone(), event_tx.clone());

        Self {
            event_rx,
            event_tx,
            api,
            store: Store::new(),
            view,
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui)?;
        let mut should_render = true;
        while !self.should_quit {
            if should_render {
                tui.draw(|f| {
                    let area = f.area();
                    AppLayout::new(self).render(f, area);
                })?;
            }

            should_render = EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        tui.exit()?;
        Ok(())
    }

    pub fn update(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::DismissError => self.apply(StoreAction::DismissError),
        }
    }

    /// Runs an action through the store and starts any follow-up fetches.
    pub fn apply(&mut self, action: StoreAction) {
        for effect in self.store.reduce(action) {
            match effect {
                StoreEffect::FetchPlaylistDetail(plid) => {
                    let api = self.api.clone();
                    let tx = self.event_tx.clone();
                    self.task_manager.spawn(
                        &format!("detail:{plid}"),
                        tokio::spawn(async move {
                            match api.fetch_playlist_detail(plid).await {
                                Ok((playlist, tracks)) => {
                                    let _ = tx.send(Event::PlaylistDetailFetched(playlist, tracks));
                                }
                                Err(e) => {
                                    warn!(%plid, "Failed to fetch playlist: {e}");
                                    let _ = tx.send(Event::FetchError(format!(
                                        "Failed to load playlist: {e}"
                                    )));
                                }
                            }
                        }),
                    );
                }
            }
        }
    }

    pub fn load_playlists(&mut self) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        self.task_manager.spawn(
            "playlists",
            tokio::spawn(async move {
                match api.fetch_playlists().await {
                    Ok(playlists) => {
                        let _ = tx.send(Event::PlaylistsFetched(playlists));
                    }
                    Err(e) => {
                        warn!("Failed to fetch playlists: {e}");
                        let _ = tx.send(Event::FetchError(format!(
                            "Failed to load playlists: {e}"
                        )));
                    }
                }
            }),
        );
    }
}
