//! Application state management for the Holocron viewer
//!
//! This module contains the main application state: keyboard handling, the
//! current collection screen, the search bar and the detail modal. Network
//! work runs on spawned tasks that report back through an mpsc channel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cache::CacheManager;
use crate::cli::StartupConfig;
use crate::detail::{present, DetailView};
use crate::directory::load_items;
use crate::listing::ListView;
use crate::search::{Debouncer, SearchInput};
use crate::swapi::resource::primary_label;
use crate::swapi::{Endpoint, Fetch, ReferenceResolver, ResourceItem, SwapiClient};
use crate::ui::detail_modal;

/// Results delivered by background tasks
#[derive(Debug)]
pub enum AppMessage {
    /// A collection finished loading
    ItemsLoaded {
        generation: u64,
        items: Vec<ResourceItem>,
    },
    /// A collection failed to load
    LoadFailed { generation: u64, message: String },
    /// A detail view finished resolving its references
    DetailReady { generation: u64, view: DetailView },
}

/// State of the detail modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// No modal shown
    Closed,
    /// Modal shown while references resolve
    Loading { title: String },
    /// Modal shown with its content
    Open { view: DetailView, scroll: u16 },
}

/// Main application struct managing state and data
pub struct App {
    /// Current collection screen
    pub list: ListView,
    /// Search bar contents
    pub search: SearchInput,
    /// Detail modal
    pub detail: DetailState,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Base URL of the API
    base_url: String,
    /// Delays filter updates while typing
    debouncer: Debouncer,
    /// Bumped on every collection load; only the latest load may fill the list
    list_generation: u64,
    /// Bumped on every detail open/close; stale results are dropped
    detail_generation: u64,
    /// Screen size at the last draw, used to bound detail scrolling
    viewport: Rect,
    fetch: Arc<dyn Fetch>,
    cache: Option<CacheManager>,
    resolver: ReferenceResolver,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    /// Creates an App talking to the live API, as configured on the command line
    pub fn new(config: &StartupConfig) -> Self {
        Self::with_fetch(config, Arc::new(SwapiClient::new()), config.cache_manager())
    }

    /// Creates an App with a custom transport and cache
    pub fn with_fetch(
        config: &StartupConfig,
        fetch: Arc<dyn Fetch>,
        cache: Option<CacheManager>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let resolver = ReferenceResolver::new(fetch.clone(), cache.clone());
        let mut list = ListView::new(config.endpoint);
        list.apply_filter(&config.query);

        Self {
            list,
            search: SearchInput::with_query(config.query.clone()),
            detail: DetailState::Closed,
            show_help: false,
            should_quit: false,
            base_url: config.api_base.clone(),
            debouncer: Debouncer::default(),
            list_generation: 0,
            detail_generation: 0,
            viewport: Rect::new(0, 0, 80, 24),
            fetch,
            cache,
            resolver,
            tx,
            rx,
        }
    }

    /// Starts loading the current collection in the background
    pub fn load_current(&mut self) {
        let endpoint = self.list.endpoint();
        self.list.set_loading();
        self.list_generation += 1;
        let generation = self.list_generation;

        let fetch = self.fetch.clone();
        let cache = self.cache.clone();
        let base_url = self.base_url.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let message = match load_items(fetch.as_ref(), cache.as_ref(), &base_url, endpoint).await
            {
                Ok(items) => AppMessage::ItemsLoaded { generation, items },
                Err(e) => {
                    error!(%endpoint, error = %e, "Failed to load collection");
                    AppMessage::LoadFailed {
                        generation,
                        message: e.to_string(),
                    }
                }
            };
            let _ = tx.send(message);
        });
    }

    /// Replaces the current screen with a fresh one for `endpoint`
    pub fn switch_endpoint(&mut self, endpoint: Endpoint) {
        if endpoint == self.list.endpoint() {
            return;
        }
        info!(%endpoint, "Switching collection");
        self.close_detail();
        self.search.cancel();
        self.debouncer.cancel();
        self.list = ListView::new(endpoint);
        self.load_current();
    }

    /// Applies every message waiting on the channel
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    /// Records the screen size the UI was last drawn at
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Waits for the next background message and applies it
    #[cfg(test)]
    async fn next_message(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.handle_message(message);
                true
            }
            None => false,
        }
    }

    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::ItemsLoaded { generation, items }
                if generation == self.list_generation =>
            {
                self.list.set_items(items);
            }
            AppMessage::LoadFailed {
                generation,
                message,
            } if generation == self.list_generation => {
                self.list.set_error(message);
            }
            AppMessage::DetailReady { generation, view } => {
                if generation == self.detail_generation
                    && matches!(self.detail, DetailState::Loading { .. })
                {
                    self.detail = DetailState::Open { view, scroll: 0 };
                } else {
                    debug!(generation, "Dropping superseded detail view");
                }
            }
            AppMessage::ItemsLoaded { generation, .. } | AppMessage::LoadFailed { generation, .. } => {
                debug!(generation, "Dropping superseded collection load");
            }
        }
    }

    /// Applies a debounced search query once typing has paused
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.list.apply_filter(&query);
        }
    }

    /// Opens the detail modal for the selected item
    pub fn open_selected_detail(&mut self) {
        let Some(item) = self.list.selected_item().cloned() else {
            return;
        };
        let key = self.list.display_key();

        self.detail_generation += 1;
        let generation = self.detail_generation;
        let title = primary_label(&item, key)
            .unwrap_or_else(|| "Details".to_string());
        self.detail = DetailState::Loading { title };

        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let view = present(&item, key, &resolver).await;
            let _ = tx.send(AppMessage::DetailReady { generation, view });
        });
    }

    /// Closes the detail modal; results still in flight are discarded
    pub fn close_detail(&mut self) {
        self.detail_generation += 1;
        self.detail = DetailState::Closed;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (or close the open modal)
    /// - `Up`/`k`, `Down`/`j`: Move selection, or scroll the modal
    /// - `Enter`: Open details for the selected item
    /// - `/`: Focus the search bar (`Enter` keeps the filter, `Esc` clears it)
    /// - `Tab`/`Shift-Tab`, `1`-`6`: Switch collection
    /// - `r`: Reload the current collection
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        self.handle_key_at(key_event, Instant::now());
    }

    pub fn handle_key_at(&mut self, key_event: KeyEvent, now: Instant) {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.search.is_active() {
            self.handle_search_key(key_event, now);
            return;
        }

        if self.detail != DetailState::Closed {
            self.handle_detail_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.list.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.list.move_selection_down(),
            KeyCode::Enter => self.open_selected_detail(),
            KeyCode::Char('/') => self.search.activate(),
            KeyCode::Tab => self.switch_endpoint(self.list.endpoint().next()),
            KeyCode::BackTab => self.switch_endpoint(self.list.endpoint().prev()),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                if let Some(endpoint) = Endpoint::ALL.get(index) {
                    self.switch_endpoint(*endpoint);
                }
            }
            KeyCode::Char('r') => self.load_current(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.code {
            KeyCode::Esc => {
                self.search.cancel();
                self.debouncer.cancel();
                self.list.apply_filter("");
            }
            KeyCode::Enter => {
                // Apply immediately rather than waiting out the debounce
                self.search.submit();
                self.debouncer.cancel();
                self.list.apply_filter(self.search.query());
            }
            KeyCode::Backspace => {
                if self.search.pop() {
                    self.debouncer.push(self.search.query(), now);
                }
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.debouncer.push(self.search.query(), now);
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.close_detail(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_detail(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_detail(-1),
            KeyCode::Char('g') => {
                if let DetailState::Open { scroll, .. } = &mut self.detail {
                    *scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn scroll_detail(&mut self, delta: i32) {
        if let DetailState::Open { view, scroll } = &mut self.detail {
            let max = i32::from(detail_modal::max_scroll(view, self.viewport));
            *scroll = (i32::from(*scroll) + delta).clamp(0, max) as u16;
        }
    }
}
