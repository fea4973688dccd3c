//! State for one collection screen
//!
//! A `ListView` is created each time a collection is opened and dropped when
//! the user switches away, so nothing about a previous screen leaks into the
//! next one.

use crate::swapi::resource::{filter_indices, subtitle, summary};
use crate::swapi::{Endpoint, ResourceItem};

/// Row shown when a filter (or the collection itself) has no items
pub const NO_ITEMS: &str = "No items found.";

/// Load status of a list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Waiting for the collection to load
    Loading,
    /// Items are available
    Ready,
    /// Loading failed; holds the message shown in place of the list
    Failed(String),
}

/// A rendered row: summary plus optional secondary line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub summary: String,
    pub subtitle: Option<String>,
}

/// One collection screen: its items, the current filter and the selection
#[derive(Debug, Clone)]
pub struct ListView {
    endpoint: Endpoint,
    status: ListStatus,
    items: Vec<ResourceItem>,
    /// Indices into `items` that pass the current filter
    visible: Vec<usize>,
    /// Index into `visible`
    selected: usize,
    query: String,
}

impl ListView {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            status: ListStatus::Loading,
            items: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            query: String::new(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    /// Field used as the display name for this collection
    pub fn display_key(&self) -> &'static str {
        self.endpoint.display_key()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Total number of loaded items, ignoring the filter
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Stores loaded items and re-applies the current filter
    pub fn set_items(&mut self, items: Vec<ResourceItem>) {
        self.items = items;
        self.status = ListStatus::Ready;
        self.refilter();
    }

    /// Replaces the list with an error message; no partial list is kept
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.visible.clear();
        self.selected = 0;
        self.status = ListStatus::Failed(message.into());
    }

    /// Marks the list as loading again (for reloads)
    pub fn set_loading(&mut self) {
        self.status = ListStatus::Loading;
    }

    /// Filters by case-insensitive substring on the display name
    ///
    /// An empty query restores the full list.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = filter_indices(&self.items, self.display_key(), &self.query);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    /// Items passing the current filter, in collection order
    pub fn visible_items(&self) -> impl Iterator<Item = &ResourceItem> {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Rows for the visible items
    pub fn rows(&self) -> Vec<ListRow> {
        let key = self.display_key();
        self.visible_items()
            .map(|item| ListRow {
                summary: summary(item, key),
                subtitle: subtitle(item),
            })
            .collect()
    }

    /// Plain-text rendering for non-interactive output
    pub fn plain_lines(&self) -> Vec<String> {
        match &self.status {
            ListStatus::Loading => vec![format!("Loading {}...", self.endpoint)],
            ListStatus::Failed(message) => vec![format!("Error loading data: {}", message)],
            ListStatus::Ready if self.visible.is_empty() => vec![NO_ITEMS.to_string()],
            ListStatus::Ready => self.rows().into_iter().map(|row| row.summary).collect(),
        }
    }

    /// Position of the selection within the visible rows
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ResourceItem> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.items.get(i))
    }

    /// Moves the selection up, wrapping to bottom if at top
    pub fn move_selection_up(&mut self) {
        let count = self.visible.len();
        if count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = count - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Moves the selection down, wrapping to top if at bottom
    pub fn move_selection_down(&mut self) {
        let count = self.visible.len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected + 1) % count;
    }
}
