//! Search input state and debouncing
//!
//! Keystrokes edit the query immediately, but the list is only re-filtered
//! once typing pauses for [`SEARCH_DEBOUNCE`]. The `App` owns exactly one
//! `SearchInput` and one `Debouncer`, so switching collections never stacks
//! extra handlers.

use std::time::{Duration, Instant};

/// Quiet period before a query change is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Delays a value until no newer value has arrived for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records a new value, replacing any pending one and restarting the timer
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// Returns the pending value once the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = matches!(
            &self.pending,
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay
        );
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Drops any pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Text typed into the search bar
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    query: String,
    active: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a query already filled in (from `--query`)
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            active: false,
        }
    }

    /// Check if search is currently receiving keystrokes
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Focuses the search bar, keeping the current query for editing
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Leaves the search bar, keeping the query as the active filter
    pub fn submit(&mut self) {
        self.active = false;
    }

    /// Leaves the search bar and clears the query
    pub fn cancel(&mut self) {
        self.active = false;
        self.query.clear();
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    /// Removes the last character; returns false when the query was already empty
    pub fn pop(&mut self) -> bool {
        self.query.pop().is_some()
    }
}
