//! Debounced, sequence-checked autocomplete field
//!
//! Each input field owns a monotonically increasing sequence number. Every
//! change to the input starts a new sequence, so a lookup that was issued
//! for an older input can never overwrite the suggestions of the current
//! one, whatever order the responses arrive in.
//!
//! The field does no I/O and never reads the clock itself: callers feed it
//! input with a timestamp, `poll` it for due lookups and hand responses back
//! through `complete`.

use std::fmt::Display;
use tokio::time::{Duration, Instant};
use tracing::debug;

/// Quiescence window before a lookup is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Longest accepted quiescence window; longer values are clamped
pub const MAX_DEBOUNCE: Duration = Duration::from_secs(10);

/// Minimum number of characters before a lookup is issued
pub const MIN_QUERY_CHARS: usize = 3;

/// Whether `query` is long enough to look up
#[must_use]
pub fn is_searchable(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars
}

/// A lookup the caller should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub query: String,
}

/// One autocomplete input and its suggestion list
#[derive(Debug, Clone)]
pub struct AutocompleteField<T> {
    input: String,
    seq: u64,
    due: Option<Instant>,
    suggestions: Vec<T>,
    debounce: Duration,
    min_chars: usize,
}

impl<T> AutocompleteField<T> {
    /// `debounce` is clamped to `MAX_DEBOUNCE`
    #[must_use]
    pub const fn new(debounce: Duration, min_chars: usize) -> Self {
        let debounce = if debounce.as_nanos() > MAX_DEBOUNCE.as_nanos() {
            MAX_DEBOUNCE
        } else {
            debounce
        };
        Self {
            input: String::new(),
            seq: 0,
            due: None,
            suggestions: Vec::new(),
            debounce,
            min_chars,
        }
    }

    /// Current input text
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Suggestions for the current input
    #[must_use]
    pub fn suggestions(&self) -> &[T] {
        &self.suggestions
    }

    /// Sequence number of the current input
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// When the pending lookup becomes due, if one is pending
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Record new input text at `now`
    ///
    /// Starts a new sequence. Input below the minimum length clears the
    /// suggestions and cancels any pending lookup.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.input {
            return;
        }
        self.input = text;
        self.seq += 1;

        if is_searchable(&self.input, self.min_chars) {
            self.due = Some(now.checked_add(self.debounce).unwrap_or(now));
        } else {
            self.due = None;
            self.suggestions.clear();
        }
    }

    /// Issue the pending lookup if its quiescence window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<LookupRequest> {
        let due = self.due?;
        if now < due {
            return None;
        }
        self.due = None;
        Some(LookupRequest {
            seq: self.seq,
            query: self.input.trim().to_string(),
        })
    }

    /// Hand back the result of a lookup
    ///
    /// Only the response for the current sequence is applied; anything older
    /// is discarded. A failed lookup leaves the list empty. Returns `true` if
    /// the response was applied.
    pub fn complete<E: Display>(&mut self, seq: u64, result: Result<Vec<T>, E>) -> bool {
        if seq != self.seq {
            debug!(seq, current = self.seq, "discarding stale suggestions");
            return false;
        }
        match result {
            Ok(items) => self.suggestions = items,
            Err(e) => {
                debug!(seq, error = %e, "suggestion lookup failed");
                self.suggestions.clear();
            }
        }
        true
    }

    /// Enter `query` and run its lookup right away, skipping the debounce
    ///
    /// For one-shot callers that have no stream of keystrokes. A failed
    /// lookup leaves the list empty like any other failure. Returns `false`
    /// if the query is too short or equals the current input.
    pub fn search_now<E, F>(&mut self, query: impl Into<String>, now: Instant, fetch: F) -> bool
    where
        E: Display,
        F: FnOnce(&str) -> Result<Vec<T>, E>,
    {
        self.on_input(query, now);
        let Some(request) = self.due.and_then(|due| self.poll(due)) else {
            return false;
        };
        let result = fetch(&request.query);
        self.complete(request.seq, result)
    }

    /// Take the suggestion at `index` and reset the field
    pub fn take(&mut self, index: usize) -> Option<T> {
        if index >= self.suggestions.len() {
            return None;
        }
        let picked = self.suggestions.swap_remove(index);
        self.reset();
        Some(picked)
    }

    /// Clear input and suggestions, invalidating in-flight lookups
    pub fn reset(&mut self) {
        self.input.clear();
        self.suggestions.clear();
        self.due = None;
        self.seq += 1;
    }
}

impl<T> Default for AutocompleteField<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, MIN_QUERY_CHARS)
    }
}
