//! Async driver for the autocomplete side channel
//!
//! Runs the two autocomplete fields against a `SuggestionSource`: input
//! events come in over a channel, lookups are debounced with `tokio::time` and
//! executed on a `JoinSet`, and every response passes the field's sequence
//! check before an update is sent out. Responses are applied in query order,
//! never in arrival order.

use super::AssistState;
use super::field::LookupRequest;
use super::source::{Location, SuggestionSource};
use crate::assist::error::AssistError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

/// Input typed into one of the autocomplete fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistInput {
    Region(String),
    Contact(String),
}

/// Fresh suggestions for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistUpdate {
    Region(Vec<Location>),
    Contact(Vec<String>),
}

enum Outcome {
    Region(u64, Result<Vec<Location>, AssistError>),
    Contact(u64, Result<Vec<String>, AssistError>),
}

/// Drives `AssistState` against a suggestion source
pub struct AssistDriver<S: SuggestionSource> {
    source: Arc<S>,
    state: AssistState,
}

impl<S: SuggestionSource> AssistDriver<S> {
    #[must_use]
    pub const fn new(source: Arc<S>, state: AssistState) -> Self {
        Self { source, state }
    }

    /// Process input until the input channel closes
    ///
    /// Returns the final field state. Lookups still in flight when the input
    /// channel closes are dropped. Stops early if the update receiver is gone.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<AssistInput>,
        updates: mpsc::Sender<AssistUpdate>,
    ) -> AssistState {
        let mut lookups: JoinSet<Outcome> = JoinSet::new();

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(AssistInput::Region(text)) => {
                        self.state.region.on_input(text, Instant::now());
                    }
                    Some(AssistInput::Contact(text)) => {
                        self.state.contact.on_input(text, Instant::now());
                    }
                    None => break,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.dispatch(&mut lookups, Instant::now());
                }
                Some(joined) = lookups.join_next(), if !lookups.is_empty() => {
                    let outcome = match joined {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!(error = %e, "suggestion lookup task failed");
                            continue;
                        }
                    };
                    if let Some(update) = self.apply(outcome) {
                        if updates.send(update).await.is_err() {
                            debug!("update receiver closed, stopping assist driver");
                            break;
                        }
                    }
                }
            }
        }

        self.state
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.state.region.deadline(), self.state.contact.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn dispatch(&mut self, lookups: &mut JoinSet<Outcome>, now: Instant) {
        if let Some(LookupRequest { seq, query }) = self.state.region.poll(now) {
            let source = Arc::clone(&self.source);
            lookups.spawn(async move {
                let result = source.search_locations(&query).await;
                Outcome::Region(seq, result)
            });
        }
        if let Some(LookupRequest { seq, query }) = self.state.contact.poll(now) {
            let source = Arc::clone(&self.source);
            lookups.spawn(async move {
                let result = source.search_contacts(&query).await;
                Outcome::Contact(seq, result)
            });
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Option<AssistUpdate> {
        match outcome {
            Outcome::Region(seq, result) => self
                .state
                .region
                .complete(seq, result)
                .then(|| AssistUpdate::Region(self.state.region.suggestions().to_vec())),
            Outcome::Contact(seq, result) => self
                .state
                .contact
                .complete(seq, result)
                .then(|| AssistUpdate::Contact(self.state.contact.suggestions().to_vec())),
        }
    }
}
