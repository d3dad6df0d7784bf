//! Autocomplete assist
//!
//! Input assistance for the two free-text facets. Region suggestions become
//! region tags when picked; contact suggestions overwrite the search query.
//! Nothing here is persisted or rendered as a chip.

pub mod driver;
pub mod error;
pub mod field;
pub mod source;

pub use driver::{AssistDriver, AssistInput, AssistUpdate};
pub use error::AssistError;
pub use field::{
    AutocompleteField, DEFAULT_DEBOUNCE, LookupRequest, MAX_DEBOUNCE, MIN_QUERY_CHARS,
    is_searchable,
};
pub use source::{HttpSuggestionSource, Location, SuggestionSource};

use crate::engine::{FilterEngine, Selection};
use crate::facets::keys;
use tokio::time::Duration;

/// The region and contact autocomplete fields of one drawer
#[derive(Debug, Clone, Default)]
pub struct AssistState {
    pub region: AutocompleteField<Location>,
    pub contact: AutocompleteField<String>,
}

impl AssistState {
    /// Both fields with the same debounce window and minimum length
    #[must_use]
    pub const fn new(debounce: Duration, min_chars: usize) -> Self {
        Self {
            region: AutocompleteField::new(debounce, min_chars),
            contact: AutocompleteField::new(debounce, min_chars),
        }
    }

    /// Pick a region suggestion, appending it as a region tag
    ///
    /// Returns `true` if a new tag was added.
    pub fn accept_region(&mut self, index: usize, engine: &mut FilterEngine<'_>) -> bool {
        self.region
            .take(index)
            .is_some_and(|location| {
                engine.select(keys::REGION, Selection::Tag(location.tag_text()))
            })
    }

    /// Add the typed region text as a tag without picking a suggestion
    pub fn accept_region_input(&mut self, engine: &mut FilterEngine<'_>) -> bool {
        let text = self.region.input().to_string();
        self.region.reset();
        engine.select(keys::REGION, Selection::Tag(text))
    }

    /// Pick a contact suggestion, overwriting the search query
    pub fn accept_contact(&mut self, index: usize, engine: &mut FilterEngine<'_>) -> bool {
        self.contact
            .take(index)
            .is_some_and(|name| engine.select(keys::SEARCH_QUERY, Selection::Text(name)))
    }
}
