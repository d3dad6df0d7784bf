//! Facet data structures
//!
//! A facet is one independent filterable dimension of the lead list. Each
//! facet has a stable key, a selection mode and (for enumerable modes) an
//! ordered option list. Option order is display order.

use serde::{Deserialize, Serialize};

/// Stable facet identifiers
pub mod keys {
    pub const VISITED_DATE: &str = "visitedDate";
    pub const VISITED_TIME: &str = "visitedTime";
    pub const PAGE_VISITS: &str = "pageVisits";
    pub const TIME_SPENT: &str = "timeSpent";
    pub const LEAD_TYPE: &str = "leadType";
    pub const DOMAIN: &str = "domain";
    pub const FUNNEL_STATUS: &str = "funnelStatus";
    pub const REGION: &str = "region";
    pub const SEARCH_QUERY: &str = "searchQuery";
}

/// What a range facet measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeAxis {
    /// Calendar dates, resolved to unix seconds
    Date,
    /// Wall-clock times of day, resolved to `HH:mm` strings
    Time,
}

/// Selection mode of a facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    /// Mutually exclusive presets OR one custom range
    PresetOrRange(RangeAxis),
    /// Any subset of a fixed option list, shown as checkboxes
    MultiCheckbox,
    /// Any subset of a fixed option list, shown as buttons
    MultiToggleButton,
    /// Arbitrary user-entered strings, in insertion order
    FreeTagList,
    /// A single free-text string with no chip representation
    FreeText,
}

impl FacetKind {
    /// Whether options of this kind come from a fixed list
    #[must_use]
    pub const fn is_enumerable(self) -> bool {
        matches!(
            self,
            Self::PresetOrRange(_) | Self::MultiCheckbox | Self::MultiToggleButton
        )
    }

    /// Whether this kind selects any subset of its options
    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        matches!(self, Self::MultiCheckbox | Self::MultiToggleButton)
    }
}

/// One selectable option of an enumerable facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Name used in state and payloads
    pub internal_name: String,
    /// Label shown on controls and chips
    pub display_label: String,
}

impl FacetOption {
    #[must_use]
    pub fn new(internal_name: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            display_label: display_label.into(),
        }
    }
}

/// A filterable dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Stable identifier, e.g. `visitedDate`
    pub key: &'static str,
    /// Human-readable facet title
    pub title: &'static str,
    pub kind: FacetKind,
    /// Ordered options; empty for free-form kinds
    pub options: Vec<FacetOption>,
}

impl Facet {
    #[must_use]
    pub const fn new(
        key: &'static str,
        title: &'static str,
        kind: FacetKind,
        options: Vec<FacetOption>,
    ) -> Self {
        Self {
            key,
            title,
            kind,
            options,
        }
    }

    /// True only for preset-or-range facets
    #[must_use]
    pub const fn is_mutually_exclusive(&self) -> bool {
        matches!(self.kind, FacetKind::PresetOrRange(_))
    }

    /// Look up an option by internal name
    #[must_use]
    pub fn option(&self, internal_name: &str) -> Option<&FacetOption> {
        self.options.iter().find(|o| o.internal_name == internal_name)
    }

    /// Look up an option by display label
    #[must_use]
    pub fn option_by_label(&self, label: &str) -> Option<&FacetOption> {
        self.options.iter().find(|o| o.display_label == label)
    }

    /// Resolve user input to an option, accepting either the internal name or the label
    #[must_use]
    pub fn find_option(&self, input: &str) -> Option<&FacetOption> {
        self.option(input).or_else(|| self.option_by_label(input))
    }

    /// Position of an option in display order
    #[must_use]
    pub fn option_index(&self, internal_name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.internal_name == internal_name)
    }
}
