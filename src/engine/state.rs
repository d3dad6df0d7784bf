//! Per-facet selection state
//!
//! `FacetState` is the only source of truth for what the user selected.
//! Chips and payloads are projections of it. Range facets keep their
//! preset and custom range behind setters so that at most one of the two
//! is ever set.

use crate::facets::{Facet, FacetKind};
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::collections::BTreeSet;

/// Display format for custom date bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Display format for custom time bounds
pub const TIME_FORMAT: &str = "%H:%M";

/// Optional lower/upper bound pair; a missing side is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds<T> {
    pub from: Option<T>,
    pub to: Option<T>,
}

impl<T> Bounds<T> {
    #[must_use]
    pub const fn new(from: Option<T>, to: Option<T>) -> Self {
        Self { from, to }
    }

    /// Neither side is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Raw picker values of a custom range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomRange {
    Dates(Bounds<NaiveDate>),
    Times(Bounds<NaiveTime>),
}

impl CustomRange {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Dates(bounds) => bounds.is_empty(),
            Self::Times(bounds) => bounds.is_empty(),
        }
    }

    /// Truncate time bounds to whole minutes, the precision of `TIME_FORMAT`
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Dates(_) => self,
            Self::Times(b) => {
                Self::Times(Bounds::new(b.from.map(whole_minute), b.to.map(whole_minute)))
            }
        }
    }

    /// Formatted `(from, to)` bounds as shown on controls
    #[must_use]
    pub fn formatted(&self) -> (Option<String>, Option<String>) {
        match self {
            Self::Dates(b) => (
                b.from.map(|d| d.format(DATE_FORMAT).to_string()),
                b.to.map(|d| d.format(DATE_FORMAT).to_string()),
            ),
            Self::Times(b) => (
                b.from.map(|t| t.format(TIME_FORMAT).to_string()),
                b.to.map(|t| t.format(TIME_FORMAT).to_string()),
            ),
        }
    }
}

fn whole_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// State of a preset-or-range facet
///
/// Selecting a preset clears the custom range and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeState {
    preset: Option<String>,
    custom: Option<CustomRange>,
}

impl RangeState {
    /// Selected preset, if any
    #[must_use]
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    /// Custom range picker values, if any
    #[must_use]
    pub const fn custom(&self) -> Option<&CustomRange> {
        self.custom.as_ref()
    }

    /// Select a preset, dropping any custom range
    ///
    /// Returns `true` if the state changed.
    pub fn select_preset(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.preset.as_deref() == Some(name.as_str()) && self.custom.is_none() {
            return false;
        }
        self.custom = None;
        self.preset = Some(name);
        true
    }

    /// Set the custom range, dropping any preset
    ///
    /// An empty range clears the facet. Times keep minute precision only.
    /// Returns `true` if the state changed.
    pub fn set_custom(&mut self, range: CustomRange) -> bool {
        let range = range.normalized();
        if range.is_empty() {
            return self.clear();
        }
        if self.custom == Some(range) && self.preset.is_none() {
            return false;
        }
        self.preset = None;
        self.custom = Some(range);
        true
    }

    /// Clear both the preset and the picker values
    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.preset = None;
        self.custom = None;
        changed
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.preset.is_none() && self.custom.is_none()
    }
}

/// Selection state of one facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetState {
    /// Preset-or-range facets
    Range(RangeState),
    /// Checkbox and toggle-button facets; rendered in option order
    Multi(BTreeSet<String>),
    /// Free tag list; insertion order is display order
    TagList(Vec<String>),
    /// Free text
    Text(String),
}

impl FacetState {
    /// Initial, empty state for a facet kind
    #[must_use]
    pub fn empty_for(kind: FacetKind) -> Self {
        match kind {
            FacetKind::PresetOrRange(_) => Self::Range(RangeState::default()),
            FacetKind::MultiCheckbox | FacetKind::MultiToggleButton => Self::Multi(BTreeSet::new()),
            FacetKind::FreeTagList => Self::TagList(Vec::new()),
            FacetKind::FreeText => Self::Text(String::new()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Range(range) => range.is_empty(),
            Self::Multi(selected) => selected.is_empty(),
            Self::TagList(tags) => tags.is_empty(),
            Self::Text(value) => value.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_range(&self) -> Option<&RangeState> {
        match self {
            Self::Range(range) => Some(range),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_multi(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Multi(selected) => Some(selected),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tag_list(&self) -> Option<&[String]> {
        match self {
            Self::TagList(tags) => Some(tags),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// A user interaction against one facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Pick a preset of a range facet (name or label)
    Preset(String),
    /// Replace the custom range of a date facet
    DateRange(Bounds<NaiveDate>),
    /// Replace the custom range of a time facet
    TimeRange(Bounds<NaiveTime>),
    /// Check an option of a multi-select facet (name or label)
    Option(String),
    /// Append a free tag
    Tag(String),
    /// Overwrite a free-text value
    Text(String),
}

impl Selection {
    /// Interpret a plain string value according to the facet's kind
    ///
    /// Ranges cannot be expressed as one value; for range facets the value is
    /// taken as a preset.
    #[must_use]
    pub fn for_facet(facet: &Facet, value: &str) -> Self {
        match facet.kind {
            FacetKind::PresetOrRange(_) => Self::Preset(value.to_string()),
            FacetKind::MultiCheckbox | FacetKind::MultiToggleButton => {
                Self::Option(value.to_string())
            }
            FacetKind::FreeTagList => Self::Tag(value.to_string()),
            FacetKind::FreeText => Self::Text(value.to_string()),
        }
    }
}
