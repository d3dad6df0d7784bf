//! Filter engine
//!
//! Owns one `FacetState` per registered facet and the chips derived from it.
//! Every mutation goes through `select`, `toggle`, `remove_tag` or
//! `clear_all`; after a facet changes, only that facet's chips are
//! re-rendered.
//!
//! ```
//! use leadfilter::engine::{FilterEngine, Selection};
//! use leadfilter::facets::{FacetRegistry, keys};
//!
//! let registry = FacetRegistry::default();
//! let mut engine = FilterEngine::new(&registry);
//!
//! engine.select(keys::VISITED_DATE, Selection::Preset("last7Days".into()));
//! engine.select(keys::PAGE_VISITS, Selection::Option("page_2".into()));
//! assert_eq!(engine.all_tags().len(), 2);
//!
//! engine.remove_tag(keys::PAGE_VISITS, "2 pages");
//! assert_eq!(engine.all_tags().len(), 1);
//! ```

pub mod state;
pub mod tags;

pub use state::{Bounds, CustomRange, FacetState, RangeState, Selection};
pub use tags::{Tag, TagRemoval, render_tags};

use crate::facets::{Facet, FacetKind, FacetRegistry, RangeAxis};
use std::collections::HashMap;
use tracing::debug;

/// Facet state and chips for one filter drawer
#[derive(Debug, Clone)]
pub struct FilterEngine<'r> {
    registry: &'r FacetRegistry,
    states: HashMap<&'static str, FacetState>,
    tags: HashMap<&'static str, Vec<Tag>>,
}

impl<'r> FilterEngine<'r> {
    /// Create an engine with every facet empty
    #[must_use]
    pub fn new(registry: &'r FacetRegistry) -> Self {
        let states = registry
            .all()
            .iter()
            .map(|facet| (facet.key, FacetState::empty_for(facet.kind)))
            .collect();
        let tags = registry.keys().map(|key| (key, Vec::new())).collect();

        Self {
            registry,
            states,
            tags,
        }
    }

    /// The catalog this engine was built from
    #[must_use]
    pub const fn registry(&self) -> &'r FacetRegistry {
        self.registry
    }

    /// Current state of a facet
    #[must_use]
    pub fn state(&self, key: &str) -> Option<&FacetState> {
        self.states.get(key)
    }

    /// Range state of a preset-or-range facet
    #[must_use]
    pub fn range(&self, key: &str) -> Option<&RangeState> {
        self.state(key).and_then(FacetState::as_range)
    }

    /// Selected option names of a multi-select facet, in option order
    #[must_use]
    pub fn selected(&self, key: &str) -> Vec<&str> {
        let (Some(facet), Some(FacetState::Multi(selected))) =
            (self.registry.get(key), self.state(key))
        else {
            return Vec::new();
        };
        facet
            .options
            .iter()
            .filter(|option| selected.contains(&option.internal_name))
            .map(|option| option.internal_name.as_str())
            .collect()
    }

    /// Free tags of a tag-list facet, in insertion order
    #[must_use]
    pub fn tag_list(&self, key: &str) -> &[String] {
        self.state(key).and_then(FacetState::as_tag_list).unwrap_or_default()
    }

    /// Value of a free-text facet
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.state(key).and_then(FacetState::as_text).unwrap_or_default()
    }

    /// Chips of one facet
    #[must_use]
    pub fn tags(&self, key: &str) -> &[Tag] {
        self.tags.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// All chips, facets in registry order
    #[must_use]
    pub fn all_tags(&self) -> Vec<&Tag> {
        self.registry.keys().flat_map(|key| self.tags(key)).collect()
    }

    /// True when no facet has a selection
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.values().all(FacetState::is_empty)
    }

    /// Apply a selection to a facet
    ///
    /// Returns `true` if the facet changed. Unknown facets, unknown options,
    /// selections that do not fit the facet's kind, and duplicate or blank free
    /// tags leave the engine untouched.
    pub fn select(&mut self, key: &str, selection: Selection) -> bool {
        let registry = self.registry;
        let Some(facet) = registry.get(key) else {
            debug!(facet = key, "ignoring selection for unknown facet");
            return false;
        };
        let Some(state) = self.states.get_mut(facet.key) else {
            return false;
        };

        let changed = match (facet.kind, state, selection) {
            (FacetKind::PresetOrRange(_), FacetState::Range(range), Selection::Preset(input)) => {
                facet
                    .find_option(&input)
                    .is_some_and(|option| range.select_preset(option.internal_name.clone()))
            }
            (
                FacetKind::PresetOrRange(RangeAxis::Date),
                FacetState::Range(range),
                Selection::DateRange(bounds),
            ) => range.set_custom(CustomRange::Dates(bounds)),
            (
                FacetKind::PresetOrRange(RangeAxis::Time),
                FacetState::Range(range),
                Selection::TimeRange(bounds),
            ) => range.set_custom(CustomRange::Times(bounds)),
            (_, FacetState::Multi(selected), Selection::Option(input)) => facet
                .find_option(&input)
                .is_some_and(|option| selected.insert(option.internal_name.clone())),
            (_, FacetState::TagList(tags), Selection::Tag(text)) => push_free_tag(tags, &text),
            (_, FacetState::Text(value), Selection::Text(text)) => {
                if *value == text {
                    false
                } else {
                    *value = text;
                    true
                }
            }
            (_, _, selection) => {
                debug!(facet = facet.key, ?selection, "selection does not apply to facet");
                false
            }
        };

        if changed {
            self.resync(facet);
        }
        changed
    }

    /// Check an unchecked option or uncheck a checked one
    pub fn toggle(&mut self, key: &str, option: &str) -> bool {
        let registry = self.registry;
        let Some(facet) = registry.get(key) else {
            return false;
        };
        let Some(name) = facet.find_option(option).map(|o| o.internal_name.clone()) else {
            return false;
        };
        let Some(FacetState::Multi(selected)) = self.states.get_mut(facet.key) else {
            return false;
        };

        if !selected.remove(&name) {
            selected.insert(name);
        }
        self.resync(facet);
        true
    }

    /// Remove the chip with the given label
    ///
    /// Clears exactly the part of the facet's state the chip stands for. For
    /// range facets that is the preset together with the picker values.
    /// Removing a chip that does not exist is a no-op returning `false`.
    pub fn remove_tag(&mut self, key: &str, label: &str) -> bool {
        let registry = self.registry;
        let Some(facet) = registry.get(key) else {
            return false;
        };
        let Some(action) = self
            .tags(facet.key)
            .iter()
            .find(|tag| tag.display_label == label)
            .map(|tag| tag.remove_action.clone())
        else {
            debug!(facet = facet.key, label, "no chip to remove");
            return false;
        };
        let Some(state) = self.states.get_mut(facet.key) else {
            return false;
        };

        let changed = match (state, action) {
            (FacetState::Range(range), TagRemoval::ClearRange) => range.clear(),
            (FacetState::Multi(selected), TagRemoval::Deselect(name)) => selected.remove(&name),
            (FacetState::TagList(tags), TagRemoval::DropTag(text)) => {
                let before = tags.len();
                tags.retain(|t| *t != text);
                tags.len() != before
            }
            _ => false,
        };

        if changed {
            self.resync(facet);
        }
        changed
    }

    /// Reset every facet to its empty state and drop every chip
    pub fn clear_all(&mut self) {
        for facet in self.registry.all() {
            self.states.insert(facet.key, FacetState::empty_for(facet.kind));
            self.tags.insert(facet.key, Vec::new());
        }
    }

    fn resync(&mut self, facet: &Facet) {
        let rendered = self
            .states
            .get(facet.key)
            .map(|state| render_tags(facet, state))
            .unwrap_or_default();
        self.tags.insert(facet.key, rendered);
    }
}

impl PartialEq for FilterEngine<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.registry == other.registry && self.states == other.states && self.tags == other.tags
    }
}

fn push_free_tag(tags: &mut Vec<String>, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || tags.iter().any(|t| t == text) {
        return false;
    }
    tags.push(text.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::keys;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn labels<'a>(engine: &'a FilterEngine<'_>, key: &str) -> Vec<&'a str> {
        engine.tags(key).iter().map(|t| t.display_label.as_str()).collect()
    }

    #[test]
    fn test_new_engine_is_empty() {
        let registry = FacetRegistry::default();
        let engine = FilterEngine::new(&registry);
        assert!(engine.is_empty());
        assert!(engine.all_tags().is_empty());
    }

    #[test]
    fn test_preset_replaces_previous_range_chip() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        engine.select(
            keys::VISITED_DATE,
            Selection::DateRange(Bounds::new(Some(date(2024, 3, 1)), Some(date(2024, 3, 5)))),
        );
        assert_eq!(labels(&engine, keys::VISITED_DATE), vec!["2024-03-01 to 2024-03-05"]);

        engine.select(keys::VISITED_DATE, Selection::Preset("today".into()));
        assert_eq!(labels(&engine, keys::VISITED_DATE), vec!["Today"]);
        assert!(engine.range(keys::VISITED_DATE).unwrap().custom().is_none());

        engine.select(keys::VISITED_DATE, Selection::Preset("Last 6 months".into()));
        assert_eq!(labels(&engine, keys::VISITED_DATE), vec!["Last 6 months"]);
    }

    #[test]
    fn test_custom_range_clears_preset() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        engine.select(keys::VISITED_TIME, Selection::Preset("evening".into()));
        engine.select(
            keys::VISITED_TIME,
            Selection::TimeRange(Bounds::new(
                NaiveTime::from_hms_opt(8, 0, 0),
                NaiveTime::from_hms_opt(9, 30, 0),
            )),
        );

        let range = engine.range(keys::VISITED_TIME).unwrap();
        assert!(range.preset().is_none());
        assert_eq!(labels(&engine, keys::VISITED_TIME), vec!["08:00 to 09:30"]);
    }

    #[test]
    fn test_axis_mismatch_is_ignored() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        let changed = engine.select(
            keys::VISITED_TIME,
            Selection::DateRange(Bounds::new(Some(date(2024, 1, 1)), None)),
        );
        assert!(!changed);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_range_chip_removal_clears_picker_values() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        let bounds = Bounds::new(Some(date(2024, 2, 1)), None);
        engine.select(keys::VISITED_DATE, Selection::DateRange(bounds));
        assert!(engine.remove_tag(keys::VISITED_DATE, "From 2024-02-01"));

        let range = engine.range(keys::VISITED_DATE).unwrap();
        assert!(range.is_empty());
        assert!(engine.tags(keys::VISITED_DATE).is_empty());
    }

    #[test]
    fn test_multi_checkbox_tag_count_matches_selection() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        for option in ["page_3", "page_1", "2 pages", "page_1"] {
            engine.select(keys::PAGE_VISITS, Selection::Option(option.into()));
        }
        assert_eq!(engine.selected(keys::PAGE_VISITS), vec!["page_1", "page_2", "page_3"]);
        assert_eq!(engine.tags(keys::PAGE_VISITS).len(), 3);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        assert!(!engine.select(keys::LEAD_TYPE, Selection::Option("whale".into())));
        assert!(!engine.select(keys::VISITED_DATE, Selection::Preset("yesterday".into())));
        assert!(!engine.select("nonexistent", Selection::Text("x".into())));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_removal_isolated_to_one_facet() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        engine.select(keys::PAGE_VISITS, Selection::Option("page_1".into()));
        engine.select(keys::TIME_SPENT, Selection::Option("over_1_min".into()));
        engine.select(keys::TIME_SPENT, Selection::Option("under_10_secs".into()));
        let time_spent_before = engine.tags(keys::TIME_SPENT).to_vec();

        assert!(engine.remove_tag(keys::PAGE_VISITS, "1 page"));
        assert!(engine.tags(keys::PAGE_VISITS).is_empty());
        assert_eq!(engine.tags(keys::TIME_SPENT), time_spent_before.as_slice());
    }

    #[test]
    fn test_remove_missing_tag_is_noop() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        engine.select(keys::REGION, Selection::Tag("Berlin".into()));
        let before = engine.clone();
        assert!(!engine.remove_tag(keys::REGION, "Paris"));
        assert!(!engine.remove_tag(keys::LEAD_TYPE, "Visitor"));
        assert!(!engine.remove_tag("nonexistent", "Berlin"));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_free_tags_keep_order_and_reject_duplicates() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        assert!(engine.select(keys::REGION, Selection::Tag("Munich".into())));
        assert!(engine.select(keys::REGION, Selection::Tag(" Berlin ".into())));
        assert!(!engine.select(keys::REGION, Selection::Tag("Berlin".into())));
        assert!(!engine.select(keys::REGION, Selection::Tag("   ".into())));

        assert_eq!(engine.tag_list(keys::REGION), ["Munich", "Berlin"]);
        assert!(engine.remove_tag(keys::REGION, "Munich"));
        assert_eq!(labels(&engine, keys::REGION), vec!["Berlin"]);
    }

    #[test]
    fn test_toggle_button_facet() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        assert!(engine.toggle(keys::FUNNEL_STATUS, "Won"));
        assert!(engine.toggle(keys::FUNNEL_STATUS, "New"));
        assert_eq!(labels(&engine, keys::FUNNEL_STATUS), vec!["New", "Won"]);
        assert!(engine.toggle(keys::FUNNEL_STATUS, "Won"));
        assert_eq!(labels(&engine, keys::FUNNEL_STATUS), vec!["New"]);
        assert!(!engine.toggle(keys::REGION, "New"));
    }

    #[test]
    fn test_search_text_has_no_chip() {
        let registry = FacetRegistry::default();
        let mut engine = FilterEngine::new(&registry);

        assert!(engine.select(keys::SEARCH_QUERY, Selection::Text("acme".into())));
        assert!(!engine.select(keys::SEARCH_QUERY, Selection::Text("acme".into())));
        assert_eq!(engine.text(keys::SEARCH_QUERY), "acme");
        assert!(engine.tags(keys::SEARCH_QUERY).is_empty());
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let registry = FacetRegistry::new(["shop.example"]);
        let mut engine = FilterEngine::new(&registry);

        engine.select(keys::VISITED_DATE, Selection::Preset("today".into()));
        engine.select(keys::DOMAIN, Selection::Option("shop.example".into()));
        engine.select(keys::SEARCH_QUERY, Selection::Text("jane".into()));

        engine.clear_all();
        let once = engine.clone();
        engine.clear_all();

        assert_eq!(engine, once);
        assert_eq!(engine, FilterEngine::new(&registry));
    }

    #[test]
    fn test_tags_are_projection_of_state() {
        let registry = FacetRegistry::new(["a.example", "b.example"]);
        let mut engine = FilterEngine::new(&registry);

        engine.select(keys::DOMAIN, Selection::Option("b.example".into()));
        engine.select(keys::VISITED_DATE, Selection::Preset("last30Days".into()));
        engine.toggle(keys::DOMAIN, "a.example");
        engine.remove_tag(keys::DOMAIN, "b.example");
        engine.select(keys::REGION, Selection::Tag("Hamburg".into()));
        let bounds = Bounds::new(None, Some(date(2024, 5, 1)));
        engine.select(keys::VISITED_DATE, Selection::DateRange(bounds));

        for facet in registry.all() {
            let state = engine.state(facet.key).unwrap();
            assert_eq!(engine.tags(facet.key), render_tags(facet, state).as_slice());
        }
    }
}
