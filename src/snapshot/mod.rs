//! Snapshot codec
//!
//! `build` assembles the payload from engine state, resolving the two range
//! facets against "now". `restore` rebuilds an engine from a payload by
//! replaying each raw field as a live selection, so restored chips come out
//! of the same mutation path as chips the user created by hand.
//!
//! Resolved scalars are never read back. A restored preset is re-resolved on
//! the next build, so stale boundaries cannot survive a reload.

pub mod types;

pub use types::{FilterSnapshot, RawBounds};

use crate::engine::state::{DATE_FORMAT, TIME_FORMAT};
use crate::engine::{Bounds, FilterEngine, RangeState, Selection};
use crate::facets::{Facet, FacetKind, FacetRegistry, RangeAxis, keys};
use crate::resolver::{resolve_dates, resolve_times};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Assemble the payload for the engine's current state
#[must_use]
pub fn build<Tz: TimeZone>(engine: &FilterEngine<'_>, now: &DateTime<Tz>) -> FilterSnapshot {
    let registry = engine.registry();
    let empty = RangeState::default();
    let date = engine.range(keys::VISITED_DATE).unwrap_or(&empty);
    let time = engine.range(keys::VISITED_TIME).unwrap_or(&empty);
    let dates = resolve_dates(date, now);
    let times = resolve_times(time);

    FilterSnapshot {
        from_date: dates.from,
        to_date: dates.to,
        from_time: times.from,
        to_time: times.to,
        visited_date: preset_flags(registry.get(keys::VISITED_DATE), date),
        custom_date: raw_bounds(date),
        visited_time: preset_flags(registry.get(keys::VISITED_TIME), time),
        custom_time: raw_bounds(time),
        page_visits: owned(engine.selected(keys::PAGE_VISITS)),
        time_spent: owned(engine.selected(keys::TIME_SPENT)),
        lead_type: owned(engine.selected(keys::LEAD_TYPE)),
        domains: owned(engine.selected(keys::DOMAIN)),
        regions: engine.tag_list(keys::REGION).to_vec(),
        selected_funnels: selected_labels(engine, keys::FUNNEL_STATUS),
        search_query: engine.text(keys::SEARCH_QUERY).to_string(),
    }
}

/// Rebuild engine state from a payload
///
/// Unknown option names and malformed picker values are dropped.
#[must_use]
pub fn restore<'r>(snapshot: &FilterSnapshot, registry: &'r FacetRegistry) -> FilterEngine<'r> {
    let mut engine = FilterEngine::new(registry);

    for facet in registry.all() {
        match facet.kind {
            FacetKind::PresetOrRange(axis) => {
                if let Some(selection) = range_selection(facet, axis, snapshot) {
                    engine.select(facet.key, selection);
                }
            }
            FacetKind::MultiCheckbox | FacetKind::MultiToggleButton => {
                for name in list_field(snapshot, facet.key) {
                    if engine.select(facet.key, Selection::Option(name.clone())) {
                        continue;
                    }
                    if facet.find_option(name).is_none() {
                        warn!(
                            facet = facet.key,
                            option = %name,
                            "dropping unknown option from snapshot"
                        );
                    } else {
                        debug!(facet = facet.key, option = %name, "duplicate option in snapshot");
                    }
                }
            }
            FacetKind::FreeTagList => {
                for text in list_field(snapshot, facet.key) {
                    engine.select(facet.key, Selection::Tag(text.clone()));
                }
            }
            FacetKind::FreeText => {
                if facet.key == keys::SEARCH_QUERY && !snapshot.search_query.is_empty() {
                    engine.select(facet.key, Selection::Text(snapshot.search_query.clone()));
                }
            }
        }
    }

    engine
}

fn preset_flags(facet: Option<&Facet>, range: &RangeState) -> BTreeMap<String, bool> {
    facet
        .map(|facet| {
            facet
                .options
                .iter()
                .map(|option| {
                    let active = range.preset() == Some(option.internal_name.as_str());
                    (option.internal_name.clone(), active)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn raw_bounds(range: &RangeState) -> Option<RawBounds> {
    range.custom().map(|custom| {
        let (from, to) = custom.formatted();
        RawBounds { from, to }
    })
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

fn selected_labels(engine: &FilterEngine<'_>, key: &str) -> Vec<String> {
    let Some(facet) = engine.registry().get(key) else {
        return Vec::new();
    };
    engine
        .selected(key)
        .into_iter()
        .filter_map(|name| facet.option(name))
        .map(|option| option.display_label.clone())
        .collect()
}

fn list_field<'s>(snapshot: &'s FilterSnapshot, key: &str) -> &'s [String] {
    match key {
        keys::PAGE_VISITS => &snapshot.page_visits,
        keys::TIME_SPENT => &snapshot.time_spent,
        keys::LEAD_TYPE => &snapshot.lead_type,
        keys::DOMAIN => &snapshot.domains,
        keys::FUNNEL_STATUS => &snapshot.selected_funnels,
        keys::REGION => &snapshot.regions,
        _ => &[],
    }
}

/// Preset flags win; the first set flag in option order is taken
fn range_selection(facet: &Facet, axis: RangeAxis, snapshot: &FilterSnapshot) -> Option<Selection> {
    let (flags, custom) = match axis {
        RangeAxis::Date => (&snapshot.visited_date, snapshot.custom_date.as_ref()),
        RangeAxis::Time => (&snapshot.visited_time, snapshot.custom_time.as_ref()),
    };

    if let Some(option) = facet
        .options
        .iter()
        .find(|option| flags.get(&option.internal_name).copied().unwrap_or(false))
    {
        return Some(Selection::Preset(option.internal_name.clone()));
    }

    let raw = custom?;
    let selection = match axis {
        RangeAxis::Date => {
            let parse = |value: &Option<String>| {
                parse_bound(facet, value, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))
            };
            Selection::DateRange(Bounds::new(parse(&raw.from), parse(&raw.to)))
        }
        RangeAxis::Time => {
            let parse = |value: &Option<String>| {
                parse_bound(facet, value, |s| NaiveTime::parse_from_str(s, TIME_FORMAT))
            };
            Selection::TimeRange(Bounds::new(parse(&raw.from), parse(&raw.to)))
        }
    };
    Some(selection)
}

fn parse_bound<T, E>(
    facet: &Facet,
    value: &Option<String>,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Option<T> {
    let value = value.as_deref()?;
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(facet = facet.key, value, "dropping malformed range bound from snapshot");
            None
        }
    }
}
