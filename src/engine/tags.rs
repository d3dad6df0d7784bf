//! Chip rendering
//!
//! A `Tag` is the chip shown for part of a facet's active selection. Tags are
//! never edited directly: `render_tags` derives them from `FacetState`, and
//! each carries the mutation that removes exactly the part it represents.

use super::state::{CustomRange, FacetState, RangeState};
use crate::facets::Facet;

/// Mutation that undoes the selection a chip stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRemoval {
    /// Clear the preset and the custom range of a range facet
    ClearRange,
    /// Uncheck one option of a multi-select facet
    Deselect(String),
    /// Drop one free tag
    DropTag(String),
}

/// A user-facing chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub facet_key: &'static str,
    pub display_label: String,
    pub remove_action: TagRemoval,
}

impl Tag {
    fn new(facet: &Facet, display_label: impl Into<String>, remove_action: TagRemoval) -> Self {
        Self {
            facet_key: facet.key,
            display_label: display_label.into(),
            remove_action,
        }
    }
}

/// Render the chips of one facet
///
/// Deterministic: equal states always render equal chip lists. Multi-select
/// chips follow option order, free tags follow insertion order, range facets
/// render at most one chip and free text renders none.
#[must_use]
pub fn render_tags(facet: &Facet, state: &FacetState) -> Vec<Tag> {
    match state {
        FacetState::Range(range) => range_label(facet, range)
            .map(|label| vec![Tag::new(facet, label, TagRemoval::ClearRange)])
            .unwrap_or_default(),
        FacetState::Multi(selected) => facet
            .options
            .iter()
            .filter(|option| selected.contains(&option.internal_name))
            .map(|option| {
                Tag::new(
                    facet,
                    option.display_label.clone(),
                    TagRemoval::Deselect(option.internal_name.clone()),
                )
            })
            .collect(),
        FacetState::TagList(tags) => tags
            .iter()
            .map(|text| Tag::new(facet, text.clone(), TagRemoval::DropTag(text.clone())))
            .collect(),
        FacetState::Text(_) => Vec::new(),
    }
}

fn range_label(facet: &Facet, range: &RangeState) -> Option<String> {
    if let Some(preset) = range.preset() {
        let label = facet
            .option(preset)
            .map_or_else(|| preset.to_string(), |option| option.display_label.clone());
        return Some(label);
    }
    range.custom().and_then(custom_label)
}

fn custom_label(custom: &CustomRange) -> Option<String> {
    match custom.formatted() {
        (Some(from), Some(to)) => Some(format!("{from} to {to}")),
        (Some(from), None) => Some(format!("From {from}")),
        (None, Some(to)) => Some(format!("Until {to}")),
        (None, None) => None,
    }
}
