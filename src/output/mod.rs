//! Output formatting for CLI display
//!
//! Renders chips, facets and suggestion lists for the terminal.

use crate::assist::Location;
use crate::engine::{FilterEngine, Tag};
use crate::facets::{Facet, FacetKind};
use colored::Colorize;

/// Format one chip
///
/// Quiet output is `facet=label`, suitable for feeding back into `--unset`.
#[must_use]
pub fn chip(tag: &Tag, quiet: bool) -> String {
    if quiet {
        format!("{}={}", tag.facet_key, tag.display_label)
    } else {
        format!("[{} ×]", tag.display_label).cyan().to_string()
    }
}

/// All chips of the engine, one line per facet that has any
#[must_use]
pub fn chip_lines(engine: &FilterEngine<'_>, quiet: bool) -> Vec<String> {
    if quiet {
        return engine.all_tags().into_iter().map(|tag| chip(tag, true)).collect();
    }

    engine
        .registry()
        .all()
        .iter()
        .filter_map(|facet| {
            let tags = engine.tags(facet.key);
            if tags.is_empty() {
                return None;
            }
            let chips: Vec<String> = tags.iter().map(|tag| chip(tag, false)).collect();
            Some(format!("  {}: {}", facet.title.bold(), chips.join(" ")))
        })
        .collect()
}

/// Describe a facet and its options
#[must_use]
pub fn facet_summary(facet: &Facet, quiet: bool) -> String {
    if quiet {
        return facet.key.to_string();
    }

    let mode = match facet.kind {
        FacetKind::PresetOrRange(_) => "preset or custom range",
        FacetKind::MultiCheckbox => "multi-select",
        FacetKind::MultiToggleButton => "toggle buttons",
        FacetKind::FreeTagList => "free tags",
        FacetKind::FreeText => "free text",
    };
    let mut summary = format!("{} ({}, {})", facet.key.blue().bold(), facet.title, mode.dimmed());
    for option in &facet.options {
        summary.push_str(&format!("\n    {} - {}", option.internal_name, option.display_label));
    }
    summary
}

/// Numbered suggestion list
#[must_use]
pub fn suggestion_lines<T, F>(items: &[T], quiet: bool, text: F) -> Vec<String>
where
    F: Fn(&T) -> String,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if quiet {
                text(item)
            } else {
                format!("  {} {}", format!("{i}.").dimmed(), text(item))
            }
        })
        .collect()
}

/// Text of a region suggestion
#[must_use]
pub fn location(location: &Location) -> String {
    location.tag_text()
}
