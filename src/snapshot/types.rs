//! The filter payload
//!
//! `FilterSnapshot` is what the lead list receives on apply and what is
//! persisted for the session. Field names are part of the contract with the
//! list view and the backend query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw custom-range picker values, formatted as on the controls
///
/// Dates use `YYYY-MM-DD`, times use `HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawBounds {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Canonical, serializable state of every facet
///
/// The resolved scalars (`from_date`, `to_date`, `from_time`, `to_time`) are
/// derived output only. Restoring reads the raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSnapshot {
    /// Start of the visited-date window, unix seconds
    pub from_date: Option<i64>,
    /// End of the visited-date window, unix seconds (inclusive)
    pub to_date: Option<i64>,
    /// Start of the visited-time window, `HH:mm`
    pub from_time: Option<String>,
    /// End of the visited-time window, `HH:mm`
    pub to_time: Option<String>,

    /// One flag per date preset
    #[serde(default)]
    pub visited_date: BTreeMap<String, bool>,
    /// Custom date picker values
    #[serde(default)]
    pub custom_date: Option<RawBounds>,
    /// One flag per time preset
    #[serde(default)]
    pub visited_time: BTreeMap<String, bool>,
    /// Custom time picker values
    #[serde(default)]
    pub custom_time: Option<RawBounds>,

    #[serde(default)]
    pub page_visits: Vec<String>,
    #[serde(default)]
    pub time_spent: Vec<String>,
    #[serde(default)]
    pub lead_type: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    /// Free-form region tags, in the order they were added
    #[serde(default)]
    pub regions: Vec<String>,
    /// Labels of the selected funnel statuses
    #[serde(default)]
    pub selected_funnels: Vec<String>,
    #[serde(default)]
    pub search_query: String,
}

impl FilterSnapshot {
    /// Whether any preset flag of the date facet is set
    #[must_use]
    pub fn has_date_preset(&self) -> bool {
        self.visited_date.values().any(|flag| *flag)
    }

    /// Whether any preset flag of the time facet is set
    #[must_use]
    pub fn has_time_preset(&self) -> bool {
        self.visited_time.values().any(|flag| *flag)
    }
}
