//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for leadfilter using the `clap` crate.
//! Every command operates on one filter session, selected with `--session`
//! (or `LEADFILTER_SESSION`).
//!
//! # Commands
//!
//! - **show**: Print the active chips of the session (default)
//! - **facets**: List every facet and its options
//! - **apply**: Change selections, then apply and print the payload
//! - **clear**: Clear all filters of the session
//! - **suggest**: Look up region or contact suggestions
//! - **end-session**: Delete everything stored for the session
//!
//! # Examples
//!
//! ```
//! use leadfilter::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["leadfilter", "apply", "--set", "leadType=visitor"]);
//! if let Commands::Apply(args) = cli.get_command() {
//!     assert_eq!(args.set[0].facet, "leadType");
//! }
//! ```

use crate::LeadFilterError;
use crate::engine::state::{DATE_FORMAT, TIME_FORMAT};
use crate::engine::{Bounds, FilterEngine, Selection};
use crate::facets::{Facet, FacetRegistry, keys};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

/// Session used when none is given
pub const DEFAULT_SESSION: &str = "default";

/// `facet=value` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub facet: String,
    pub value: String,
}

/// Parse `facet=value`
///
/// # Errors
///
/// Returns an error message if there is no `=` or either side is blank.
///
/// # Examples
///
/// ```
/// use leadfilter::cli::parse_assignment;
///
/// let assignment = parse_assignment("region=Berlin, BE").unwrap();
/// assert_eq!(assignment.facet, "region");
/// assert_eq!(assignment.value, "Berlin, BE");
/// ```
pub fn parse_assignment(input: &str) -> Result<Assignment, String> {
    let (facet, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected FACET=VALUE, got '{input}'"))?;
    let facet = facet.trim();
    let value = value.trim();
    if facet.is_empty() || value.is_empty() {
        return Err(format!("expected FACET=VALUE, got '{input}'"));
    }
    Ok(Assignment {
        facet: facet.to_string(),
        value: value.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` date
///
/// # Errors
///
/// Returns an error message if the date is malformed.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| format!("invalid date '{input}': {e}"))
}

/// Parse an `HH:mm` time
///
/// # Errors
///
/// Returns an error message if the time is malformed.
pub fn parse_time(input: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
        .map_err(|e| format!("invalid time '{input}': {e}"))
}

/// Autocomplete field to query
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestField {
    /// City suggestions for the region facet
    Region,
    /// Contact names for the search query
    Contact,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "leadfilter")]
#[command(about = "Faceted filters for lead lists", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter session to operate on
    #[arg(
        short = 's',
        long = "session",
        global = true,
        env = "LEADFILTER_SESSION",
        default_value = DEFAULT_SESSION
    )]
    pub session: String,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the active chips of the session (default)
    #[command(visible_alias = "s")]
    Show {
        /// Print the payload instead of chips
        #[arg(long = "json")]
        json: bool,
    },

    /// List facets and their options
    #[command(visible_alias = "f")]
    Facets,

    /// Change selections, then apply and print the payload
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Clear all filters of the session
    Clear,

    /// Look up autocomplete suggestions
    Suggest {
        /// Field to query
        #[arg(value_enum)]
        field: SuggestField,

        /// Text typed so far
        query: String,

        /// Pick the suggestion at this index and apply it
        #[arg(short = 'p', long = "pick", value_name = "INDEX")]
        pick: Option<usize>,
    },

    /// Delete everything stored for the session
    #[command(name = "end-session")]
    EndSession,
}

/// Arguments of the apply command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyArgs {
    /// Select an option, preset or tag (repeatable: --set leadType=visitor)
    #[arg(long = "set", value_name = "FACET=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Remove a chip by its label (repeatable: --unset region=Berlin)
    #[arg(long = "unset", value_name = "FACET=LABEL", value_parser = parse_assignment)]
    pub unset: Vec<Assignment>,

    /// Start of a custom visited-date range (YYYY-MM-DD)
    #[arg(long = "date-from", value_name = "DATE", value_parser = parse_date)]
    pub date_from: Option<NaiveDate>,

    /// End of a custom visited-date range (YYYY-MM-DD)
    #[arg(long = "date-to", value_name = "DATE", value_parser = parse_date)]
    pub date_to: Option<NaiveDate>,

    /// Start of a custom visited-time range (HH:mm)
    #[arg(long = "time-from", value_name = "TIME", value_parser = parse_time)]
    pub time_from: Option<NaiveTime>,

    /// End of a custom visited-time range (HH:mm)
    #[arg(long = "time-to", value_name = "TIME", value_parser = parse_time)]
    pub time_to: Option<NaiveTime>,

    /// Overwrite the search query
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,
}

impl ApplyArgs {
    /// Whether a custom date bound was given
    #[must_use]
    pub const fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Whether a custom time bound was given
    #[must_use]
    pub const fn has_time_range(&self) -> bool {
        self.time_from.is_some() || self.time_to.is_some()
    }

    /// Apply the requested changes to `engine`
    ///
    /// Removals run first, then selections. Removing a chip that is not
    /// shown is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown facet, or for a value that is
    /// not an option of an enumerable facet.
    pub fn apply_to(&self, engine: &mut FilterEngine<'_>) -> Result<(), LeadFilterError> {
        let registry = engine.registry();

        for assignment in &self.unset {
            let facet = known_facet(registry, &assignment.facet)?;
            if !engine.remove_tag(facet.key, &assignment.value) {
                debug!(facet = facet.key, label = %assignment.value, "no chip to remove");
            }
        }

        for assignment in &self.set {
            let facet = known_facet(registry, &assignment.facet)?;
            if facet.kind.is_enumerable() && facet.find_option(&assignment.value).is_none() {
                return Err(LeadFilterError::InvalidInput(format!(
                    "'{}' is not an option of facet '{}'",
                    assignment.value, facet.key
                )));
            }
            if !engine.select(facet.key, Selection::for_facet(facet, &assignment.value)) {
                debug!(facet = facet.key, value = %assignment.value, "selection already active");
            }
        }

        if self.has_date_range() {
            let bounds = Bounds::new(self.date_from, self.date_to);
            engine.select(keys::VISITED_DATE, Selection::DateRange(bounds));
        }
        if self.has_time_range() {
            let bounds = Bounds::new(self.time_from, self.time_to);
            engine.select(keys::VISITED_TIME, Selection::TimeRange(bounds));
        }
        if let Some(query) = &self.query {
            engine.select(keys::SEARCH_QUERY, Selection::Text(query.clone()));
        }

        Ok(())
    }
}

fn known_facet<'r>(registry: &'r FacetRegistry, key: &str) -> Result<&'r Facet, LeadFilterError> {
    registry
        .get(key)
        .ok_or_else(|| LeadFilterError::InvalidInput(format!("unknown facet '{key}'")))
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to `show` if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Show { json: false })
    }
}
