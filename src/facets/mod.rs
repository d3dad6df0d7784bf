//! Facet registry
//!
//! Catalog of the filterable dimensions offered by the filter drawer and
//! their selection modes. Everything else in the crate looks facets up here.

pub mod registry;
pub mod types;

pub use registry::{FacetRegistry, presets};
pub use types::{Facet, FacetKind, FacetOption, RangeAxis, keys};
