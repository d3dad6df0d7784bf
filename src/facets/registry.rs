//! Static facet catalog
//!
//! The registry is built once at startup and never mutated afterwards. The
//! only runtime input is the list of domains the account tracks, which
//! becomes the option list of the `domain` facet.

use super::types::{Facet, FacetKind, FacetOption, RangeAxis, keys};

/// Preset option names shared by the resolver and the catalog
pub mod presets {
    pub const TODAY: &str = "today";
    pub const LAST_7_DAYS: &str = "last7Days";
    pub const LAST_30_DAYS: &str = "last30Days";
    pub const LAST_6_MONTHS: &str = "last6Months";

    pub const MORNING: &str = "morning";
    pub const AFTERNOON: &str = "afternoon";
    pub const EVENING: &str = "evening";
    pub const ALL_DAY: &str = "all_day";
}

/// Ordered, immutable catalog of facets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetRegistry {
    facets: Vec<Facet>,
}

impl FacetRegistry {
    /// Build the catalog with the given domain options
    ///
    /// Blank and repeated domains are skipped; the first occurrence keeps its position.
    #[must_use]
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domain_options: Vec<FacetOption> = Vec::new();
        for domain in domains {
            let domain = domain.as_ref().trim();
            if domain.is_empty() || domain_options.iter().any(|o| o.internal_name == domain) {
                continue;
            }
            domain_options.push(FacetOption::new(domain, domain));
        }

        let facets = vec![
            Facet::new(
                keys::VISITED_DATE,
                "Visited date",
                FacetKind::PresetOrRange(RangeAxis::Date),
                vec![
                    FacetOption::new(presets::TODAY, "Today"),
                    FacetOption::new(presets::LAST_7_DAYS, "Last 7 days"),
                    FacetOption::new(presets::LAST_30_DAYS, "Last 30 days"),
                    FacetOption::new(presets::LAST_6_MONTHS, "Last 6 months"),
                ],
            ),
            Facet::new(
                keys::VISITED_TIME,
                "Visited time",
                FacetKind::PresetOrRange(RangeAxis::Time),
                vec![
                    FacetOption::new(presets::MORNING, "Morning"),
                    FacetOption::new(presets::AFTERNOON, "Afternoon"),
                    FacetOption::new(presets::EVENING, "Evening"),
                    FacetOption::new(presets::ALL_DAY, "All day"),
                ],
            ),
            Facet::new(
                keys::PAGE_VISITS,
                "Page visits",
                FacetKind::MultiCheckbox,
                vec![
                    FacetOption::new("page_1", "1 page"),
                    FacetOption::new("page_2", "2 pages"),
                    FacetOption::new("page_3", "3 pages"),
                    FacetOption::new("page_4_plus", "More than 3 pages"),
                ],
            ),
            Facet::new(
                keys::TIME_SPENT,
                "Time spent",
                FacetKind::MultiCheckbox,
                vec![
                    FacetOption::new("under_10_secs", "Under 10 secs"),
                    FacetOption::new("10_to_30_secs", "10 - 30 secs"),
                    FacetOption::new("30_to_60_secs", "30 - 60 secs"),
                    FacetOption::new("over_1_min", "Over 1 min"),
                ],
            ),
            Facet::new(
                keys::LEAD_TYPE,
                "Lead type",
                FacetKind::MultiCheckbox,
                vec![
                    FacetOption::new("visitor", "Visitor"),
                    FacetOption::new("viewed_product", "Viewed product"),
                    FacetOption::new("abandoned_cart", "Abandoned cart"),
                    FacetOption::new("converted_sale", "Converted sale"),
                ],
            ),
            Facet::new(keys::DOMAIN, "Domain", FacetKind::MultiCheckbox, domain_options),
            Facet::new(
                keys::FUNNEL_STATUS,
                "Funnel status",
                FacetKind::MultiToggleButton,
                ["New", "Contacted", "Qualified", "Won", "Lost"]
                    .into_iter()
                    .map(|label| FacetOption::new(label, label))
                    .collect(),
            ),
            Facet::new(keys::REGION, "Region", FacetKind::FreeTagList, Vec::new()),
            Facet::new(keys::SEARCH_QUERY, "Search", FacetKind::FreeText, Vec::new()),
        ];

        Self { facets }
    }

    /// Get a facet by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.key == key)
    }

    /// All facets in display order
    #[must_use]
    pub fn all(&self) -> &[Facet] {
        &self.facets
    }

    /// Facet keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.facets.iter().map(|f| f.key)
    }
}

impl Default for FacetRegistry {
    /// Catalog without any tracked domains
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}
