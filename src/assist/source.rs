//! Suggestion sources
//!
//! The lead service exposes two prefix lookups:
//!
//! - `GET /leads/search-location?start_letter=<q>` returns `[{city, state}]`
//! - `GET /leads/search-contact?start_letter=<q>` returns `[name]`
//!
//! Both are best-effort and non-authoritative.

use super::error::AssistError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use url::Url;

const LOCATION_PATH: &str = "leads/search-location";
const CONTACT_PATH: &str = "leads/search-contact";
const QUERY_PARAM: &str = "start_letter";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A region suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl Location {
    #[must_use]
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }

    /// Text of the region tag created when this suggestion is picked
    #[must_use]
    pub fn tag_text(&self) -> String {
        let city = self.city.trim();
        let state = self.state.trim();
        if state.is_empty() {
            city.to_string()
        } else {
            format!("{city}, {state}")
        }
    }
}

/// Backend for autocomplete lookups
pub trait SuggestionSource: Send + Sync + 'static {
    /// Cities whose name starts with `query`
    fn search_locations(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Location>, AssistError>> + Send;

    /// Contact names starting with `query`
    fn search_contacts(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, AssistError>> + Send;
}

/// Suggestion source calling the lead service over HTTP
#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSuggestionSource {
    /// Create a source for the service rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `AssistError` if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, AssistError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    /// Full lookup URL for `path` and `query`
    ///
    /// # Errors
    ///
    /// Returns `AssistError::InvalidUrl` if `path` cannot be joined onto the base.
    pub fn endpoint(&self, path: &str, query: &str) -> Result<Url, AssistError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut().append_pair(QUERY_PARAM, query);
        Ok(url)
    }

    async fn fetch<T>(&self, path: &str, query: &str) -> Result<T, AssistError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path, query)?;
        let items = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(items)
    }
}

impl SuggestionSource for HttpSuggestionSource {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, AssistError> {
        self.fetch(LOCATION_PATH, query).await
    }

    async fn search_contacts(&self, query: &str) -> Result<Vec<String>, AssistError> {
        self.fetch(CONTACT_PATH, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_builds_query() {
        let source = HttpSuggestionSource::new("https://api.example.com/v1").unwrap();
        let url = source.endpoint(LOCATION_PATH, "san fr").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/leads/search-location?start_letter=san+fr"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let source = HttpSuggestionSource::new("https://api.example.com/").unwrap();
        let url = source.endpoint(CONTACT_PATH, "jan").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/leads/search-contact?start_letter=jan");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpSuggestionSource::new("::nope::"),
            Err(AssistError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_location_tag_text() {
        assert_eq!(Location::new("Berlin", "BE").tag_text(), "Berlin, BE");
        assert_eq!(Location::new(" Paris ", "").tag_text(), "Paris");
    }

    #[test]
    fn test_location_without_state_deserializes() {
        let location: Location = serde_json::from_str(r#"{"city": "Oslo"}"#).unwrap();
        assert_eq!(location, Location::new("Oslo", ""));
    }
}
