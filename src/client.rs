//! The ORCID public API client.

use crate::error::{OrcidError, Result};
use crate::schema::SchemaVersion;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Async client for the ORCID public API.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> orcid_client::error::Result<()> {
/// let client = orcid_client::OrcidClient::new();
/// let author = client.author("0000-0002-1825-0097").await?;
/// println!("{}", author.full_name()?);
/// for work in author.publications(&client).await? {
///     println!("  {}", work);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OrcidClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) schema: SchemaVersion,
}

impl OrcidClient {
    /// Create a client for the default API version.
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let schema = SchemaVersion::default();
        Self {
            http,
            base_url: schema.base_url().to_string(),
            schema,
        }
    }

    /// Create a client configured from the environment.
    ///
    /// `ORCID_API_VERSION` selects the message version (`1.1` or `1.2`);
    /// `ORCID_BASE_URL` overrides the API root. Both are optional.
    pub fn from_env() -> Result<Self> {
        let mut client = Self::new();
        if let Ok(version) = std::env::var("ORCID_API_VERSION") {
            client = client.with_schema_version(version.parse()?);
        }
        if let Ok(base_url) = std::env::var("ORCID_BASE_URL") {
            if base_url.is_empty() {
                return Err(OrcidError::Config("ORCID_BASE_URL is empty".to_string()));
            }
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Select the message version. Also moves the base URL to that version's
    /// public endpoint unless it was overridden.
    pub fn with_schema_version(mut self, schema: SchemaVersion) -> Self {
        if self.base_url == self.schema.base_url() {
            self.base_url = schema.base_url().to_string();
        }
        self.schema = schema;
        self
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<url::Url> {
        let base = url::Url::parse(&self.base_url).map_err(|e| {
            OrcidError::Config(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        base.join(path)
            .map_err(|e| OrcidError::Config(format!("invalid request path {:?}: {}", path, e)))
    }

    /// URL of one resource of an ORCID record, e.g. `{base}{id}/orcid-works`.
    ///
    /// The iD is checked against the ORCID format and appended as a single
    /// escaped path segment, so it can never leave the base URL.
    pub(crate) fn record_endpoint(&self, orcid_id: &str, resource: &str) -> Result<url::Url> {
        if !is_orcid_id(orcid_id) {
            return Err(OrcidError::InvalidOrcidId(orcid_id.to_string()));
        }
        let mut url = self.endpoint("")?;
        url.path_segments_mut()
            .map_err(|_| {
                OrcidError::Config(format!("base URL {:?} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .push(orcid_id)
            .push(resource);
        Ok(url)
    }

    /// GET a JSON document from the API.
    pub(crate) async fn get_json(&self, url: url::Url, params: &[(&str, &str)]) -> Result<Value> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header("Accept", "application/orcid+json")
            .header("User-Agent", concat!("orcid-client/", env!("CARGO_PKG_VERSION")))
            .query(params)
            .send()
            .await?;

        let body = handle_response(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| OrcidError::Parse(format!("Invalid ORCID JSON: {}", e)))
    }
}

impl Default for OrcidClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `id` has the ORCID iD shape `dddd-dddd-dddd-dddX`.
pub fn is_orcid_id(id: &str) -> bool {
    let groups: Vec<&str> = id.split('-').collect();
    groups.len() == 4
        && groups.iter().enumerate().all(|(i, group)| {
            group.len() == 4
                && group.char_indices().all(|(j, c)| {
                    c.is_ascii_digit() || (i == 3 && j == 3 && c == 'X')
                })
        })
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        404 => Err(OrcidError::NotFound(response.url().path().to_string())),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(OrcidError::Api {
                status,
                message: body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = OrcidClient::new();
        assert_eq!(client.schema_version(), SchemaVersion::V1_2);
        assert_eq!(client.base_url(), "https://pub.orcid.org/v1.2/");
    }

    #[test]
    fn test_schema_version_moves_default_base_url() {
        let client = OrcidClient::new().with_schema_version(SchemaVersion::V1_1);
        assert_eq!(client.base_url(), "https://pub.orcid.org/v1.1/");

        let pinned = OrcidClient::new()
            .with_base_url("http://localhost:8080/api")
            .with_schema_version(SchemaVersion::V1_1);
        assert_eq!(pinned.base_url(), "http://localhost:8080/api/");
        assert_eq!(pinned.schema_version(), SchemaVersion::V1_1);
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let client = OrcidClient::new();
        assert_eq!(
            client.endpoint("0000-0002-1825-0097/orcid-profile").unwrap().as_str(),
            "https://pub.orcid.org/v1.2/0000-0002-1825-0097/orcid-profile"
        );

        let bad = OrcidClient::new().with_base_url("not a url");
        assert!(matches!(bad.endpoint("x"), Err(OrcidError::Config(_))));
    }

    #[test]
    fn test_is_orcid_id() {
        assert!(is_orcid_id("0000-0002-1825-0097"));
        assert!(is_orcid_id("0000-0002-1694-233X"));
        assert!(!is_orcid_id("0000-0002-1694-23X3"));
        assert!(!is_orcid_id("0000-0002-1825-009"));
        assert!(!is_orcid_id("0000-0002-1825-0097-1"));
        assert!(!is_orcid_id("0000-0002-1825-0097/x"));
        assert!(!is_orcid_id(""));
    }

    #[test]
    fn test_record_endpoint_stays_under_base_url() {
        let client = OrcidClient::new();
        assert_eq!(
            client
                .record_endpoint("0000-0002-1825-0097", "orcid-works")
                .unwrap()
                .as_str(),
            "https://pub.orcid.org/v1.2/0000-0002-1825-0097/orcid-works"
        );

        let hostile_ids = [
            "https://other.host/x",
            "//other.host/x",
            "../../v1.1/0000",
            "0000-0002-1825-0097/../..",
        ];
        for hostile in hostile_ids {
            assert!(matches!(
                client.record_endpoint(hostile, "orcid-works"),
                Err(OrcidError::InvalidOrcidId(id)) if id == hostile
            ));
        }
    }

    #[test]
    fn test_record_endpoint_with_base_path_without_slash() {
        let client = OrcidClient::new().with_base_url("http://localhost:8080/api");
        assert_eq!(
            client
                .record_endpoint("0000-0002-1825-0097", "orcid-profile")
                .unwrap()
                .as_str(),
            "http://localhost:8080/api/0000-0002-1825-0097/orcid-profile"
        );
    }
}
