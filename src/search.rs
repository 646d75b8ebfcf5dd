//! Biography search endpoint.

use crate::client::OrcidClient;
use crate::error::Result;
use crate::types::SearchResults;

impl OrcidClient {
    /// Search ORCID biographies.
    ///
    /// The query is passed through unchanged as the `q` parameter (Solr
    /// syntax, e.g. `family-name:Carberry`).
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let url = self.endpoint("search/orcid-bio")?;
        let document = self.get_json(url, &[("q", query)]).await?;
        SearchResults::from_document(document, self.schema)
    }
}
