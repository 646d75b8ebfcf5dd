//! Profile and works endpoints.

use crate::client::OrcidClient;
use crate::error::Result;
use crate::mapper::Mapped;
use crate::types::{Author, Works};

impl OrcidClient {
    /// Fetch an author's profile by ORCID iD.
    pub async fn author(&self, orcid_id: &str) -> Result<Author> {
        let url = self.record_endpoint(orcid_id, "orcid-profile")?;
        let document = self.get_json(url, &[]).await?;
        Author::from_document(document, self.schema)
    }

    /// Fetch the works section of an author's record.
    pub async fn works(&self, orcid_id: &str) -> Result<Works> {
        let url = self.record_endpoint(orcid_id, "orcid-works")?;
        let document = self.get_json(url, &[]).await?;
        Works::from_document(document)
    }
}
