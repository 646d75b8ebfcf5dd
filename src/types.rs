//! ORCID record types.
//!
//! Each type wraps a [`View`] over the raw ORCID message and exposes its mapped
//! fields through typed accessors. Fields are resolved on first access and
//! cached, so accessors are cheap to call repeatedly.

use crate::cached::CachedResource;
use crate::client::OrcidClient;
use crate::error::{OrcidError, Result, TransformError};
use crate::mapper::{Mapped, View, ViewType};
use crate::path::{resolve, Path, Resolved};
use crate::schema::{
    bio_path, personal_details_path, search_results_path, works_path, SchemaVersion,
};
use crate::transforms::{self, PartialDate};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

fn cached_type(
    cell: &'static OnceCell<Arc<ViewType>>,
    build: impl FnOnce() -> Result<Arc<ViewType>>,
) -> Result<Arc<ViewType>> {
    cell.get_or_try_init(build).cloned()
}

fn text<'a>(view: &'a View, field: &str) -> Result<Option<&'a str>> {
    Ok(view.value(field)?.and_then(Value::as_str))
}

/// A researcher's homepage or profile link.
#[derive(Debug)]
pub struct Website {
    view: View,
}

impl Mapped for Website {
    fn view_type() -> Result<Arc<ViewType>> {
        static TYPE: OnceCell<Arc<ViewType>> = OnceCell::new();
        cached_type(&TYPE, || {
            ViewType::builder("Website")
                .field("name", ["url-name", "value"])
                .field("url", ["url", "value"])
                .build()
        })
    }

    fn from_view(view: View) -> Self {
        Self { view }
    }

    fn view(&self) -> &View {
        &self.view
    }
}

impl Website {
    pub fn name(&self) -> Result<Option<&str>> {
        text(&self.view, "name")
    }

    pub fn url(&self) -> Result<Option<&str>> {
        text(&self.view, "url")
    }
}

impl fmt::Display for Website {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url().ok().flatten().unwrap_or_default())
    }
}

/// Formatted citation attached to a work.
#[derive(Debug)]
pub struct Citation {
    view: View,
}

impl Mapped for Citation {
    fn view_type() -> Result<Arc<ViewType>> {
        static TYPE: OnceCell<Arc<ViewType>> = OnceCell::new();
        cached_type(&TYPE, || {
            ViewType::builder("Citation")
                .field("text", ["citation"])
                .field("kind", ["work-citation-type"])
                .build()
        })
    }

    fn from_view(view: View) -> Self {
        Self { view }
    }

    fn view(&self) -> &View {
        &self.view
    }
}

impl Citation {
    /// The citation itself (BibTeX, formatted string, ...).
    pub fn text(&self) -> Result<Option<&str>> {
        text(&self.view, "text")
    }

    /// Citation format, e.g. `BIBTEX`.
    pub fn kind(&self) -> Result<Option<&str>> {
        text(&self.view, "kind")
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().ok().flatten().unwrap_or_default())
    }
}

/// External identifier of a work (DOI, ISBN, arXiv, ...).
#[derive(Debug)]
pub struct ExternalId {
    view: View,
}

impl Mapped for ExternalId {
    fn view_type() -> Result<Arc<ViewType>> {
        static TYPE: OnceCell<Arc<ViewType>> = OnceCell::new();
        cached_type(&TYPE, || {
            ViewType::builder("ExternalId")
                .map(
                    "id",
                    ["work-external-identifier-id", "value"],
                    transforms::scalar_text,
                )
                .field("kind", ["work-external-identifier-type"])
                .build()
        })
    }

    fn from_view(view: View) -> Self {
        Self { view }
    }

    fn view(&self) -> &View {
        &self.view
    }
}

impl ExternalId {
    /// Identifier value; numeric identifiers are rendered as text.
    pub fn id(&self) -> Result<Option<&str>> {
        Ok(self.view.get::<Option<String>>("id")?.as_deref())
    }

    /// Identifier scheme, e.g. `DOI`.
    pub fn kind(&self) -> Result<Option<&str>> {
        text(&self.view, "kind")
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.kind().ok().flatten().unwrap_or("?"),
            self.id().ok().flatten().unwrap_or("?")
        )
    }
}

/// A work listed on an ORCID record.
#[derive(Debug)]
pub struct Publication {
    view: View,
}

impl Mapped for Publication {
    fn view_type() -> Result<Arc<ViewType>> {
        static TYPE: OnceCell<Arc<ViewType>> = OnceCell::new();
        cached_type(&TYPE, || {
            ViewType::builder("Publication")
                .field("title", ["work-title", "title", "value"])
                .field("subtitle", ["work-title", "subtitle", "value"])
                .field("url", ["url", "value"])
                .field("journal_title", ["journal-title", "value"])
                .field("work_type", ["work-type"])
                .map("citation", ["citation"], transforms::view::<Citation>)
                .map(
                    "external_ids",
                    ["work-external-identifiers", "work-external-identifier"],
                    transforms::optional_views::<ExternalId>,
                )
                .map("publication_date", ["publication-date"], transforms::date_parts)
                .build()
        })
    }

    fn from_view(view: View) -> Self {
        Self { view }
    }

    fn view(&self) -> &View {
        &self.view
    }
}

impl Publication {
    pub fn title(&self) -> Result<Option<&str>> {
        text(&self.view, "title")
    }

    pub fn subtitle(&self) -> Result<Option<&str>> {
        text(&self.view, "subtitle")
    }

    pub fn url(&self) -> Result<Option<&str>> {
        text(&self.view, "url")
    }

    pub fn journal_title(&self) -> Result<Option<&str>> {
        text(&self.view, "journal_title")
    }

    /// Work type, e.g. `JOURNAL_ARTICLE`.
    pub fn work_type(&self) -> Result<Option<&str>> {
        text(&self.view, "work_type")
    }

    pub fn citation(&self) -> Result<Option<&Citation>> {
        self.view.get::<Option<Citation>>("citation").map(Option::as_ref)
    }

    /// `None` when the work carries no identifier block at all.
    pub fn external_ids(&self) -> Result<Option<&[ExternalId]>> {
        self.view
            .get::<Option<Vec<ExternalId>>>("external_ids")
            .map(|ids| ids.as_deref())
    }

    pub fn publication_date(&self) -> Result<Option<PartialDate>> {
        self.view
            .get::<Option<PartialDate>>("publication_date")
            .copied()
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title().ok().flatten().unwrap_or("(untitled)"))
    }
}

/// The works section of an ORCID record.
#[derive(Debug)]
pub struct Works {
    view: View,
}

impl Mapped for Works {
    fn view_type() -> Result<Arc<ViewType>> {
        static TYPE: OnceCell<Arc<ViewType>> = OnceCell::new();
        cached_type(&TYPE, || {
            ViewType::builder("Works")
                .map(
                    "publications",
                    works_path().join(["orcid-work"]),
                    transforms::views::<Publication>,
                )
                .build()
        })
    }

    fn from_view(view: View) -> Self {
        Self { view }
    }

    fn view(&self) -> &View {
        &self.view
    }
}

impl Works {
    pub fn publications(&self) -> Result<&[Publication]> {
        self.view
            .get::<Vec<Publication>>("publications")
            .map(Vec::as_slice)
    }
}

/// An external identifier of a researcher (Scopus, ResearcherID, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: String,
    pub label: String,
}

/// A website reduced to plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUrl {
    pub url: Option<String>,
    pub label: Option<String>,
}

/// Flattened author summary for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub orcid: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub full_name: String,
    pub bio: Option<String>,
    pub identifiers: Vec<Identifier>,
    pub websites: Vec<LabeledUrl>,
    pub keywords: Vec<String>,
}

// Upstream stores all keywords in the first record as one comma-joined value,
// so only that record is read and split.
fn parse_keywords(resolved: Resolved<'_>) -> std::result::Result<Vec<String>, TransformError> {
    match resolved.present() {
        None => return Ok(Vec::new()),
        Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(TransformError::new(format!(
                "expected a keywords record, found {}",
                other
            )))
        }
    }
    let joined = match resolved.get("keyword") {
        Resolved::Missing => "",
        Resolved::Found(records) => {
            let first = records
                .as_array()
                .and_then(|records| records.first())
                .ok_or_else(|| TransformError::new("keyword is not a non-empty list"))?;
            match first.get("value") {
                None => "",
                Some(Value::String(s)) => s.as_str(),
                Some(other) => {
                    return Err(TransformError::new(format!(
                        "keyword value {} is not a string",
                        other
                    )))
                }
            }
        }
    };
    Ok(joined.split(',').map(|k| k.trim().to_string()).collect())
}

/// A researcher's ORCID record.
///
/// Works are not part of the profile document; [`Author::publications`]
/// fetches them on first use and keeps them for the life of the value.
#[derive(Debug)]
pub struct Author {
    view: View,
    works: CachedResource<Works>,
}

impl Author {
    /// The view type for profile documents of the given API version.
    pub fn view_type(version: SchemaVersion) -> Result<Arc<ViewType>> {
        static V1_1: OnceCell<Arc<ViewType>> = OnceCell::new();
        static V1_2: OnceCell<Arc<ViewType>> = OnceCell::new();
        let cell = match version {
            SchemaVersion::V1_1 => &V1_1,
            SchemaVersion::V1_2 => &V1_2,
        };
        cached_type(cell, || {
            let bio = bio_path();
            let personal = personal_details_path();
            ViewType::builder("Author")
                .field("orcid", version.orcid_path())
                .field("family_name", personal.join(["family-name", "value"]))
                .field("given_name", personal.join(["given-names", "value"]))
                .field("credit_name", personal.join(["credit-name", "value"]))
                .map(
                    "other_names",
                    personal.join(["other-names", "other-name"]),
                    transforms::flatten("value"),
                )
                .map("biography", bio.join(["biography"]), |r: Resolved<'_>| {
                    transforms::trimmed(r.get("value"))
                })
                .map("keywords", bio.join(["keywords"]), parse_keywords)
                .field(
                    "identifiers_map",
                    bio.join(["external-identifiers", "external-identifier"]),
                )
                .map(
                    "researcher_urls",
                    bio.join(["researcher-urls", "researcher-url"]),
                    transforms::views::<Website>,
                )
                .build()
        })
    }

    pub fn from_view(view: View) -> Self {
        Self {
            view,
            works: CachedResource::new(),
        }
    }

    pub fn from_document(document: Value, version: SchemaVersion) -> Result<Self> {
        Ok(Self::from_view(View::new(Self::view_type(version)?, document)))
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The ORCID iD, e.g. `0000-0002-1825-0097`.
    pub fn orcid(&self) -> Result<Option<&str>> {
        text(&self.view, "orcid")
    }

    pub fn family_name(&self) -> Result<Option<&str>> {
        text(&self.view, "family_name")
    }

    pub fn given_name(&self) -> Result<Option<&str>> {
        text(&self.view, "given_name")
    }

    pub fn credit_name(&self) -> Result<Option<&str>> {
        text(&self.view, "credit_name")
    }

    pub fn other_names(&self) -> Result<&[String]> {
        self.view.get::<Vec<String>>("other_names").map(Vec::as_slice)
    }

    pub fn biography(&self) -> Result<Option<&str>> {
        self.view
            .get::<Option<String>>("biography")
            .map(Option::as_deref)
    }

    pub fn keywords(&self) -> Result<&[String]> {
        self.view.get::<Vec<String>>("keywords").map(Vec::as_slice)
    }

    pub fn researcher_urls(&self) -> Result<&[Website]> {
        self.view.get::<Vec<Website>>("researcher_urls").map(Vec::as_slice)
    }

    /// Raw external identifier records.
    pub fn identifiers_map(&self) -> Result<Option<&Value>> {
        self.view.value("identifiers_map")
    }

    /// External identifiers with their display labels.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        let records = match self.identifiers_map()? {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(OrcidError::Parse(format!(
                    "external identifiers are not a list: {}",
                    other
                )))
            }
        };
        let id_path = Path::from(["external-id-reference", "value"]);
        let label_path = Path::from(["external-id-common-name", "value"]);
        records
            .iter()
            .enumerate()
            .map(|(i, record)| -> Result<Identifier> {
                let field = |path: &Path, what: &str| {
                    resolve(record, path).as_str().map(str::to_string).ok_or_else(|| {
                        OrcidError::Parse(format!("external identifier {} has no {}", i, what))
                    })
                };
                Ok(Identifier {
                    id: field(&id_path, "reference")?,
                    label: field(&label_path, "common name")?,
                })
            })
            .collect()
    }

    pub fn websites(&self) -> Result<Vec<LabeledUrl>> {
        self.researcher_urls()?
            .iter()
            .map(|site| -> Result<LabeledUrl> {
                Ok(LabeledUrl {
                    url: site.url()?.map(str::to_string),
                    label: site.name()?.map(str::to_string),
                })
            })
            .collect()
    }

    /// Given and family name joined by a space, skipping absent parts.
    pub fn full_name(&self) -> Result<String> {
        let parts: Vec<&str> = [self.given_name()?, self.family_name()?]
            .into_iter()
            .flatten()
            .collect();
        Ok(parts.join(" "))
    }

    pub fn profile(&self) -> Result<Profile> {
        Ok(Profile {
            orcid: self.orcid()?.map(str::to_string),
            given_name: self.given_name()?.map(str::to_string),
            family_name: self.family_name()?.map(str::to_string),
            full_name: self.full_name()?,
            bio: self.biography()?.map(str::to_string),
            identifiers: self.identifiers()?,
            websites: self.websites()?,
            keywords: self.keywords()?.to_vec(),
        })
    }

    /// The author's works, fetched from the API on first call.
    ///
    /// A failed fetch is not remembered; the next call fetches again.
    pub async fn publications(&self, client: &OrcidClient) -> Result<&[Publication]> {
        let orcid = self
            .orcid()?
            .ok_or_else(|| OrcidError::Parse("author record has no ORCID iD".to_string()))?;
        let works = self.works.get_or_load(|| client.works(orcid)).await?;
        works.publications()
    }

    /// Works, if they have already been fetched.
    pub fn loaded_works(&self) -> Option<&Works> {
        self.works.get()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, ORCID {}",
            self.full_name().unwrap_or_default(),
            self.orcid().ok().flatten().unwrap_or("?")
        )
    }
}

/// Result page of an ORCID biography search.
#[derive(Debug)]
pub struct SearchResults {
    view: View,
}

impl SearchResults {
    pub fn view_type(version: SchemaVersion) -> Result<Arc<ViewType>> {
        static V1_1: OnceCell<Arc<ViewType>> = OnceCell::new();
        static V1_2: OnceCell<Arc<ViewType>> = OnceCell::new();
        let cell = match version {
            SchemaVersion::V1_1 => &V1_1,
            SchemaVersion::V1_2 => &V1_2,
        };
        cached_type(cell, || {
            let results = search_results_path();
            ViewType::builder("SearchResults")
                .map("num_found", results.join(["num-found"]), transforms::int)
                .map(
                    "authors",
                    results.join(["orcid-search-result"]),
                    move |r: Resolved<'_>| -> std::result::Result<Vec<Author>, TransformError> {
                        match r.present() {
                            None => Ok(Vec::new()),
                            Some(Value::Array(items)) => items
                                .iter()
                                .map(|item| {
                                    Author::from_document(item.clone(), version)
                                        .map_err(TransformError::from)
                                })
                                .collect(),
                            Some(other) => Err(TransformError::new(format!(
                                "search results are not a list: {}",
                                other
                            ))),
                        }
                    },
                )
                .build()
        })
    }

    pub fn from_document(document: Value, version: SchemaVersion) -> Result<Self> {
        Ok(Self {
            view: View::new(Self::view_type(version)?, document),
        })
    }

    /// Total number of matches reported by the server.
    pub fn num_found(&self) -> Result<Option<u64>> {
        Ok(self
            .view
            .get::<Option<i64>>("num_found")?
            .and_then(|n| u64::try_from(n).ok()))
    }

    pub fn authors(&self) -> Result<&[Author]> {
        self.view.get::<Vec<Author>>("authors").map(Vec::as_slice)
    }
}
