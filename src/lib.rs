//! # orcid-client
//!
//! A Rust client for the ORCID public API, built on a declarative JSON
//! mapping engine.
//!
//! Provides:
//! - **Mapper**: [`ViewType`]s declare where each field lives inside a raw
//!   JSON document; [`View`]s resolve those paths lazily and cache the result
//! - **Records**: ORCID authors, works, citations and search results as views
//! - **Client**: Async fetching of profiles, works and searches
//! - **CLI**: `orcid` binary for terminal use (feature `cli`)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> orcid_client::error::Result<()> {
//! use orcid_client::OrcidClient;
//!
//! let client = OrcidClient::from_env()?;
//! let author = client.author("0000-0002-1825-0097").await?;
//! println!("{}: {:?}", author.full_name()?, author.keywords()?);
//!
//! // Works are fetched on first access and cached on the author.
//! for work in author.publications(&client).await? {
//!     println!("{} ({:?})", work, work.publication_date()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Mapping your own documents
//!
//! ```
//! use orcid_client::{transforms, View, ViewType};
//! use serde_json::json;
//!
//! # fn main() -> orcid_client::error::Result<()> {
//! let grant = ViewType::builder("Grant")
//!     .field("title", ["funding-title", "title", "value"])
//!     .map("amount", ["amount", "value"], transforms::int)
//!     .build()?;
//!
//! let view = View::new(grant, json!({"funding-title": {"title": {"value": "Pots"}}}));
//! assert_eq!(view.value("title")?.and_then(|v| v.as_str()), Some("Pots"));
//! assert_eq!(view.get::<Option<i64>>("amount")?, &None);
//! # Ok(())
//! # }
//! ```

pub mod cached;
pub mod client;
pub mod error;
pub mod mapper;
pub mod path;
pub mod profile;
pub mod schema;
pub mod search;
pub mod transforms;
pub mod types;

// Re-export key types at the crate root.
pub use cached::{CachedResource, LoadState};
pub use client::OrcidClient;
pub use error::{OrcidError, TransformError};
pub use mapper::{Mapped, View, ViewType};
pub use path::{resolve, Key, Path, Resolved};
pub use schema::SchemaVersion;
pub use types::*;
