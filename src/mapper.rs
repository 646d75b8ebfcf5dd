//! Declarative view types over JSON documents.
//!
//! A [`ViewType`] is a named table of field specifications, each a [`Path`]
//! plus an optional transform. A [`View`] wraps one document and materializes
//! fields lazily: the first read of a field resolves its path, runs the
//! transform (also when the path is missing) and caches the result for the
//! life of the view.
//!
//! ```
//! use orcid_client::mapper::{View, ViewType};
//! use orcid_client::transforms;
//! use serde_json::json;
//!
//! # fn main() -> orcid_client::error::Result<()> {
//! let counter = ViewType::builder("Counter")
//!     .field("label", ["meta", "label"])
//!     .map("count", ["meta", "count"], transforms::int)
//!     .build()?;
//!
//! let view = View::new(counter, json!({"meta": {"label": "hits", "count": "42"}}));
//! assert_eq!(view.get::<Option<i64>>("count")?, &Some(42));
//! assert_eq!(view.value("label")?.and_then(|v| v.as_str()), Some("hits"));
//! # Ok(())
//! # }
//! ```

use crate::error::{OrcidError, Result, TransformError};
use crate::path::{resolve, Path, Resolved};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Materialized = Box<dyn Any + Send + Sync>;
type Transform =
    Arc<dyn Fn(Resolved<'_>) -> std::result::Result<Materialized, TransformError> + Send + Sync>;

/// Declaration of one mapped field.
#[derive(Clone)]
pub struct FieldSpec {
    name: String,
    path: Path,
    transform: Option<Transform>,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the field runs a transform rather than exposing the raw value.
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("path", &self.path.to_string())
            .field("transform", &self.has_transform())
            .finish()
    }
}

/// Named, immutable table of field specifications shared by all its views.
#[derive(Debug)]
pub struct ViewType {
    name: String,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl ViewType {
    pub fn builder(name: impl Into<String>) -> ViewTypeBuilder {
        ViewTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field specifications in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&slot| &self.fields[slot])
    }

    fn slot(&self, name: &str) -> Result<usize> {
        self.index.get(name).copied().ok_or_else(|| OrcidError::UnknownField {
            view: self.name.clone(),
            field: name.to_string(),
        })
    }
}

/// Collects field specifications for a new [`ViewType`].
pub struct ViewTypeBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ViewTypeBuilder {
    /// Declare a field that exposes the raw value at `path`.
    ///
    /// Read it with [`View::value`]; a missing path reads as `None`.
    pub fn field(mut self, name: impl Into<String>, path: impl Into<Path>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            path: path.into(),
            transform: None,
        });
        self
    }

    /// Declare a field whose value is `transform` applied to what `path`
    /// resolves to, Missing included.
    pub fn map<T, F>(mut self, name: impl Into<String>, path: impl Into<Path>, transform: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Resolved<'_>) -> std::result::Result<T, TransformError> + Send + Sync + 'static,
    {
        let erased: Transform = Arc::new(move |resolved: Resolved<'_>| {
            transform(resolved).map(|value| Box::new(value) as Materialized)
        });
        self.fields.push(FieldSpec {
            name: name.into(),
            path: path.into(),
            transform: Some(erased),
        });
        self
    }

    /// Freeze the table. Fails if a field name is declared twice.
    pub fn build(self) -> Result<Arc<ViewType>> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (slot, spec) in self.fields.iter().enumerate() {
            if index.insert(spec.name.clone(), slot).is_some() {
                return Err(OrcidError::DuplicateField {
                    view: self.name,
                    field: spec.name.clone(),
                });
            }
        }
        Ok(Arc::new(ViewType {
            name: self.name,
            fields: self.fields,
            index,
        }))
    }
}

/// A document wrapped by a [`ViewType`], with per-field memoization.
///
/// Cells are per instance; two views never share cached values. A failed
/// transform leaves its field unresolved.
pub struct View {
    view_type: Arc<ViewType>,
    document: Value,
    cache: Vec<OnceCell<Materialized>>,
}

impl View {
    pub fn new(view_type: Arc<ViewType>, document: Value) -> Self {
        let cache = view_type.fields.iter().map(|_| OnceCell::new()).collect();
        Self {
            view_type,
            document,
            cache,
        }
    }

    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    /// The wrapped document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Read a transformed field, computing it on first access.
    pub fn get<T: Any>(&self, field: &str) -> Result<&T> {
        let slot = self.view_type.slot(field)?;
        let cell = &self.cache[slot];
        if cell.get().is_some() {
            log::trace!("{}.{} served from cache", self.view_type.name, field);
        }
        let materialized = cell.get_or_try_init(|| self.materialize(slot))?;
        materialized
            .downcast_ref::<T>()
            .ok_or_else(|| OrcidError::FieldType {
                view: self.view_type.name.clone(),
                field: field.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Read a field declared without a transform.
    pub fn value(&self, field: &str) -> Result<Option<&Value>> {
        self.get::<Option<Value>>(field).map(Option::as_ref)
    }

    /// Whether the field has already been materialized.
    pub fn is_resolved(&self, field: &str) -> bool {
        self.view_type
            .index
            .get(field)
            .map(|&slot| self.cache[slot].get().is_some())
            .unwrap_or(false)
    }

    fn materialize(&self, slot: usize) -> Result<Materialized> {
        let spec = &self.view_type.fields[slot];
        let resolved = resolve(&self.document, &spec.path);
        log::debug!(
            "resolving {}.{} at {} ({})",
            self.view_type.name,
            spec.name,
            spec.path,
            if resolved.is_missing() { "missing" } else { "found" }
        );
        match &spec.transform {
            None => Ok(Box::new(resolved.value().cloned())),
            Some(transform) => transform(resolved).map_err(|source| {
                log::warn!(
                    "transform for {}.{} failed: {}",
                    self.view_type.name,
                    spec.name,
                    source
                );
                OrcidError::FieldTransform {
                    view: self.view_type.name.clone(),
                    field: spec.name.clone(),
                    value: resolved.to_string(),
                    source,
                }
            }),
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved: Vec<&str> = self
            .view_type
            .fields
            .iter()
            .zip(&self.cache)
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(spec, _)| spec.name.as_str())
            .collect();
        f.debug_struct("View")
            .field("view_type", &self.view_type.name)
            .field("resolved", &resolved)
            .finish()
    }
}

/// A typed wrapper around a [`View`] of a fixed view type.
///
/// Implementors add accessors and derived behavior on top of the mapped
/// fields without touching the field table itself.
pub trait Mapped: Sized {
    /// The view type every instance wraps.
    fn view_type() -> Result<Arc<ViewType>>;

    fn from_view(view: View) -> Self;

    fn view(&self) -> &View;

    fn from_document(document: Value) -> Result<Self> {
        Ok(Self::from_view(View::new(Self::view_type()?, document)))
    }
}
