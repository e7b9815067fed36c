//! Entity metadata: table names, field → column mappings, and the provider seam.
//!
//! Metadata is owned by whoever implements [`MetadataProvider`]. The builder asks for
//! it on every call and treats the result as read-only.
//!
//! [`MetadataRegistry`] is an in-memory provider that can be filled programmatically
//! or loaded from a TOML/JSON document:
//!
//! ```toml
//! [entities.article_image]
//! table = "s_articles_img"
//!
//! [entities.article_image.fields.description]
//! column = "description"
//! type = "text"
//! nullable = true
//!
//! [entities.article_image.fields.articleId]
//! column = "articleID"
//! type = "integer"
//! ```

use crate::error::{BindError, BindResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Declared logical type of a field.
///
/// Type names outside the supported set are kept as [`FieldType::Other`] so that a
/// metadata document can still be loaded; writing such a field fails with
/// [`BindError::UnsupportedType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Text,
    Date,
    DateTime,
    Boolean,
    Integer,
    Decimal,
    Float,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "boolean" => FieldType::Boolean,
            "integer" => FieldType::Integer,
            "decimal" => FieldType::Decimal,
            "float" => FieldType::Float,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical column, declared type and nullability of one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Physical column name. Defaults to the field name when omitted in a document.
    #[serde(default)]
    pub column: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldMapping {
    pub fn new(column: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            column: column.into(),
            field_type: field_type.into(),
            nullable: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Table and field mappings for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub table: String,
    /// Primary-key column. `None` falls back to
    /// [`BuilderConfig::primary_key_column`](crate::config::BuilderConfig).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldMapping>,
}

impl EntityMetadata {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Add or replace a field mapping.
    pub fn with_field(mut self, field: impl Into<String>, mapping: FieldMapping) -> Self {
        self.fields.insert(field.into(), mapping);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fill in defaulted column names and reject empty table/column names.
    fn normalize(&mut self, entity: &str) -> BindResult<()> {
        if self.table.trim().is_empty() {
            return Err(BindError::validation(format!(
                "entity '{entity}' has an empty table name"
            )));
        }
        if self.primary_key.as_deref().is_some_and(|pk| pk.is_empty()) {
            return Err(BindError::validation(format!(
                "entity '{entity}' has an empty primary key column"
            )));
        }
        for (field, mapping) in &mut self.fields {
            if mapping.column.is_empty() {
                mapping.column = field.clone();
            }
        }
        Ok(())
    }
}

/// Resolves entity identifiers to metadata.
///
/// Implementations return [`BindError::Metadata`] for identifiers they do not know.
pub trait MetadataProvider {
    fn metadata(&self, entity: &str) -> BindResult<EntityMetadata>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn metadata(&self, entity: &str) -> BindResult<EntityMetadata> {
        (**self).metadata(entity)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Arc<P> {
    fn metadata(&self, entity: &str) -> BindResult<EntityMetadata> {
        (**self).metadata(entity)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn metadata(&self, entity: &str) -> BindResult<EntityMetadata> {
        (**self).metadata(entity)
    }
}

#[derive(Debug, Default, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    entities: IndexMap<String, EntityMetadata>,
}

/// In-memory [`MetadataProvider`].
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    entities: HashMap<String, EntityMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the metadata for an entity.
    pub fn register(&mut self, entity: impl Into<String>, metadata: EntityMetadata) {
        self.entities.insert(entity.into(), metadata);
    }

    /// Builder-style [`MetadataRegistry::register`].
    pub fn with_entity(mut self, entity: impl Into<String>, metadata: EntityMetadata) -> Self {
        self.register(entity, metadata);
        self
    }

    pub fn get(&self, entity: &str) -> Option<&EntityMetadata> {
        self.entities.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Parse a TOML metadata document.
    pub fn from_toml_str(s: &str) -> BindResult<Self> {
        let doc: MetadataDocument = toml::from_str(s)
            .map_err(|e| BindError::config(format!("failed to parse metadata TOML: {e}")))?;
        Self::from_document(doc)
    }

    /// Parse a JSON metadata document.
    pub fn from_json_str(s: &str) -> BindResult<Self> {
        let doc: MetadataDocument = serde_json::from_str(s)
            .map_err(|e| BindError::config(format!("failed to parse metadata JSON: {e}")))?;
        Self::from_document(doc)
    }

    /// Load a metadata document from disk. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> BindResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BindError::config(format!(
                "failed to read metadata file {}: {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let registry = if is_json {
            Self::from_json_str(&raw)?
        } else {
            Self::from_toml_str(&raw)?
        };

        tracing::debug!(
            target: "rowbind",
            path = %path.display(),
            entities = registry.len(),
            "loaded entity metadata"
        );
        Ok(registry)
    }

    fn from_document(doc: MetadataDocument) -> BindResult<Self> {
        let mut registry = Self::new();
        for (entity, mut metadata) in doc.entities {
            metadata.normalize(&entity)?;
            registry.register(entity, metadata);
        }
        Ok(registry)
    }
}

impl MetadataProvider for MetadataRegistry {
    fn metadata(&self, entity: &str) -> BindResult<EntityMetadata> {
        self.entities
            .get(entity)
            .cloned()
            .ok_or_else(|| BindError::unknown_entity(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_IMAGE_TOML: &str = r#"
[entities.article_image]
table = "s_articles_img"

[entities.article_image.fields.description]
column = "description"
type = "text"
nullable = true

[entities.article_image.fields.articleId]
column = "articleID"
type = "integer"

[entities.article_image.fields.extension]
type = "string"
"#;

    #[test]
    fn field_type_names() {
        for name in [
            "string", "text", "date", "datetime", "boolean", "integer", "decimal", "float",
        ] {
            let ty = FieldType::from(name);
            assert!(ty.is_supported(), "{name}");
            assert_eq!(ty.as_str(), name);
        }
        let other = FieldType::from("json");
        assert!(!other.is_supported());
        assert_eq!(other.to_string(), "json");
    }

    #[test]
    fn load_toml_document() {
        let registry = MetadataRegistry::from_toml_str(ARTICLE_IMAGE_TOML).unwrap();
        let meta = registry.metadata("article_image").unwrap();

        assert_eq!(meta.table, "s_articles_img");
        assert_eq!(meta.primary_key, None);
        let fields: Vec<_> = meta.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, ["description", "articleId", "extension"]);

        let article = meta.field("articleId").unwrap();
        assert_eq!(article.column, "articleID");
        assert_eq!(article.field_type, FieldType::Integer);
        assert!(!article.nullable);

        // Column defaults to the field name.
        assert_eq!(meta.field("extension").unwrap().column, "extension");
    }

    #[test]
    fn load_json_document_with_unknown_type() {
        let registry = MetadataRegistry::from_json_str(
            r#"{"entities": {"doc": {"table": "docs", "primary_key": "doc_id",
                "fields": {"body": {"column": "body", "type": "json"}}}}}"#,
        )
        .unwrap();
        let meta = registry.metadata("doc").unwrap();
        assert_eq!(meta.primary_key.as_deref(), Some("doc_id"));
        assert_eq!(
            meta.field("body").unwrap().field_type,
            FieldType::Other("json".into())
        );
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = MetadataRegistry::from_toml_str("[entities.bad]\ntable = \"\"\n").unwrap_err();
        assert!(matches!(err, BindError::Validation(_)));
    }

    #[test]
    fn malformed_document_is_config_error() {
        let err = MetadataRegistry::from_toml_str("[entities.bad\n").unwrap_err();
        assert!(matches!(err, BindError::Config(_)));
    }

    #[test]
    fn unknown_entity_is_metadata_error() {
        let registry = MetadataRegistry::new();
        let err = registry.metadata("missing").unwrap_err();
        assert!(err.is_metadata());
    }

    #[test]
    fn provider_through_references() {
        let registry =
            MetadataRegistry::new().with_entity("a", EntityMetadata::new("table_a"));
        let shared = Arc::new(registry);
        assert_eq!(shared.metadata("a").unwrap().table, "table_a");
        assert_eq!((&shared).metadata("a").unwrap().table, "table_a");
    }
}
