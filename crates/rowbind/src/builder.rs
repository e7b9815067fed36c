//! The statement builder: record + entity metadata → bound INSERT/UPDATE.

use crate::client::GenericClient;
use crate::coerce::{BoundValue, coerce};
use crate::config::BuilderConfig;
use crate::error::BindResult;
use crate::ident::Ident;
use crate::metadata::MetadataProvider;
use crate::param::Param;
use crate::record::Record;
use crate::statement::{Assignment, BoundStatement, KeyPredicate, StatementKind};
use crate::transform::{IdentityTransform, TransformContext, ValueTransform};

/// Builds single-table INSERT and UPDATE-by-primary-key statements from records.
///
/// The builder holds no per-call state: metadata is resolved from the provider on
/// every call and nothing is cached, so one builder can be shared across threads.
///
/// # Example
/// ```ignore
/// use rowbind::{EntityMetadata, FieldMapping, MetadataRegistry, Record, StatementBuilder};
///
/// let registry = MetadataRegistry::new().with_entity(
///     "article_image",
///     EntityMetadata::new("s_articles_img")
///         .with_field("description", FieldMapping::new("description", "text").nullable(true))
///         .with_field("articleId", FieldMapping::new("articleID", "integer")),
/// );
/// let builder = StatementBuilder::new(registry);
///
/// let record = Record::new().with("description", "testimport1").with("articleId", 5);
/// let stmt = builder.build(&record, "article_image", None)?;
/// assert_eq!(
///     stmt.to_sql(),
///     r#"INSERT INTO "s_articles_img" ("description", "articleID") VALUES ($1, $2)"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StatementBuilder<P, T = IdentityTransform> {
    provider: P,
    transform: T,
    config: BuilderConfig,
}

impl<P: MetadataProvider> StatementBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            transform: IdentityTransform,
            config: BuilderConfig::default(),
        }
    }
}

impl<P: MetadataProvider, T: ValueTransform> StatementBuilder<P, T> {
    /// Replace the value transform hook.
    pub fn with_transform<U: ValueTransform>(self, transform: U) -> StatementBuilder<P, U> {
        StatementBuilder {
            provider: self.provider,
            transform,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build an INSERT (`primary_key` is `None`) or an UPDATE of the row whose
    /// primary key equals `primary_key`.
    ///
    /// Record fields without a mapping in the entity metadata are dropped. In UPDATE
    /// mode the primary-key column is always written with `primary_key`; a record
    /// field mapped to that column still goes through the transform hook and type
    /// check, but its value is discarded.
    pub fn build(
        &self,
        record: &Record,
        entity: &str,
        primary_key: Option<i64>,
    ) -> BindResult<BoundStatement> {
        let metadata = self.provider.metadata(entity)?;
        let table = Ident::table(&metadata.table)?;

        let kind = match primary_key {
            Some(_) => StatementKind::Update,
            None => StatementKind::Insert,
        };

        let mut assignments: Vec<Assignment> = Vec::with_capacity(record.len() + 1);
        let mut key = None;
        let key_column = metadata
            .primary_key
            .as_deref()
            .unwrap_or(self.config.primary_key_column.as_str());

        if let Some(id) = primary_key {
            let column = Ident::column(key_column)?;
            let param = Param::new(BoundValue::integer(id));
            assignments.push(Assignment {
                column: column.clone(),
                param: param.clone(),
            });
            key = Some(KeyPredicate { column, param });
        }

        for (field, value) in record.iter() {
            let Some(mapping) = metadata.field(field) else {
                tracing::trace!(target: "rowbind", entity, field, "skipping unmapped field");
                continue;
            };

            let ctx = TransformContext {
                entity,
                table: &metadata.table,
                mapping,
                kind,
            };
            let value = self.transform.transform(value.clone(), field, &ctx);
            let column = Ident::column(&mapping.column)?;
            let param = Param::new(coerce(value, mapping)?);

            if key.is_some() && mapping.column == key_column {
                tracing::trace!(
                    target: "rowbind",
                    entity,
                    field,
                    "primary key taken from the explicit identifier"
                );
                continue;
            }

            tracing::trace!(
                target: "rowbind",
                entity,
                field,
                column = %mapping.column,
                storage = ?param.storage(),
                "bound field"
            );

            match assignments.iter_mut().find(|a| a.column == column) {
                Some(existing) => existing.param = param,
                None => assignments.push(Assignment { column, param }),
            }
        }

        tracing::debug!(
            target: "rowbind",
            entity,
            table = %metadata.table,
            kind = %kind,
            assignments = assignments.len(),
            "built statement"
        );

        Ok(BoundStatement {
            entity: entity.to_string(),
            table,
            kind,
            assignments,
            key,
            placeholder: self.config.placeholder,
        })
    }

    /// Build an INSERT.
    pub fn insert(&self, record: &Record, entity: &str) -> BindResult<BoundStatement> {
        self.build(record, entity, None)
    }

    /// Build an UPDATE of the row identified by `primary_key`.
    pub fn update(
        &self,
        record: &Record,
        entity: &str,
        primary_key: i64,
    ) -> BindResult<BoundStatement> {
        self.build(record, entity, Some(primary_key))
    }

    /// Build and execute in one step, returning the number of affected rows.
    pub async fn write(
        &self,
        conn: &impl GenericClient,
        record: &Record,
        entity: &str,
        primary_key: Option<i64>,
    ) -> BindResult<u64> {
        let stmt = self.build(record, entity, primary_key)?;
        stmt.execute(conn).await
    }
}
