//! # rowbind
//!
//! Metadata-driven INSERT/UPDATE statements for PostgreSQL.
//!
//! A [`Record`] (ordered field → value map) is written to the table described by an
//! entity's [`EntityMetadata`]. The [`StatementBuilder`] picks INSERT or
//! UPDATE-by-primary-key, drops fields the metadata does not know, runs each value
//! through a [`ValueTransform`] hook and binds it as a parameter whose binding kind
//! follows the field's declared type.
//!
//! ```ignore
//! use rowbind::{MetadataRegistry, Record, StatementBuilder};
//!
//! let registry = MetadataRegistry::load("entities.toml")?;
//! let builder = StatementBuilder::new(registry);
//!
//! let record = Record::new()
//!     .with("description", "testimport1")
//!     .with("articleId", 5);
//!
//! // INSERT INTO "s_articles_img" ("description", "articleID") VALUES ($1, $2)
//! builder.insert(&record, "article_image")?.execute(&client).await?;
//!
//! // UPDATE "s_articles_img" SET "id" = $1, "description" = $2 WHERE "id" = $1
//! builder.update(&record, "article_image", 42)?.execute(&client).await?;
//! ```

pub mod builder;
pub mod client;
pub mod coerce;
pub mod config;
pub mod error;
pub mod ident;
pub mod introspect;
pub mod metadata;
pub mod param;
pub mod record;
pub mod statement;
pub mod transform;
pub mod value;

pub use builder::StatementBuilder;
pub use client::GenericClient;
pub use coerce::{BoundValue, StorageType, coerce};
pub use config::{BuilderConfig, PlaceholderStyle};
pub use error::{BindError, BindResult};
pub use ident::Ident;
pub use introspect::load_entity_metadata;
pub use metadata::{EntityMetadata, FieldMapping, FieldType, MetadataProvider, MetadataRegistry};
pub use param::{Param, ParamList};
pub use record::Record;
pub use statement::{Assignment, BoundStatement, KeyPredicate, StatementKind};
pub use transform::{IdentityTransform, TransformChain, TransformContext, ValueTransform};
pub use value::Value;
