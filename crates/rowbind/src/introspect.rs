//! Build [`EntityMetadata`] from a live table definition.
//!
//! Logical field names equal column names. Postgres types outside the supported
//! logical set are kept verbatim, so the metadata loads but writing such a column
//! fails with [`BindError::UnsupportedType`].

use crate::client::GenericClient;
use crate::error::{BindError, BindResult};
use crate::ident::Ident;
use crate::metadata::{EntityMetadata, FieldMapping, FieldType};
use tokio_postgres::Row;

const COLUMNS_SQL: &str = r#"
SELECT
  a.attname AS column_name,
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
  a.attnotnull AS not_null,
  COALESCE(i.indisprimary, false) AS is_primary
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
LEFT JOIN pg_catalog.pg_index i
  ON i.indrelid = c.oid AND i.indisprimary AND a.attnum = ANY(i.indkey)
WHERE c.relkind IN ('r', 'p')
  AND a.attnum > 0
  AND NOT a.attisdropped
  AND n.nspname = $1
  AND c.relname = $2
ORDER BY a.attnum
"#;

/// Map a `format_type` string onto a logical field type.
pub fn field_type_for_pg(data_type: &str) -> FieldType {
    if data_type.ends_with("[]") {
        return FieldType::Other(data_type.to_string());
    }
    let base = data_type
        .split_once('(')
        .map_or(data_type, |(base, _)| base)
        .trim();

    match base {
        "character varying" | "varchar" | "character" | "char" | "bpchar" | "citext" => {
            FieldType::String
        }
        "text" => FieldType::Text,
        "date" => FieldType::Date,
        "timestamp without time zone" | "timestamp with time zone" | "timestamp"
        | "timestamptz" => FieldType::DateTime,
        "boolean" => FieldType::Boolean,
        "smallint" | "integer" | "bigint" => FieldType::Integer,
        "numeric" | "decimal" => FieldType::Decimal,
        "real" | "double precision" => FieldType::Float,
        _ => FieldType::Other(data_type.to_string()),
    }
}

/// Load metadata for `schema.table` and label it as `entity` in errors.
///
/// The primary key is recorded only when the table has a single-column primary key.
pub async fn load_entity_metadata<C: GenericClient>(
    client: &C,
    entity: &str,
    schema: &str,
    table: &str,
) -> BindResult<EntityMetadata> {
    let rows = client.query(COLUMNS_SQL, &[&schema, &table]).await?;

    if rows.is_empty() {
        return Err(BindError::metadata(
            entity,
            format!("table {schema}.{table} not found"),
        ));
    }

    let mut metadata = EntityMetadata::new(Ident::qualified(schema, table)?.to_sql());
    let mut key_columns = Vec::new();

    for row in &rows {
        let column: String = get(row, "column_name")?;
        let data_type: String = get(row, "data_type")?;
        let not_null: bool = get(row, "not_null")?;
        let is_primary: bool = get(row, "is_primary")?;

        if is_primary {
            key_columns.push(column.clone());
        }
        let mapping = FieldMapping::new(column.clone(), field_type_for_pg(&data_type))
            .nullable(!not_null);
        metadata = metadata.with_field(column, mapping);
    }

    if let [key] = key_columns.as_slice() {
        metadata = metadata.with_primary_key(key.clone());
    }

    tracing::debug!(
        target: "rowbind",
        entity,
        schema,
        table,
        fields = metadata.fields.len(),
        primary_key = ?metadata.primary_key,
        "introspected entity metadata"
    );

    Ok(metadata)
}

fn get<T>(row: &Row, column: &str) -> BindResult<T>
where
    T: for<'a> tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column)
        .map_err(|e| BindError::decode(column, e.to_string()))
}
