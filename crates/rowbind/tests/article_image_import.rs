//! End-to-end statement building for an image import, driven by a TOML metadata file.

use rowbind::{
    BindError, MetadataRegistry, Record, StatementBuilder, StatementKind, StorageType,
    TransformContext, Value,
};
use serde_json::json;

const ENTITIES: &str = r#"
[entities.article_image]
table = "s_articles_img"

[entities.article_image.fields.description]
column = "description"
type = "text"
nullable = true

[entities.article_image.fields.articleID]
column = "articleID"
type = "integer"

[entities.article_image.fields.extension]
type = "string"

[entities.article_image.fields.main]
type = "boolean"

[entities.article_image.fields.position]
type = "integer"
nullable = true

[entities.article_image.fields.attributes]
type = "json"
nullable = true
"#;

fn builder() -> StatementBuilder<MetadataRegistry> {
    StatementBuilder::new(MetadataRegistry::from_toml_str(ENTITIES).unwrap())
}

#[test]
fn import_row_becomes_insert() {
    // Columns like `ordernumber`, `image` and `thumbnail` are import-file fields
    // with no counterpart on the image table.
    let record = Record::from_json(json!({
        "ordernumber": "SW10001",
        "image": "file:///tmp/sw-icon_blue128.png",
        "description": "testimport1",
        "thumbnail": 1,
        "articleID": 5,
        "extension": "png",
    }))
    .unwrap();

    let stmt = builder().build(&record, "article_image", None).unwrap();

    assert_eq!(stmt.kind(), StatementKind::Insert);
    assert_eq!(
        stmt.to_sql(),
        r#"INSERT INTO "s_articles_img" ("description", "articleID", "extension") VALUES ($1, $2, $3)"#
    );
    let wire: Vec<_> = stmt
        .params()
        .iter()
        .map(|p| p.value().to_wire_text())
        .collect();
    assert_eq!(
        wire,
        [
            Some("testimport1".to_string()),
            Some("5".to_string()),
            Some("png".to_string())
        ]
    );
}

#[test]
fn update_binds_key_once() {
    let record = Record::new().with("main", true).with("position", None::<i32>);

    let stmt = builder().update(&record, "article_image", 77).unwrap();

    assert_eq!(
        stmt.to_sql(),
        r#"UPDATE "s_articles_img" SET "id" = $1, "main" = $2, "position" = $3 WHERE "id" = $1"#
    );
    let params = stmt.params();
    assert_eq!(params.len(), 3);
    assert_eq!(params.get(0).unwrap().value().to_wire_text().as_deref(), Some("77"));
    assert_eq!(params.get(1).unwrap().value().to_wire_text().as_deref(), Some("1"));
    assert_eq!(params.get(2).unwrap().storage(), StorageType::Null);
}

#[test]
fn nullable_unsupported_field_with_null_is_written_as_null() {
    let record = Record::new().with("attributes", Value::Null);
    let stmt = builder().insert(&record, "article_image").unwrap();
    assert_eq!(
        stmt.assignment("attributes").unwrap().storage(),
        StorageType::Null
    );
}

#[test]
fn unsupported_field_with_value_fails_without_statement() {
    let record = Record::new()
        .with("description", "x")
        .with("attributes", r#"{"a":1}"#);
    let err = builder().insert(&record, "article_image").unwrap_err();
    assert!(err.is_unsupported_type());
    assert_eq!(err.to_string(), "Type json not found");
}

#[test]
fn unknown_entity_fails() {
    let err = builder()
        .insert(&Record::new().with("description", "x"), "article")
        .unwrap_err();
    assert!(matches!(err, BindError::Metadata { .. }));
}

#[test]
fn transform_hook_normalizes_values() {
    let builder = builder().with_transform(
        |value: Value, field: &str, ctx: &TransformContext<'_>| match (field, value) {
            ("extension", Value::Text(ext)) if ctx.entity == "article_image" => {
                Value::Text(ext.to_ascii_lowercase())
            }
            (_, value) => value,
        },
    );
    let record = Record::new().with("extension", "PNG");

    let stmt = builder.insert(&record, "article_image").unwrap();
    assert_eq!(
        stmt.assignment("extension").unwrap().param.value().value,
        Value::from("png")
    );
}
