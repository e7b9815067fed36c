//! Executes built statements against a live database when `DATABASE_URL` is set.

use rowbind::{
    BindError, BindResult, MetadataProvider, Record, StatementBuilder, load_entity_metadata,
};
use rowbind::{GenericClient, MetadataRegistry};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::NoTls;

#[tokio::test]
async fn insert_then_update_roundtrip() -> BindResult<()> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping insert_then_update_roundtrip");
            return Ok(());
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(BindError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let table = format!("rowbind_test_img_{}_{}", std::process::id(), nanos);

    let create = format!(
        r#"CREATE TABLE "{table}" (
            id BIGINT PRIMARY KEY,
            "articleID" INTEGER NOT NULL,
            description TEXT,
            main BOOLEAN NOT NULL DEFAULT false,
            price NUMERIC(10, 2),
            created DATE
        )"#
    );
    client.execute(create.as_str(), &[]).await?;

    let result = roundtrip(&client, &table).await;

    let drop = format!(r#"DROP TABLE "{table}""#);
    client.execute(drop.as_str(), &[]).await?;
    result
}

async fn roundtrip(client: &tokio_postgres::Client, table: &str) -> BindResult<()> {
    let metadata = load_entity_metadata(client, "image", "public", table).await?;
    assert_eq!(metadata.primary_key.as_deref(), Some("id"));
    let registry = MetadataRegistry::new().with_entity("image", metadata);
    assert!(registry.metadata("image").is_ok());

    let builder = StatementBuilder::new(registry);

    let record = Record::new()
        .with("id", 1)
        .with("articleID", 5)
        .with("description", "testimport1")
        .with("main", true)
        .with("price", "12.50")
        .with("created", "2024-01-31")
        .with("ordernumber", "SW10001");
    let inserted = builder.write(client, &record, "image", None).await?;
    assert_eq!(inserted, 1);

    let update = Record::new()
        .with("description", rowbind::Value::Null)
        .with("price", 3.25);
    let updated = builder.write(client, &update, "image", Some(1)).await?;
    assert_eq!(updated, 1);

    let select = format!(
        r#"SELECT "articleID", description, main, price::text AS price, created::text AS created FROM "{table}" WHERE id = 1"#
    );
    let rows = GenericClient::query(client, &select, &[]).await?;
    let row = &rows[0];
    assert_eq!(row.get::<_, i32>("articleID"), 5);
    assert_eq!(row.get::<_, Option<String>>("description"), None);
    assert!(row.get::<_, bool>("main"));
    assert_eq!(row.get::<_, String>("price"), "3.25");
    assert_eq!(row.get::<_, String>("created"), "2024-01-31");
    Ok(())
}
