//! Writer properties against a live PostgreSQL instance.
//!
//! Ignored by default so the suite stays hermetic. Point DATABASE_URL at a
//! scratch database and run `cargo test -- --ignored` to exercise them.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use spotify_sync::records::{SqlValue, TableRecord};
use spotify_sync::upsert::{upsert, TableSpec};

#[derive(Debug, Clone)]
struct TestRow {
    id: String,
    label: String,
    score: i64,
    note: Option<String>,
}

impl TestRow {
    fn new(id: &str, label: &str, score: i64, note: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            score,
            note: note.map(|n| n.to_string()),
        }
    }
}

impl TableRecord for TestRow {
    fn columns() -> &'static [&'static str] {
        &["id", "label", "score", "note"]
    }

    fn value(&self, column: &str) -> SqlValue {
        match column {
            "id" => SqlValue::text(&self.id),
            "label" => SqlValue::text(&self.label),
            "score" => SqlValue::int(self.score),
            "note" => SqlValue::Text(self.note.clone()),
            _ => SqlValue::Text(None),
        }
    }
}

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a scratch PostgreSQL database");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to scratch database")
}

// Each test owns its table so the suite can run in parallel.
async fn reset(pool: &PgPool, table: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS \"{}\"", table))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(&format!(
        "CREATE TABLE \"{}\" (\
             id TEXT PRIMARY KEY, \
             label TEXT NOT NULL, \
             score BIGINT NOT NULL CHECK (score >= 0), \
             note TEXT\
         )",
        table
    ))
    .execute(pool)
    .await
    .unwrap();
}

async fn fetch_rows(pool: &PgPool, table: &str) -> Vec<(String, String, i64, Option<String>)> {
    sqlx::query_as(&format!(
        "SELECT id, label, score, note FROM \"{}\" ORDER BY id",
        table
    ))
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires a scratch PostgreSQL database via DATABASE_URL"]
async fn upserting_the_same_batch_twice_is_idempotent() {
    const TABLE: &str = "upsert_test_idempotence";
    const SPEC: TableSpec = TableSpec {
        table: TABLE,
        key_columns: &["id"],
        refresh_columns: &["label", "score"],
    };

    let pool = pool().await;
    reset(&pool, TABLE).await;

    let batch = vec![
        TestRow::new("k1", "one", 1, Some("first")),
        TestRow::new("k2", "two", 2, None),
    ];

    let first = upsert(&pool, &SPEC, &batch).await;
    assert_eq!((first.succeeded, first.failed), (2, 0));
    let after_first = fetch_rows(&pool, TABLE).await;

    let second = upsert(&pool, &SPEC, &batch).await;
    assert_eq!((second.succeeded, second.failed), (2, 0));
    let after_second = fetch_rows(&pool, TABLE).await;

    assert_eq!(after_first.len(), 2);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
#[ignore = "requires a scratch PostgreSQL database via DATABASE_URL"]
async fn conflict_refreshes_exactly_the_configured_columns() {
    const TABLE: &str = "upsert_test_refresh";
    // note is deliberately not in the refresh set.
    const SPEC: TableSpec = TableSpec {
        table: TABLE,
        key_columns: &["id"],
        refresh_columns: &["label", "score"],
    };

    let pool = pool().await;
    reset(&pool, TABLE).await;

    let original = vec![TestRow::new("k1", "old label", 1, Some("original note"))];
    upsert(&pool, &SPEC, &original).await;

    let conflicting = vec![TestRow::new("k1", "new label", 9, Some("changed note"))];
    let outcome = upsert(&pool, &SPEC, &conflicting).await;
    assert_eq!((outcome.succeeded, outcome.failed), (1, 0));

    let rows = fetch_rows(&pool, TABLE).await;
    assert_eq!(rows.len(), 1);
    let (_, label, score, note) = &rows[0];
    assert_eq!(label, "new label");
    assert_eq!(*score, 9);
    assert_eq!(note.as_deref(), Some("original note"));
}

#[tokio::test]
#[ignore = "requires a scratch PostgreSQL database via DATABASE_URL"]
async fn one_bad_row_does_not_discard_the_batch() {
    const TABLE: &str = "upsert_test_isolation";
    const SPEC: TableSpec = TableSpec {
        table: TABLE,
        key_columns: &["id"],
        refresh_columns: &["label", "score"],
    };

    let pool = pool().await;
    reset(&pool, TABLE).await;

    let batch = vec![
        TestRow::new("k1", "fine", 1, None),
        // Violates the CHECK constraint on score.
        TestRow::new("k2", "broken", -5, None),
        TestRow::new("k3", "also fine", 3, None),
    ];

    let outcome = upsert(&pool, &SPEC, &batch).await;
    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].0.contains("k2"));

    let rows = fetch_rows(&pool, TABLE).await;
    let ids: Vec<&str> = rows.iter().map(|(id, _, _, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["k1", "k3"]);
}
