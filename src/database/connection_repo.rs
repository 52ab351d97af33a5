use sqlx::SqlitePool;
use uuid::Uuid;

// Adding an already-present pair is a no-op, not an error: the connection set
// behaves as an idempotent set-union, which also makes client-initiated
// retries of a timed-out add safe.
const SQL_ADD_CONNECTION: &str = r#"
INSERT OR IGNORE INTO connections (
  id,
  user_id,
  candidate_id,
  note
) VALUES (?1, ?2, ?3, ?4)
"#;

const SQL_LIST_CONNECTIONS: &str = r#"
SELECT candidate_id
FROM connections
WHERE user_id = ?1
ORDER BY created_at ASC, rowid ASC
"#;

pub async fn add_connection(
    pool: &SqlitePool,
    user_id: &str,
    candidate_id: &str,
) -> sqlx::Result<()> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(SQL_ADD_CONNECTION)
        .bind(&id)
        .bind(user_id)
        .bind(candidate_id)
        .bind(Some("swipe"))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_connections(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(SQL_LIST_CONNECTIONS)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
