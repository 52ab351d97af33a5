use sqlx::SqlitePool;

use crate::models::ProfileRow;

const SQL_LOAD_PROFILE: &str = r#"
SELECT
  user_id,
  name,
  profile_type,
  industry,
  interests,
  description,
  website,
  avatar_url
FROM profiles
WHERE user_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
"#;

const SQL_SAVE_INTERESTS: &str = r#"
UPDATE profiles
SET interests = ?2
WHERE user_id = ?1
"#;

pub async fn load_profile(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>(SQL_LOAD_PROFILE)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Replaces the whole interest set (stored as a JSON array of tags).
pub async fn save_interests(
    pool: &SqlitePool,
    user_id: &str,
    interests: &[String],
) -> sqlx::Result<()> {
    let json = serde_json::to_string(interests).unwrap_or_else(|_| "[]".to_string());
    sqlx::query(SQL_SAVE_INTERESTS)
        .bind(user_id)
        .bind(json)
        .execute(pool)
        .await?;
    Ok(())
}
