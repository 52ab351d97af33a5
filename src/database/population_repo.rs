use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::{CandidateSourceRow, ProfileType};

// Arrival order is rowid order: the deck is presented in the order records
// joined the population, never re-ranked.
const SQL_LOAD_POPULATION: &str = r#"
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
WHERE profile_type = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
ORDER BY rowid ASC
LIMIT 500
"#;

const SQL_LOAD_BY_IDS_BASE: &str = r#"
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
WHERE (is_deleted = 0 OR is_deleted IS NULL)
"#;

pub async fn load_population(
    pool: &SqlitePool,
    profile_type: ProfileType,
) -> sqlx::Result<Vec<CandidateSourceRow>> {
    sqlx::query_as::<_, CandidateSourceRow>(SQL_LOAD_POPULATION)
        .bind(profile_type.as_str())
        .fetch_all(pool)
        .await
}

/// Batch lookup for the matches view. Returns rows in rowid order; callers
/// that care about connection order re-sort against their id list.
pub async fn load_profiles_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> sqlx::Result<Vec<CandidateSourceRow>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let mut sql = String::from(SQL_LOAD_BY_IDS_BASE);
    let mut args = SqliteArguments::default();
    sql.push_str(" AND user_id IN (");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
        args.add(id).map_err(sqlx::Error::Encode)?;
    }
    sql.push_str(") ORDER BY rowid ASC");

    sqlx::query_as_with::<_, CandidateSourceRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}
