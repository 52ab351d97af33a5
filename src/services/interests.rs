use sqlx::SqlitePool;

use crate::database::profile_repo;
use crate::services::error::{ServiceError, ServiceResult};

/// Replaces the user's interest set. Saving zero interests is rejected
/// before any store call; the matching engine treats an interest-less
/// visitor as gated, so an empty save would wedge the deck.
pub async fn save_interests(
    pool: &SqlitePool,
    user_id: &str,
    tags: Vec<String>,
) -> ServiceResult<Vec<String>> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }

    if normalized.is_empty() {
        return Err(ServiceError::Validation("select at least one interest"));
    }

    profile_repo::save_interests(pool, user_id, &normalized).await?;
    Ok(normalized)
}
