use std::collections::HashMap;

use crate::models::Candidate;
use crate::services::error::ServiceResult;
use crate::services::store::ConnectionStore;

/// "My Matches": rehydrated independently from the connection set, in
/// connection order, every card carrying the connected score.
pub async fn load_matches(
    store: &dyn ConnectionStore,
    user_id: &str,
) -> ServiceResult<Vec<Candidate>> {
    let Some(profile) = store.get_profile(user_id).await? else {
        // No profile yet means no connections either.
        return Ok(vec![]);
    };

    let ids = store.get_connections(user_id).await?;
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let rows = store.get_profiles_by_ids(&ids).await?;
    let by_id: HashMap<&str, _> = rows.iter().map(|r| (r.user_id.as_str(), r)).collect();

    Ok(ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .map(|row| Candidate::project(row, profile.profile_type).connected())
        .collect())
}
