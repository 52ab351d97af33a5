pub mod candidate;
pub mod current_user;
pub mod profile;

pub use candidate::{
    Candidate, CandidateSourceRow, EVENT_PLACEHOLDERS, LOCATION_PLACEHOLDER,
    MATCH_SCORE_CONNECTED, MATCH_SCORE_PENDING,
};
pub use current_user::CurrentUserRow;
pub use profile::{Profile, ProfileRow, ProfileType};

/// Interests are stored as a JSON array of tag strings on the profile row.
/// Unparseable input degrades to an empty set; tags are trimmed, de-blanked
/// and de-duplicated while preserving first-seen order.
pub fn parse_tag_array(raw: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return vec![];
    };
    let Some(array) = value.as_array() else {
        return vec![];
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in array
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::parse_tag_array;

    #[test]
    fn tag_array_dedupes_and_trims() {
        assert_eq!(
            parse_tag_array(r#"[" ai", "ai", "", "logistics"]"#),
            vec!["ai", "logistics"]
        );
    }

    #[test]
    fn garbage_tag_json_becomes_empty_set() {
        assert!(parse_tag_array("not json").is_empty());
        assert!(parse_tag_array(r#"{"name":"ai"}"#).is_empty());
    }
}
