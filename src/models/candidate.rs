use serde::Serialize;

use crate::models::{parse_tag_array, ProfileType};

/// Placeholder fields the source hardcodes. Kept as explicit constants rather
/// than a scoring/venue subsystem that does not exist.
pub const MATCH_SCORE_PENDING: i64 = 95;
pub const MATCH_SCORE_CONNECTED: i64 = 100;
pub const LOCATION_PLACEHOLDER: &str = "Expo floor";
pub const EVENT_PLACEHOLDERS: [&str; 2] = ["Opening Keynote", "Networking Drinks"];

/// Raw population record as delivered by the population feed.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CandidateSourceRow {
    pub user_id: String,
    pub name: Option<String>,
    pub profile_type: String,
    pub industry: Option<String>,
    pub interests: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

impl CandidateSourceRow {
    pub fn interest_tags(&self) -> Vec<String> {
        parse_tag_array(self.interests.as_deref().unwrap_or("[]"))
    }

    pub fn industry_label(&self) -> Option<&str> {
        self.industry
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// View-model projection of a population record for the swipe deck
// (display fields + the computed handle, never persisted).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub user_id: String,
    pub name: String,
    pub handle: String,
    pub category: String,
    pub description: String,
    pub website: Option<String>,
    pub location: &'static str,
    pub company: String,
    pub events: Vec<&'static str>,
    pub match_score: i64,
    pub avatar_url: Option<String>,
}

impl Candidate {
    pub fn project(row: &CandidateSourceRow, viewer_type: ProfileType) -> Candidate {
        let name = row.name.clone().unwrap_or_default();
        let industry = row.industry_label().unwrap_or_default().to_string();

        // Visitors see what the exhibitor does; exhibitors just see "Visitor".
        let category = match viewer_type {
            ProfileType::Visitor => industry.clone(),
            _ => "Visitor".to_string(),
        };

        Candidate {
            user_id: row.user_id.clone(),
            handle: derive_handle(&name),
            name,
            category,
            description: row.description.clone().unwrap_or_default(),
            website: row.website.clone(),
            location: LOCATION_PLACEHOLDER,
            company: industry,
            events: EVENT_PLACEHOLDERS.to_vec(),
            match_score: MATCH_SCORE_PENDING,
            avatar_url: row.avatar_url.clone(),
        }
    }

    pub fn connected(mut self) -> Candidate {
        self.match_score = MATCH_SCORE_CONNECTED;
        self
    }
}

/// `"Jane van Dijk"` -> `"@jane-van-dijk"`.
pub fn derive_handle(name: &str) -> String {
    let slug = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("@{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> CandidateSourceRow {
        CandidateSourceRow {
            user_id: "x1".into(),
            name: Some("Acme Robotics".into()),
            profile_type: "exhibitor".into(),
            industry: Some("Robotics".into()),
            interests: Some(r#"["ai"]"#.into()),
            description: Some("We build arms".into()),
            website: Some("https://acme.example".into()),
            avatar_url: None,
        }
    }

    #[test]
    fn handle_lowercases_and_hyphenates() {
        assert_eq!(derive_handle("Jane van Dijk"), "@jane-van-dijk");
        assert_eq!(derive_handle("  Solo "), "@solo");
    }

    #[test]
    fn visitor_sees_industry_exhibitor_sees_visitor_label() {
        let row = sample_row();
        assert_eq!(Candidate::project(&row, ProfileType::Visitor).category, "Robotics");
        assert_eq!(Candidate::project(&row, ProfileType::Exhibitor).category, "Visitor");
    }

    #[test]
    fn projection_carries_placeholders_and_pending_score() {
        let candidate = Candidate::project(&sample_row(), ProfileType::Visitor);
        assert_eq!(candidate.location, LOCATION_PLACEHOLDER);
        assert_eq!(candidate.events.len(), 2);
        assert_eq!(candidate.match_score, MATCH_SCORE_PENDING);
        assert_eq!(candidate.connected().match_score, MATCH_SCORE_CONNECTED);
    }
}
