use std::collections::HashSet;

use crate::models::{Candidate, CandidateSourceRow, Profile, ProfileType};

/// Result of a deck computation. `MissingInterests` is an explicit fast path,
/// not just an empty filter result: the orchestrator opens the interests gate
/// for it instead of showing "nobody new right now".
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    MissingInterests,
    Candidates(Vec<Candidate>),
}

impl CandidateOutcome {
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            CandidateOutcome::MissingInterests => vec![],
            CandidateOutcome::Candidates(cards) => cards,
        }
    }
}

/// Pure projection from (viewer profile, population snapshot, connection set)
/// to the ordered swipe deck. No ranking: output order is the population's
/// arrival order. Never includes the viewer or anyone already connected.
pub fn compute_candidates(
    profile: &Profile,
    population: &[CandidateSourceRow],
    connections: &HashSet<String>,
) -> CandidateOutcome {
    // A visitor without interests cannot match anything; bail before touching
    // the population so the caller can tell "blocked on interests" apart from
    // "scanned and found nothing".
    if profile.profile_type == ProfileType::Visitor && profile.interests.is_empty() {
        return CandidateOutcome::MissingInterests;
    }

    if profile.profile_type == ProfileType::Unknown {
        return CandidateOutcome::Candidates(vec![]);
    }

    let viewer_interests: HashSet<&str> = profile.interests.iter().map(String::as_str).collect();

    let mut deck = Vec::new();
    for record in population {
        if record.user_id == profile.user_id {
            continue;
        }
        if connections.contains(&record.user_id) {
            continue;
        }
        if is_match(profile, &viewer_interests, record) {
            deck.push(Candidate::project(record, profile.profile_type));
        }
    }
    CandidateOutcome::Candidates(deck)
}

fn is_match(
    profile: &Profile,
    viewer_interests: &HashSet<&str>,
    record: &CandidateSourceRow,
) -> bool {
    let record_tags = record.interest_tags();
    let overlap = record_tags.iter().any(|t| viewer_interests.contains(t.as_str()));

    match profile.profile_type {
        // Visitors match exhibitors that state an industry and share a tag.
        ProfileType::Visitor => record.industry_label().is_some() && overlap,
        // Exhibitors match visitors whose tags touch their own, but only once
        // they have declared an industry themselves.
        ProfileType::Exhibitor => profile.has_industry() && overlap,
        ProfileType::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(interests: &[&str]) -> Profile {
        Profile {
            user_id: "me".into(),
            name: "Me".into(),
            profile_type: ProfileType::Visitor,
            industry: None,
            interests: interests.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn exhibitor_record(id: &str, interests: &str, industry: Option<&str>) -> CandidateSourceRow {
        CandidateSourceRow {
            user_id: id.into(),
            name: Some(format!("Booth {}", id)),
            profile_type: "exhibitor".into(),
            industry: industry.map(|s| s.to_string()),
            interests: Some(interests.into()),
            description: None,
            website: None,
            avatar_url: None,
        }
    }

    #[test]
    fn visitor_matches_on_shared_interest_and_industry() {
        let profile = visitor(&["A", "B"]);
        let population = vec![
            exhibitor_record("X", r#"["B","C"]"#, Some("Robotics")),
            exhibitor_record("Y", r#"["D"]"#, Some("Logistics")),
        ];
        let outcome = compute_candidates(&profile, &population, &HashSet::new());
        let deck = outcome.into_candidates();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].user_id, "X");
    }

    #[test]
    fn exhibitor_without_industry_never_matches() {
        let population = vec![exhibitor_record("X", r#"["B"]"#, Some("Robotics"))];
        let mut profile = visitor(&["B"]);
        profile.profile_type = ProfileType::Exhibitor;
        profile.industry = None;
        let deck = compute_candidates(&profile, &population, &HashSet::new()).into_candidates();
        assert!(deck.is_empty());

        profile.industry = Some("Events".into());
        let deck = compute_candidates(&profile, &population, &HashSet::new()).into_candidates();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn exhibitor_record_without_industry_is_skipped_for_visitors() {
        let profile = visitor(&["B"]);
        let population = vec![exhibitor_record("X", r#"["B"]"#, None)];
        let deck = compute_candidates(&profile, &population, &HashSet::new()).into_candidates();
        assert!(deck.is_empty());
    }

    #[test]
    fn visitor_with_no_interests_short_circuits() {
        let profile = visitor(&[]);
        // Population that would otherwise match; the fast path must not scan it.
        let population = vec![exhibitor_record("X", r#"["anything"]"#, Some("Robotics"))];
        assert_eq!(
            compute_candidates(&profile, &population, &HashSet::new()),
            CandidateOutcome::MissingInterests
        );
    }

    #[test]
    fn self_and_connected_ids_are_excluded() {
        let profile = visitor(&["B"]);
        let mut own = exhibitor_record("me", r#"["B"]"#, Some("Robotics"));
        own.profile_type = "visitor".into();
        let population = vec![
            own,
            exhibitor_record("X", r#"["B"]"#, Some("Robotics")),
            exhibitor_record("Z", r#"["B"]"#, Some("Robotics")),
        ];
        let connections: HashSet<String> = ["Z".to_string()].into();
        let deck = compute_candidates(&profile, &population, &connections).into_candidates();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].user_id, "X");
    }

    #[test]
    fn arrival_order_is_preserved() {
        let profile = visitor(&["B"]);
        let population = vec![
            exhibitor_record("first", r#"["B"]"#, Some("I1")),
            exhibitor_record("skip", r#"["nope"]"#, Some("I2")),
            exhibitor_record("second", r#"["B"]"#, Some("I3")),
            exhibitor_record("third", r#"["B"]"#, Some("I4")),
        ];
        let deck = compute_candidates(&profile, &population, &HashSet::new()).into_candidates();
        let ids: Vec<&str> = deck.iter().map(|c| c.user_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_role_yields_settled_empty_deck() {
        let mut profile = visitor(&["B"]);
        profile.profile_type = ProfileType::Unknown;
        let population = vec![exhibitor_record("X", r#"["B"]"#, Some("Robotics"))];
        assert_eq!(
            compute_candidates(&profile, &population, &HashSet::new()),
            CandidateOutcome::Candidates(vec![])
        );
    }
}
