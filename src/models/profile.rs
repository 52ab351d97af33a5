use crate::models::parse_tag_array;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub name: Option<String>,
    pub profile_type: String,
    pub industry: Option<String>,
    pub interests: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

/// Closed set of roles. Anything else in the database parses to `Unknown`,
/// which yields a settled empty deck instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    Visitor,
    Exhibitor,
    Unknown,
}

impl ProfileType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "visitor" => ProfileType::Visitor,
            "exhibitor" => ProfileType::Exhibitor,
            _ => ProfileType::Unknown,
        }
    }

    /// The population a viewer of this type swipes through.
    pub fn opposite(self) -> ProfileType {
        match self {
            ProfileType::Visitor => ProfileType::Exhibitor,
            ProfileType::Exhibitor => ProfileType::Visitor,
            ProfileType::Unknown => ProfileType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileType::Visitor => "visitor",
            ProfileType::Exhibitor => "exhibitor",
            ProfileType::Unknown => "unknown",
        }
    }
}

/// The signed-in user's own record, read-only to the matching core.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub profile_type: ProfileType,
    pub industry: Option<String>,
    pub interests: Vec<String>,
}

impl Profile {
    pub fn from_row(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            name: row.name.unwrap_or_default(),
            profile_type: ProfileType::parse(&row.profile_type),
            industry: row
                .industry
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            interests: parse_tag_array(row.interests.as_deref().unwrap_or("[]")),
        }
    }

    pub fn has_industry(&self) -> bool {
        self.industry.is_some()
    }
}
