//! Public models for the Newsly API and the locally kept profile.

use serde::{Deserialize, Serialize};

/// Country and optional region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Onboarding answers as one flat record.
///
/// Persisted locally as camelCase JSON. Every field is optional; list fields
/// that were never answered are empty and left out of the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_in_program: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_stage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_industries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_interests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub academic_subjects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hobbies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics_to_avoid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_complexity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_article_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_frequency: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preferred_content_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaking_news_priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_preference: Option<String>,
}

/// Body of `PUT /auth/profile`. Unset fields are omitted so the server keeps
/// its current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_in_program: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_industries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics_to_avoid: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_complexity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_article_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_content_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaking_news_priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_preference: Option<String>,
}

fn non_empty(list: &[String]) -> Option<Vec<String>> {
    if list.is_empty() {
        None
    } else {
        Some(list.to_vec())
    }
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(p: &UserProfile) -> Self {
        Self {
            name: p.name.clone(),
            email: p.email.clone(),
            age_range: p.age_range.clone(),
            education_level: p.education_level.clone(),
            field_of_study: p.field_of_study.clone(),
            secondary_field: p.secondary_field.clone(),
            year_in_program: p.year_in_program,
            career_stage: p.career_stage.clone(),
            target_industries: non_empty(&p.target_industries),
            primary_interests: non_empty(&p.primary_interests),
            secondary_interests: non_empty(&p.secondary_interests),
            academic_subjects: non_empty(&p.academic_subjects),
            hobbies: non_empty(&p.hobbies),
            topics_to_avoid: non_empty(&p.topics_to_avoid),
            preferred_complexity: p.preferred_complexity.clone(),
            preferred_article_length: p.preferred_article_length.clone(),
            news_frequency: p.news_frequency.clone(),
            preferred_content_types: non_empty(&p.preferred_content_types),
            political_orientation: p.political_orientation.clone(),
            international_focus: p.international_focus,
            local_focus: p.local_focus,
            breaking_news_priority: p.breaking_news_priority,
            reading_time_preference: p.reading_time_preference.clone(),
            device_preference: p.device_preference.clone(),
        }
    }
}

/// Account record returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub primary_interests: Vec<String>,
    #[serde(default)]
    pub secondary_interests: Vec<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Response of register and login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCheck {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    #[serde(default)]
    pub count: u64,
}

/// Server-ranked article suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub article_id: i64,
    pub relevance_score: f64,
    #[serde(default)]
    pub recommendation_reason: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default)]
    pub article_source: Option<String>,
    #[serde(default)]
    pub article_url: Option<String>,
    #[serde(default)]
    pub article_description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Click,
    Like,
    Share,
    Hide,
    Bookmark,
}

impl InteractionKind {
    pub const ALL: [Self; 6] = [
        Self::View,
        Self::Click,
        Self::Like,
        Self::Share,
        Self::Hide,
        Self::Bookmark,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Click => "click",
            Self::Like => "like",
            Self::Share => "share",
            Self::Hide => "hide",
            Self::Bookmark => "bookmark",
        }
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown interaction type '{s}'"))
    }
}

/// Body of `POST /interactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub article_id: i64,
    pub interaction_type: InteractionKind,
    pub time_spent_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_in_feed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_depth: Option<f64>,
}

impl Interaction {
    /// Interaction with no time spent and no position, as a bare click or like.
    #[must_use]
    pub fn new(article_id: i64, interaction_type: InteractionKind) -> Self {
        Self {
            article_id,
            interaction_type,
            time_spent_seconds: 0,
            position_in_feed: None,
            completion_rate: None,
            scroll_depth: None,
        }
    }

    #[must_use]
    pub fn at_position(mut self, position: u32) -> Self {
        self.position_in_feed = Some(position);
        self
    }

    #[must_use]
    pub fn with_time_spent(mut self, seconds: u32) -> Self {
        self.time_spent_seconds = seconds;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionAck {
    pub status: String,
    pub message: String,
}

/// Aggregate usage numbers from `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_recommendations: i64,
    pub served_count: i64,
    pub clicked_count: i64,
    pub avg_relevance_score: f64,
    #[serde(default)]
    pub last_recommendation_at: Option<String>,
    /// Percentage, 0 to 100.
    pub click_through_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_uses_camel_case_and_skips_unset() {
        let profile = UserProfile {
            name: Some("Ada".to_owned()),
            age_range: Some("23-25".to_owned()),
            primary_interests: vec!["Technology".to_owned()],
            ..UserProfile::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            value,
            json!({"name": "Ada", "ageRange": "23-25", "primaryInterests": ["Technology"]})
        );
    }

    #[test]
    fn profile_reads_partial_record() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "a@b.com",
            "location": {"country": "Canada", "region": "Ontario"},
            "breakingNewsPriority": true
        }))
        .unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(
            profile.location.and_then(|l| l.region).as_deref(),
            Some("Ontario")
        );
        assert_eq!(profile.breaking_news_priority, Some(true));
        assert!(profile.hobbies.is_empty());
    }

    #[test]
    fn profile_update_is_snake_case_without_empty_lists() {
        let profile = UserProfile {
            age_range: Some("19-22".to_owned()),
            primary_interests: vec!["Health".to_owned(), "Science".to_owned()],
            local_focus: Some(false),
            ..UserProfile::default()
        };
        let value = serde_json::to_value(ProfileUpdate::from(&profile)).unwrap();
        assert_eq!(
            value,
            json!({
                "age_range": "19-22",
                "primary_interests": ["Health", "Science"],
                "local_focus": false
            })
        );
    }

    #[test]
    fn interaction_serializes_kind_lowercase() {
        let interaction = Interaction::new(42, InteractionKind::Bookmark).at_position(3);
        let value = serde_json::to_value(&interaction).unwrap();
        assert_eq!(
            value,
            json!({
                "article_id": 42,
                "interaction_type": "bookmark",
                "time_spent_seconds": 0,
                "position_in_feed": 3
            })
        );
    }

    #[test]
    fn interaction_kind_parses_case_insensitively() {
        assert_eq!("Like".parse::<InteractionKind>(), Ok(InteractionKind::Like));
        assert!("poke".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn auth_response_debug_hides_token() {
        let resp = AuthResponse {
            access_token: "eyJ.secret".to_owned(),
            token_type: "bearer".to_owned(),
            user_id: 7,
            name: "Ada".to_owned(),
            email: "a@b.com".to_owned(),
        };
        assert!(!format!("{resp:?}").contains("eyJ.secret"));
    }

    #[test]
    fn recommendation_tolerates_nulls() {
        let rec: Recommendation = serde_json::from_value(json!({
            "id": 1,
            "article_id": 99,
            "relevance_score": 0.87,
            "recommendation_reason": null,
            "article_title": "Rates hold steady",
            "article_source": null,
            "article_url": null,
            "article_description": null,
            "created_at": "2026-03-01T09:00:00"
        }))
        .unwrap();
        assert_eq!(rec.article_title.as_deref(), Some("Rates hold steady"));
        assert!(rec.published_at.is_none());
    }
}
