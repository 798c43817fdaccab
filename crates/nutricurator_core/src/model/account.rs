//! Shopper account and health profile records.
//!
//! Health fields are free-form labels (`"N/A"` when unknown), matching what
//! the signup form collects.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Label stored for health conditions the shopper did not report.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    pub is_sensitive_agreed: bool,
    /// Unix epoch milliseconds of the sensitive-data agreement.
    pub agreed_at: i64,
    pub is_tos_agreed: bool,
    pub is_privacy_agreed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub user_id: UserId,
    pub gender: String,
    pub birth_date: String,
    /// Centimeters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub average_of_steps: i64,
    pub activity_level: String,
    pub diabetes: String,
    pub hypertension: String,
    pub kidneydisease: String,
    /// Comma-separated allergen names.
    pub allergy: String,
    pub notes: String,
    pub favorite: String,
    pub goal: String,
}

impl HealthProfile {
    /// Empty profile with every condition set to [`NOT_APPLICABLE`].
    pub fn blank(user_id: UserId) -> Self {
        Self {
            user_id,
            gender: String::new(),
            birth_date: String::new(),
            height: 0.0,
            weight: 0.0,
            average_of_steps: 0,
            activity_level: String::new(),
            diabetes: NOT_APPLICABLE.to_string(),
            hypertension: NOT_APPLICABLE.to_string(),
            kidneydisease: NOT_APPLICABLE.to_string(),
            allergy: String::new(),
            notes: String::new(),
            favorite: String::new(),
            goal: String::new(),
        }
    }
}

/// Persisted logged-in state. Both halves must be present to count as a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: User,
    #[serde(rename = "healthProfile")]
    pub health_profile: HealthProfile,
}
