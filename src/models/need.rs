use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Volunteer opportunity post (stored in MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerNeed {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// ID of the user who posted the opportunity. Stamped at creation,
    /// never part of any update.
    pub owner_id: String,

    /// Cover image URL
    pub thumbnail: String,

    pub post_title: String,

    pub description: String,

    /// Category (e.g. "healthcare", "education", "social service")
    pub category: String,

    pub location: String,

    /// Open volunteer slots. Decremented per accepted request, never below zero.
    pub volunteers_needed: i64,

    /// Application deadline (Unix timestamp)
    pub deadline: i64,

    pub organizer_name: String,

    pub organizer_email: String,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,

    /// Last update timestamp
    pub updated_at: i64,
}

/// Request to create a volunteer post
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateNeedRequest {
    pub thumbnail: String,
    pub post_title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    /// Accepted as a JSON number or numeric string; must be a non-negative integer
    #[schema(value_type = Object)]
    pub volunteers_needed: serde_json::Value,
    pub deadline: i64,
    pub organizer_name: String,
    pub organizer_email: String,
}

/// Request to partially update a volunteer post
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateNeedRequest {
    pub thumbnail: Option<String>,
    pub post_title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub volunteers_needed: Option<serde_json::Value>,
    pub deadline: Option<i64>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
}

/// Volunteer post response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NeedResponse {
    pub id: String,
    pub owner_id: String,
    pub thumbnail: String,
    pub post_title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub volunteers_needed: i64,
    pub deadline: i64,
    pub organizer_name: String,
    pub organizer_email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<VolunteerNeed> for NeedResponse {
    fn from(need: VolunteerNeed) -> Self {
        NeedResponse {
            id: need.id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: need.owner_id,
            thumbnail: need.thumbnail,
            post_title: need.post_title,
            description: need.description,
            category: need.category,
            location: need.location,
            volunteers_needed: need.volunteers_needed,
            deadline: need.deadline,
            organizer_name: need.organizer_name,
            organizer_email: need.organizer_email,
            created_at: need.created_at,
            updated_at: need.updated_at,
        }
    }
}
