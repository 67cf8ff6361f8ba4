use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Status of a volunteer request. Only one state is ever observed; the enum
/// keeps the wire value stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Requested,
}

/// A user's application to fill a volunteer post (stored in MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// ID of the requesting user
    pub owner_id: String,

    /// Referenced volunteer post (ObjectId as hex string)
    pub need_id: String,

    pub volunteer_name: String,

    pub volunteer_email: String,

    pub suggestion: String,

    pub status: RequestStatus,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,
}

/// Request to volunteer for a post
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateVolunteerRequest {
    pub need_id: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: String,
}

/// Volunteer request response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RequestResponse {
    pub id: String,
    pub owner_id: String,
    pub need_id: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: String,
    pub status: RequestStatus,
    pub created_at: i64,
}

impl From<VolunteerRequest> for RequestResponse {
    fn from(request: VolunteerRequest) -> Self {
        RequestResponse {
            id: request.id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: request.owner_id,
            need_id: request.need_id,
            volunteer_name: request.volunteer_name,
            volunteer_email: request.volunteer_email,
            suggestion: request.suggestion,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&RequestStatus::Requested).unwrap();
        assert_eq!(json, "\"requested\"");

        let back: RequestStatus = serde_json::from_str("\"requested\"").unwrap();
        assert_eq!(back, RequestStatus::Requested);
    }
}
