// ==================== VOLUNTEER NEEDS ====================
// Ownership-scoped CRUD over the volunteer_needs collection. Every mutating
// query matches on {_id, owner_id} in a single round-trip, so the ownership
// check and the mutation cannot be separated by a concurrent write.

use crate::{
    database::{MongoDB, NEEDS_COLLECTION},
    models::{CreateNeedRequest, NeedResponse, UpdateNeedRequest, VolunteerNeed},
    utils::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

/// Parse a client-supplied post identifier into a native ObjectId
pub fn parse_need_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidArgument(format!("Invalid post ID: {}", id)))
}

/// Route-level target id must agree with the authenticated identity
pub fn ensure_path_owner(path_id: &str, user_id: &str) -> Result<(), AppError> {
    if path_id != user_id {
        return Err(AppError::Forbidden(
            "Path ID does not match the authenticated user".to_string(),
        ));
    }
    Ok(())
}

/// Open slot counts arrive as a JSON number or a numeric string from the
/// frontend form; both must resolve to a non-negative integer.
pub fn parse_volunteers_needed(value: &serde_json::Value) -> Result<i64, AppError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .filter(|count| *count >= 0)
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "volunteers_needed must be a non-negative integer, got {}",
                value
            ))
        })
}

/// Upcoming posts across all users, soonest deadline first
pub async fn list_upcoming(db: &MongoDB, limit: i64) -> Result<Vec<NeedResponse>, AppError> {
    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    // _id tie-break keeps equal deadlines in insertion order
    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "deadline": 1, "_id": 1 })
        .limit(limit)
        .await?;

    let mut needs = Vec::new();
    while let Some(need) = cursor.next().await {
        needs.push(NeedResponse::from(need?));
    }

    Ok(needs)
}

/// Posts created by the given user
pub async fn list_owned_by(db: &MongoDB, user_id: &str) -> Result<Vec<NeedResponse>, AppError> {
    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    let mut cursor = collection.find(doc! { "owner_id": user_id }).await?;

    let mut needs = Vec::new();
    while let Some(need) = cursor.next().await {
        needs.push(NeedResponse::from(need?));
    }

    Ok(needs)
}

pub async fn find_by_id(db: &MongoDB, id: &ObjectId) -> Result<Option<VolunteerNeed>, AppError> {
    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);
    Ok(collection.find_one(doc! { "_id": id }).await?)
}

/// Create a post owned by the authenticated user
pub async fn create(
    db: &MongoDB,
    user_id: &str,
    request: CreateNeedRequest,
) -> Result<NeedResponse, AppError> {
    let volunteers_needed = parse_volunteers_needed(&request.volunteers_needed)?;

    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    let now = chrono::Utc::now().timestamp();
    let mut need = VolunteerNeed {
        id: None,
        owner_id: user_id.to_string(),
        thumbnail: request.thumbnail,
        post_title: request.post_title,
        description: request.description,
        category: request.category,
        location: request.location,
        volunteers_needed,
        deadline: request.deadline,
        organizer_name: request.organizer_name,
        organizer_email: request.organizer_email,
        created_at: now,
        updated_at: now,
    };

    let result = collection.insert_one(&need).await?;
    need.id = Some(
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Inserted ID is not an ObjectId".to_string()))?,
    );

    log::info!("✅ Volunteer post created by user {}", user_id);

    Ok(NeedResponse::from(need))
}

/// Partial update, applied only when the caller owns the post. A miss on
/// either the id or the owner is reported, never silently absorbed.
pub async fn update(
    db: &MongoDB,
    user_id: &str,
    id: &str,
    request: UpdateNeedRequest,
) -> Result<NeedResponse, AppError> {
    let object_id = parse_need_id(id)?;

    let mut update_doc = doc! {
        "updated_at": chrono::Utc::now().timestamp()
    };

    if let Some(thumbnail) = &request.thumbnail {
        update_doc.insert("thumbnail", thumbnail);
    }
    if let Some(post_title) = &request.post_title {
        update_doc.insert("post_title", post_title);
    }
    if let Some(description) = &request.description {
        update_doc.insert("description", description);
    }
    if let Some(category) = &request.category {
        update_doc.insert("category", category);
    }
    if let Some(location) = &request.location {
        update_doc.insert("location", location);
    }
    if let Some(volunteers_needed) = &request.volunteers_needed {
        update_doc.insert("volunteers_needed", parse_volunteers_needed(volunteers_needed)?);
    }
    if let Some(deadline) = request.deadline {
        update_doc.insert("deadline", deadline);
    }
    if let Some(organizer_name) = &request.organizer_name {
        update_doc.insert("organizer_name", organizer_name);
    }
    if let Some(organizer_email) = &request.organizer_email {
        update_doc.insert("organizer_email", organizer_email);
    }
    // owner_id is deliberately not an updatable field

    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    let result = collection
        .update_one(
            doc! { "_id": object_id, "owner_id": user_id },
            doc! { "$set": update_doc },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Volunteer post not found".to_string()));
    }

    collection
        .find_one(doc! { "_id": object_id })
        .await?
        .map(NeedResponse::from)
        .ok_or_else(|| AppError::NotFound("Volunteer post not found".to_string()))
}

/// Delete, applied only when the caller owns the post
pub async fn delete(db: &MongoDB, user_id: &str, id: &str) -> Result<(), AppError> {
    let object_id = parse_need_id(id)?;

    let collection = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id, "owner_id": user_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Volunteer post not found".to_string()));
    }

    log::info!("🗑️  Volunteer post {} deleted by user {}", id, user_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request(volunteers_needed: serde_json::Value, deadline: i64) -> CreateNeedRequest {
        CreateNeedRequest {
            thumbnail: "https://img.example.com/cleanup.jpg".to_string(),
            post_title: "Beach cleanup".to_string(),
            description: "Help clear plastic from the shoreline".to_string(),
            category: "environment".to_string(),
            location: "Cox's Bazar".to_string(),
            volunteers_needed,
            deadline,
            organizer_name: "Rahim".to_string(),
            organizer_email: "rahim@example.com".to_string(),
        }
    }

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/volunteerTestDB".to_string());
        MongoDB::new(&uri).await.expect("test database connection")
    }

    fn fresh_user() -> String {
        ObjectId::new().to_hex()
    }

    #[test]
    fn parses_counter_from_number_and_string() {
        assert_eq!(parse_volunteers_needed(&json!(12)).unwrap(), 12);
        assert_eq!(parse_volunteers_needed(&json!(0)).unwrap(), 0);
        assert_eq!(parse_volunteers_needed(&json!("7")).unwrap(), 7);
        assert_eq!(parse_volunteers_needed(&json!(" 7 ")).unwrap(), 7);
    }

    #[test]
    fn rejects_invalid_counters() {
        assert!(parse_volunteers_needed(&json!(-1)).is_err());
        assert!(parse_volunteers_needed(&json!("-3")).is_err());
        assert!(parse_volunteers_needed(&json!(2.5)).is_err());
        assert!(parse_volunteers_needed(&json!("many")).is_err());
        assert!(parse_volunteers_needed(&json!(null)).is_err());
        assert!(parse_volunteers_needed(&json!({"count": 3})).is_err());
    }

    #[test]
    fn path_owner_check() {
        assert!(ensure_path_owner("user-1", "user-1").is_ok());

        let err = ensure_path_owner("user-2", "user-1").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn malformed_id_is_invalid_argument() {
        assert!(matches!(
            parse_need_id("not-hex").unwrap_err(),
            AppError::InvalidArgument(_)
        ));
        assert!(parse_need_id(&ObjectId::new().to_hex()).is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn create_then_fetch_round_trip() {
        let db = test_db().await;
        let owner = fresh_user();

        let created = create(&db, &owner, sample_request(json!(4), 1_900_000_000))
            .await
            .unwrap();
        assert_eq!(created.owner_id, owner);
        assert!(!created.id.is_empty());

        let fetched = find_by_id(&db, &ObjectId::parse_str(&created.id).unwrap())
            .await
            .unwrap()
            .expect("created post should be fetchable");
        assert_eq!(fetched.post_title, created.post_title);
        assert_eq!(fetched.description, created.description);
        assert_eq!(fetched.category, created.category);
        assert_eq!(fetched.location, created.location);
        assert_eq!(fetched.volunteers_needed, 4);
        assert_eq!(fetched.deadline, created.deadline);
        assert_eq!(fetched.organizer_name, created.organizer_name);
        assert_eq!(fetched.organizer_email, created.organizer_email);
        assert_eq!(fetched.owner_id, owner);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn upcoming_list_is_limited_and_sorted() {
        let db = test_db().await;
        db.collection::<VolunteerNeed>(NEEDS_COLLECTION)
            .drop()
            .await
            .ok();

        let owner = fresh_user();
        for deadline in [50, 10, 80, 30, 20, 90, 40, 70, 60, 100] {
            create(&db, &owner, sample_request(json!(1), deadline))
                .await
                .unwrap();
        }

        let upcoming = list_upcoming(&db, 6).await.unwrap();
        assert_eq!(upcoming.len(), 6);
        let deadlines: Vec<i64> = upcoming.iter().map(|n| n.deadline).collect();
        assert_eq!(deadlines, vec![10, 20, 30, 40, 50, 60]);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn other_users_posts_are_unreachable() {
        let db = test_db().await;
        let owner = fresh_user();
        let stranger = fresh_user();

        let created = create(&db, &owner, sample_request(json!(3), 1_900_000_000))
            .await
            .unwrap();

        let patch = UpdateNeedRequest {
            thumbnail: None,
            post_title: Some("hijacked".to_string()),
            description: None,
            category: None,
            location: None,
            volunteers_needed: None,
            deadline: None,
            organizer_name: None,
            organizer_email: None,
        };
        let err = update(&db, &stranger, &created.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete(&db, &stranger, &created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Untouched: still present, title unchanged, not in the stranger's list
        let need = find_by_id(&db, &ObjectId::parse_str(&created.id).unwrap())
            .await
            .unwrap()
            .expect("post must survive foreign mutations");
        assert_eq!(need.post_title, "Beach cleanup");
        assert!(list_owned_by(&db, &stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn delete_is_idempotent_in_failure() {
        let db = test_db().await;
        let owner = fresh_user();

        let created = create(&db, &owner, sample_request(json!(2), 1_900_000_000))
            .await
            .unwrap();

        delete(&db, &owner, &created.id).await.unwrap();

        let err = delete(&db, &owner, &created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
