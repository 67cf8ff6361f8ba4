// ==================== VOLUNTEER REQUESTS ====================
// Applications against posted needs. Creating one decrements the open slot
// counter on the referenced post; the decrement is a conditional update
// guarded on `volunteers_needed > 0`, so the counter can never go negative
// even when signups race. The insert and the decrement remain two writes.

use crate::{
    database::{MongoDB, NEEDS_COLLECTION, REQUESTS_COLLECTION},
    models::{CreateVolunteerRequest, RequestResponse, RequestStatus, VolunteerNeed, VolunteerRequest},
    services::need_service,
    utils::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::doc;

/// Requests submitted by the given user
pub async fn list_owned_by(db: &MongoDB, user_id: &str) -> Result<Vec<RequestResponse>, AppError> {
    let collection = db.collection::<VolunteerRequest>(REQUESTS_COLLECTION);

    let mut cursor = collection.find(doc! { "owner_id": user_id }).await?;

    let mut requests = Vec::new();
    while let Some(request) = cursor.next().await {
        requests.push(RequestResponse::from(request?));
    }

    Ok(requests)
}

/// Submit a request against a post and claim one of its open slots
pub async fn create(
    db: &MongoDB,
    user_id: &str,
    request: CreateVolunteerRequest,
) -> Result<RequestResponse, AppError> {
    let need_oid = need_service::parse_need_id(&request.need_id)?;

    let needs = db.collection::<VolunteerNeed>(NEEDS_COLLECTION);

    // Claim a slot first: matches only while slots remain, so concurrent
    // signups drain the counter to exactly zero
    let result = needs
        .update_one(
            doc! { "_id": need_oid, "volunteers_needed": { "$gt": 0 } },
            doc! { "$inc": { "volunteers_needed": -1 } },
        )
        .await?;

    if result.modified_count == 0 {
        return match need_service::find_by_id(db, &need_oid).await? {
            Some(_) => Err(AppError::Exhausted(
                "No volunteer slots remaining for this post".to_string(),
            )),
            None => Err(AppError::NotFound("Volunteer post not found".to_string())),
        };
    }

    let mut volunteer_request = VolunteerRequest {
        id: None,
        owner_id: user_id.to_string(),
        need_id: need_oid.to_hex(),
        volunteer_name: request.volunteer_name,
        volunteer_email: request.volunteer_email,
        suggestion: request.suggestion,
        status: RequestStatus::Requested,
        created_at: chrono::Utc::now().timestamp(),
    };

    let requests = db.collection::<VolunteerRequest>(REQUESTS_COLLECTION);
    let insert = requests.insert_one(&volunteer_request).await.map_err(|e| {
        // Slot already claimed; without multi-write transactions the counter
        // stays decremented, which under-reports capacity rather than
        // oversubscribing it
        log::error!(
            "❌ Request insert failed after slot decrement on need {}: {}",
            volunteer_request.need_id,
            e
        );
        AppError::from(e)
    })?;

    volunteer_request.id = Some(
        insert
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Inserted ID is not an ObjectId".to_string()))?,
    );

    log::info!(
        "✅ Volunteer request by user {} for post {}",
        user_id,
        volunteer_request.need_id
    );

    Ok(RequestResponse::from(volunteer_request))
}

/// Withdraw a request, only when the caller owns it
pub async fn delete(db: &MongoDB, user_id: &str, id: &str) -> Result<(), AppError> {
    let object_id = mongodb::bson::oid::ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidArgument(format!("Invalid request ID: {}", id)))?;

    let collection = db.collection::<VolunteerRequest>(REQUESTS_COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id, "owner_id": user_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Volunteer request not found".to_string()));
    }

    log::info!("🗑️  Volunteer request {} withdrawn by user {}", id, user_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateNeedRequest;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/volunteerTestDB".to_string());
        MongoDB::new(&uri).await.expect("test database connection")
    }

    fn fresh_user() -> String {
        ObjectId::new().to_hex()
    }

    async fn seed_need(db: &MongoDB, owner: &str, slots: i64) -> String {
        let request = CreateNeedRequest {
            thumbnail: "https://img.example.com/kitchen.jpg".to_string(),
            post_title: "Community kitchen".to_string(),
            description: "Serve meals on Saturday".to_string(),
            category: "social service".to_string(),
            location: "Dhaka".to_string(),
            volunteers_needed: json!(slots),
            deadline: 1_900_000_000,
            organizer_name: "Anika".to_string(),
            organizer_email: "anika@example.com".to_string(),
        };
        need_service::create(db, owner, request).await.unwrap().id
    }

    fn signup(need_id: &str, name: &str) -> CreateVolunteerRequest {
        CreateVolunteerRequest {
            need_id: need_id.to_string(),
            volunteer_name: name.to_string(),
            volunteer_email: format!("{}@example.com", name),
            suggestion: "Happy to help with setup".to_string(),
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn request_claims_a_slot_until_exhausted() {
        let db = test_db().await;
        let organizer = fresh_user();
        let need_id = seed_need(&db, &organizer, 1).await;

        let volunteer = fresh_user();
        let created = create(&db, &volunteer, signup(&need_id, "karim")).await.unwrap();
        assert_eq!(created.status, RequestStatus::Requested);
        assert_eq!(created.owner_id, volunteer);

        let need = need_service::find_by_id(&db, &ObjectId::parse_str(&need_id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(need.volunteers_needed, 0);

        let err = create(&db, &fresh_user(), signup(&need_id, "late"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Exhausted(_)));

        // Guard held: still zero, never negative
        let need = need_service::find_by_id(&db, &ObjectId::parse_str(&need_id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(need.volunteers_needed, 0);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn concurrent_signups_never_oversubscribe() {
        let db = test_db().await;
        let organizer = fresh_user();
        let slots = 5;
        let need_id = seed_need(&db, &organizer, slots).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let db = db.clone();
            let need_id = need_id.clone();
            handles.push(tokio::spawn(async move {
                let volunteer = fresh_user();
                create(&db, &volunteer, signup(&need_id, &format!("vol{}", i))).await
            }));
        }

        let mut accepted = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(AppError::Exhausted(_)) => exhausted += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(accepted, slots);
        assert_eq!(exhausted, 8 - slots);

        let need = need_service::find_by_id(&db, &ObjectId::parse_str(&need_id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(need.volunteers_needed, 0);

        let stored = db
            .collection::<VolunteerRequest>(REQUESTS_COLLECTION)
            .count_documents(doc! { "need_id": &need_id })
            .await
            .unwrap();
        assert_eq!(stored, slots as u64);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn request_for_missing_need_is_not_found() {
        let db = test_db().await;

        let ghost = ObjectId::new().to_hex();
        let err = create(&db, &fresh_user(), signup(&ghost, "nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = create(&db, &fresh_user(), signup("not-hex", "nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn withdraw_is_ownership_scoped() {
        let db = test_db().await;
        let organizer = fresh_user();
        let need_id = seed_need(&db, &organizer, 3).await;

        let volunteer = fresh_user();
        let created = create(&db, &volunteer, signup(&need_id, "karim")).await.unwrap();

        let err = delete(&db, &fresh_user(), &created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(list_owned_by(&db, &volunteer).await.unwrap().len(), 1);

        delete(&db, &volunteer, &created.id).await.unwrap();
        assert!(list_owned_by(&db, &volunteer).await.unwrap().is_empty());

        let err = delete(&db, &volunteer, &created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
