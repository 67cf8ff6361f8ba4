use crate::{
    database::{MongoDB, USERS_COLLECTION},
    models::{User, UserInfo},
    utils::AppError,
};
use mongodb::bson::doc;

/// Resolve a user record by email. User accounts are created by the frontend
/// auth provider; this service only ever reads them.
pub async fn find_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let user = collection.find_one(doc! { "email": email }).await?;

    Ok(user)
}

/// Profile of the authenticated user, without internal fields
pub async fn get_profile(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserInfo::from(user))
}
