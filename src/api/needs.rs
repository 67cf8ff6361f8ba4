use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{
    database::MongoDB,
    models::{CreateNeedRequest, NeedResponse, UpdateNeedRequest},
    services::{need_service, token_service::Claims},
};

/// Upcoming posts are capped to a single landing-page row
const UPCOMING_LIMIT: i64 = 6;

/// GET /api/add_volunteer_post - Upcoming posts, soonest deadline first
#[utoipa::path(
    get,
    path = "/api/add_volunteer_post",
    tag = "Needs",
    responses(
        (status = 200, description = "At most 6 posts, ascending deadline", body = [NeedResponse])
    )
)]
pub async fn get_upcoming_needs(db: web::Data<MongoDB>) -> impl Responder {
    match need_service::list_upcoming(&db, UPCOMING_LIMIT).await {
        Ok(needs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "needs": needs,
            "total": needs.len()
        })),
        Err(e) => e.error_response(),
    }
}

/// GET /api/user_volunteer_post/{id} - Posts owned by the authenticated user
pub async fn get_user_needs(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    if let Err(e) = need_service::ensure_path_owner(&path, user_id) {
        log::warn!("🚫 User {} asked for posts of {}", user_id, path);
        return e.error_response();
    }

    match need_service::list_owned_by(&db, user_id).await {
        Ok(needs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "needs": needs,
            "total": needs.len()
        })),
        Err(e) => e.error_response(),
    }
}

/// POST /api/add_volunteer_post - Create a post owned by the caller
#[utoipa::path(
    post,
    path = "/api/add_volunteer_post",
    tag = "Needs",
    request_body = CreateNeedRequest,
    responses(
        (status = 201, description = "Post created", body = NeedResponse),
        (status = 400, description = "volunteers_needed is not a non-negative integer"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_need(
    user: web::ReqData<Claims>,
    body: web::Json<CreateNeedRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    log::info!("📝 POST /add_volunteer_post - user {}", user_id);

    match need_service::create(&db, user_id, body.into_inner()).await {
        Ok(need) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "need": need
        })),
        Err(e) => e.error_response(),
    }
}

/// PUT /api/add_volunteer_post/{id} - Update a post the caller owns
pub async fn update_need(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<UpdateNeedRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    log::info!("🔧 PUT /add_volunteer_post/{} - user {}", path, user_id);

    match need_service::update(&db, user_id, &path, body.into_inner()).await {
        Ok(need) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "need": need
        })),
        Err(e) => e.error_response(),
    }
}

/// DELETE /api/add_volunteer_post/{id} - Delete a post the caller owns
pub async fn delete_need(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    log::info!("🗑️  DELETE /add_volunteer_post/{} - user {}", path, user_id);

    match need_service::delete(&db, user_id, &path).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Volunteer post deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}
