use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{
    database::MongoDB,
    models::{CreateVolunteerRequest, RequestResponse},
    services::{need_service, request_service, token_service::Claims},
};

/// POST /api/request_volunteer - Apply for a post and claim an open slot
#[utoipa::path(
    post,
    path = "/api/request_volunteer",
    tag = "Requests",
    request_body = CreateVolunteerRequest,
    responses(
        (status = 201, description = "Request submitted, slot claimed", body = RequestResponse),
        (status = 404, description = "Referenced post does not exist"),
        (status = 409, description = "No volunteer slots remaining"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_volunteer_request(
    user: web::ReqData<Claims>,
    body: web::Json<CreateVolunteerRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    log::info!(
        "📝 POST /request_volunteer - user {} for post {}",
        user_id,
        body.need_id
    );

    match request_service::create(&db, user_id, body.into_inner()).await {
        Ok(request) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "request": request
        })),
        Err(e) => e.error_response(),
    }
}

/// GET /api/user_request_volunteer/{id} - Requests submitted by the caller
pub async fn get_user_requests(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    if let Err(e) = need_service::ensure_path_owner(&path, user_id) {
        log::warn!("🚫 User {} asked for requests of {}", user_id, path);
        return e.error_response();
    }

    match request_service::list_owned_by(&db, user_id).await {
        Ok(requests) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "requests": requests,
            "total": requests.len()
        })),
        Err(e) => e.error_response(),
    }
}

/// DELETE /api/request_volunteer/{id} - Withdraw a request the caller owns
pub async fn delete_volunteer_request(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;

    log::info!("🗑️  DELETE /request_volunteer/{} - user {}", path, user_id);

    match request_service::delete(&db, user_id, &path).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Volunteer request deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}
