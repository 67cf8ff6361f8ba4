use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    web, HttpResponse, ResponseError,
};
use serde::Deserialize;

use crate::{
    database::MongoDB,
    middleware::auth::TOKEN_COOKIE,
    models::UserInfo,
    services::auth_service,
    services::token_service::{self, Claims, TokenConfig},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct IssueTokenRequest {
    pub email: String,
}

/// POST /jwt - Issue an identity token for a known user
///
/// The token is returned as an HTTP-only cookie; the browser replays it on
/// every protected request.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Token issued, cookie set", body = UserInfo),
        (status = 404, description = "Email not known")
    )
)]
pub async fn issue_jwt(
    db: web::Data<MongoDB>,
    config: web::Data<TokenConfig>,
    request: web::Json<IssueTokenRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    match auth_service::find_by_email(&db, &request.email).await {
        Ok(Some(user)) => match token_service::issue_token(&config, &user.user_id, &user.email) {
            Ok(token) => {
                let cookie = Cookie::build(TOKEN_COOKIE, token)
                    .http_only(true)
                    .path("/")
                    .max_age(CookieDuration::hours(4))
                    .finish();

                log::info!("✅ Token issued for user {}", user.user_id);
                HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
                    "success": true,
                    "user": UserInfo::from(user)
                }))
            }
            Err(e) => e.error_response(),
        },
        Ok(None) => {
            log::warn!("❌ Token requested for unknown email: {}", request.email);
            HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "User not found"
            }))
        }
        Err(e) => e.error_response(),
    }
}

/// GET /api/user_data - Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/user_data",
    tag = "Auth",
    responses(
        (status = 200, description = "Profile retrieved", body = UserInfo),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn get_user_data(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("👤 GET /user_data - user {}", user.sub);

    match auth_service::get_profile(&db, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": profile
        })),
        Err(e) => e.error_response(),
    }
}
