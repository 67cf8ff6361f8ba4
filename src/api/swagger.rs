use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Volunteer Service API",
        version = "1.0.0",
        description = "Backend API for the volunteer coordination platform.\n\n**Authentication:** Protected endpoints read a signed identity token from the HTTP-only `token` cookie, obtained via `POST /jwt`. Tokens are valid for 4 hours.\n\n**Features:**\n- Volunteer opportunity posts with open slot tracking\n- Ownership-scoped editing: only the organizer who created a post can change or remove it\n- Volunteer requests that atomically claim a slot on the referenced post",
        contact(
            name = "Volunteer Service Team",
            email = "support@volunteer-service.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::issue_jwt,
        crate::api::auth::get_user_data,

        // Health
        crate::api::health::health_check,

        // Needs
        crate::api::needs::get_upcoming_needs,
        crate::api::needs::create_need,

        // Requests
        crate::api::requests::create_volunteer_request,
    ),
    components(
        schemas(
            // Auth
            crate::api::auth::IssueTokenRequest,
            crate::models::UserInfo,

            // Health
            crate::api::health::HealthResponse,

            // Needs
            crate::models::CreateNeedRequest,
            crate::models::UpdateNeedRequest,
            crate::models::NeedResponse,

            // Requests
            crate::models::CreateVolunteerRequest,
            crate::models::RequestResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance and user profile endpoints. Identity is resolved by email and proven by a signed cookie."),
        (name = "Health", description = "Health check endpoints for monitoring service status."),
        (name = "Needs", description = "Volunteer opportunity posts. Creation, editing and removal are scoped to the owning organizer."),
        (name = "Requests", description = "Volunteer applications. Submitting one claims an open slot on the referenced post."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
            );
        }
    }
}
