mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::token_service::TokenConfig;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Volunteer Service...");

    // Signing key is read once here; everything downstream gets it as app data
    let token_data = web::Data::new(TokenConfig::from_env());

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173") // Frontend dev server (Vite)
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials() // The identity token travels as a cookie
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(token_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Liveness
            .route("/", web::get().to(api::health::liveness))
            .route("/health", web::get().to(api::health::health_check))
            // Auth
            .route("/jwt", web::post().to(api::auth::issue_jwt))
            .service(
                web::resource("/api/user_data")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::get().to(api::auth::get_user_data)),
            )
            // Public listing and protected create share this path; resource-level
            // method guards let the router fall through to the right one
            .service(
                web::resource("/api/add_volunteer_post")
                    .guard(guard::Get())
                    .route(web::get().to(api::needs::get_upcoming_needs)),
            )
            .service(
                web::resource("/api/add_volunteer_post")
                    .guard(guard::Post())
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::post().to(api::needs::create_need)),
            )
            .service(
                web::resource("/api/add_volunteer_post/{id}")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::put().to(api::needs::update_need))
                    .route(web::delete().to(api::needs::delete_need)),
            )
            .service(
                web::resource("/api/user_volunteer_post/{id}")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::get().to(api::needs::get_user_needs)),
            )
            .service(
                web::resource("/api/user_request_volunteer/{id}")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::get().to(api::requests::get_user_requests)),
            )
            .service(
                web::resource("/api/request_volunteer")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::post().to(api::requests::create_volunteer_request)),
            )
            .service(
                web::resource("/api/request_volunteer/{id}")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::delete().to(api::requests::delete_volunteer_request)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
