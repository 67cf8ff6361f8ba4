use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::token_service::{self, Claims, TokenConfig};
use crate::utils::AppError;

/// Name of the cookie carrying the identity token
pub const TOKEN_COOKIE: &str = "token";

/// Guard for protected routes: extracts the `token` cookie, verifies it and
/// injects the resolved [`Claims`] into the request extensions. Handlers
/// behind it receive the identity via `web::ReqData<Claims>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = match req.app_data::<web::Data<TokenConfig>>() {
            Some(config) => config.clone(),
            None => {
                return Box::pin(async move {
                    Err(AppError::Internal("Token config not registered".to_string()).into())
                });
            }
        };

        let cookie = match req.cookie(TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => {
                return Box::pin(async move {
                    Err(AppError::Unauthorized("No token cookie".to_string()).into())
                });
            }
        };

        match token_service::verify_token(&config, cookie.value()) {
            Ok(claims) => {
                req.extensions_mut().insert::<Claims>(claims);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res)
                })
            }
            Err(e) => {
                log::warn!("🔒 Rejected token: {}", e);
                Box::pin(async move { Err(AppError::from(e).into()) })
            }
        }
    }
}
