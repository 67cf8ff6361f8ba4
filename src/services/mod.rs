pub mod auth_service;
pub mod need_service;
pub mod request_service;
pub mod token_service;
