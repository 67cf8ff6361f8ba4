pub mod need;
pub mod user;
pub mod volunteer_request;

pub use need::*;
pub use user::*;
pub use volunteer_request::*;
