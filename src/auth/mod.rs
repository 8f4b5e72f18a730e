mod helpers;
mod middleware;
mod password;
mod token;

pub use helpers::extract_bearer_token;
pub use middleware::{AuthError, RequireUser};
pub use password::{hash_password, verify_password};
pub use token::{TokenGenerator, parse_token};
