pub mod auth;

pub use auth::{authorize, token_auth, TOKEN_HEADER};
