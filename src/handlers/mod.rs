pub mod api;

pub use api::{api_get, api_options, api_post};
