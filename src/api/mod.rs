pub mod admin;
pub mod auth;
pub mod caregiver;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod support;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

use crate::store::PageRequest;
use serde::Deserialize;

/// `?page=&limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
