pub mod blogging;
pub mod common;

pub use blogging::{blogging_routes, fault_layer, headers_policy};
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;

/// Full application: blogging API plus health and version.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    blogging_routes(state, max_body_bytes).merge(common_routes())
}
