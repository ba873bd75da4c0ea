use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/slots",
            get(handlers::slot::list_slots).post(handlers::slot::create_slots),
        )
        .route(
            "/api/slots/number/:slot_number",
            get(handlers::slot::get_slot_by_number),
        )
        .route(
            "/api/slots/:id",
            get(handlers::slot::get_slot)
                .put(handlers::slot::update_slot)
                .delete(handlers::slot::delete_slot),
        )
        .route("/api/slots/:id/book", post(handlers::slot::book_slot))
        .route("/api/slots/:id/release", post(handlers::slot::release_slot))
}
