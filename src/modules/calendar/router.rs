use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::calendar::controller::{create_event, delete_event, get_events, update_event};
use crate::state::AppState;

pub fn init_calendar_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(get_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
}
