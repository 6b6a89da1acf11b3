use axum::{Router, routing::get};

use crate::modules::menu::controller::get_faculty_menu;
use crate::state::AppState;

pub fn init_menu_router() -> Router<AppState> {
    Router::new().route("/faculty", get(get_faculty_menu))
}
