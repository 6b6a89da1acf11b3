use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry of the faculty portal menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub title: String,
    pub icon: String,
    pub color: String,
    pub path: String,
    pub description: String,
    pub admin_only: bool,
}
