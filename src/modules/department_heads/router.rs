use crate::modules::department_heads::controller::{
    create_department_head, delete_department_head, get_department_head, get_department_heads,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_department_heads_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_department_head).get(get_department_heads))
        .route(
            "/{id}",
            get(get_department_head).delete(delete_department_head),
        )
}
