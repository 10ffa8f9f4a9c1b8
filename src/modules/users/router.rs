use crate::modules::users::controller::{
    create_user, delete_user, get_user, get_users, reset_picture, update_profile, upload_picture,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_profile).delete(delete_user),
        )
        .route("/{id}/picture", put(upload_picture).delete(reset_picture))
}
