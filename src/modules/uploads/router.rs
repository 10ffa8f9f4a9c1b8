use crate::modules::uploads::controller::{
    create_upload, delete_upload, get_upload, get_uploads, replace_upload,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_uploads_router() -> Router<AppState> {
    Router::new()
        .route("/{kind}", post(create_upload).get(get_uploads))
        .route(
            "/{kind}/{id}",
            get(get_upload).put(replace_upload).delete(delete_upload),
        )
}
