use axum::{Router, routing::get};

use super::handlers::{
    create_person, delete_person, get_person, list_persons, patch_person, replace_person,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route(
            "/:id",
            get(get_person)
                .put(replace_person)
                .patch(patch_person)
                .delete(delete_person),
        )
}
