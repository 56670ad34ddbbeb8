use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod features;
pub mod state;

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::persons::handlers::list_persons,
        features::persons::handlers::get_person,
        features::persons::handlers::create_person,
        features::persons::handlers::replace_person,
        features::persons::handlers::patch_person,
        features::persons::handlers::delete_person,
    ),
    components(
        schemas(
            storage::models::Person,
            storage::dto::person::CreatePersonRequest,
            storage::dto::person::ReplacePersonRequest,
            storage::dto::person::PersonPatch,
            storage::dto::common::ErrorResponse,
        )
    ),
    tags(
        (name = "persons", description = "Person CRUD with enrichment on create"),
    )
)]
pub struct ApiDoc;

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/persons", features::persons::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
