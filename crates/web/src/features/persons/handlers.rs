use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        common::ErrorResponse,
        person::{CreatePersonRequest, PersonListParams, PersonPatch, ReplacePersonRequest},
    },
    models::Person,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/persons",
    params(PersonListParams),
    responses(
        (status = 200, description = "Persons matching every supplied filter, ordered by id", body = Vec<Person>),
        (status = 400, description = "Invalid limit, offset or age", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn list_persons(
    State(state): State<AppState>,
    params: Result<Query<PersonListParams>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;
    let filter = params.into_filter().map_err(WebError::BadRequest)?;

    let persons = services::list_persons(state.db.pool(), &filter).await?;
    tracing::info!(count = persons.len(), "Listed persons");

    Ok(Json(persons).into_response())
}

#[utoipa::path(
    get,
    path = "/persons/{id}",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    responses(
        (status = 200, description = "Person found", body = Person),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn get_person(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let person = services::get_person(state.db.pool(), id).await?;

    Ok(Json(person).into_response())
}

#[utoipa::path(
    post,
    path = "/persons",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created and enriched", body = Person),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let person = services::create_person(state.db.pool(), &state.enricher, req).await?;
    tracing::info!(id = person.id, "Person created");

    Ok((StatusCode::CREATED, Json(person)).into_response())
}

#[utoipa::path(
    put,
    path = "/persons/{id}",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    request_body = ReplacePersonRequest,
    responses(
        (status = 200, description = "Person replaced", body = Person),
        (status = 400, description = "Invalid ID or body", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn replace_person(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ReplacePersonRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    req.validate()?;

    let person = services::replace_person(state.db.pool(), id, &req).await?;
    tracing::info!(id, "Person replaced");

    Ok(Json(person).into_response())
}

#[utoipa::path(
    patch,
    path = "/persons/{id}",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    request_body = PersonPatch,
    responses(
        (status = 200, description = "Person after the update", body = Person),
        (status = 400, description = "Invalid ID, body, or no fields to update", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn patch_person(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<PersonPatch>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;

    let person = services::patch_person(state.db.pool(), id, &patch).await?;
    tracing::info!(id, "Person patched");

    Ok(Json(person).into_response())
}

#[utoipa::path(
    delete,
    path = "/persons/{id}",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn delete_person(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    services::delete_person(state.db.pool(), id).await?;
    tracing::info!(id, "Person deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
