use enrichment::Enricher;
use sqlx::PgPool;
use storage::{
    dto::person::{CreatePersonRequest, PersonFilter, PersonPatch, ReplacePersonRequest},
    error::Result,
    models::{NewPerson, Person},
    repository::person::PersonRepository,
};

/// List persons matching the filter
pub async fn list_persons(pool: &PgPool, filter: &PersonFilter) -> Result<Vec<Person>> {
    let repo = PersonRepository::new(pool);
    repo.list(filter).await
}

/// Get person by ID
pub async fn get_person(pool: &PgPool, id: i32) -> Result<Person> {
    let repo = PersonRepository::new(pool);
    repo.find_by_id(id).await
}

/// Enrich and store a new person. Enrichment failures never reach the caller.
pub async fn create_person(
    pool: &PgPool,
    enricher: &Enricher,
    request: CreatePersonRequest,
) -> Result<Person> {
    let mut person = NewPerson::from(request);
    enricher.enrich(&mut person).await;

    let repo = PersonRepository::new(pool);
    repo.create(&person).await
}

/// Replace every field of a person
pub async fn replace_person(
    pool: &PgPool,
    id: i32,
    request: &ReplacePersonRequest,
) -> Result<Person> {
    let repo = PersonRepository::new(pool);
    repo.replace(id, request).await
}

/// Apply a partial update and return the stored row
pub async fn patch_person(pool: &PgPool, id: i32, patch: &PersonPatch) -> Result<Person> {
    let repo = PersonRepository::new(pool);
    repo.patch(id, patch).await
}

/// Delete a person
pub async fn delete_person(pool: &PgPool, id: i32) -> Result<()> {
    let repo = PersonRepository::new(pool);
    repo.delete(id).await
}
