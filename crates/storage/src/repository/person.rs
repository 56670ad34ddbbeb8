use sqlx::PgPool;

use crate::dto::person::{PersonFilter, PersonPatch, ReplacePersonRequest};
use crate::error::{Result, StorageError};
use crate::models::{NewPerson, Person};
use crate::query::{self, PERSON_COLUMNS};

pub struct PersonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PersonRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List persons matching every supplied filter, ordered by id
    pub async fn list(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
        let fields = filter.fields();
        let mut query = query::select_persons(&fields, &filter.pagination);

        tracing::debug!(
            filters = ?fields.columns(),
            limit = filter.pagination.limit,
            offset = filter.pagination.offset,
            "Listing persons"
        );

        let persons: Vec<Person> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(persons)
    }

    /// Find person by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Person> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(person)
    }

    /// Insert a person and return it with the store-assigned id
    pub async fn create(&self, person: &NewPerson) -> Result<Person> {
        let created = sqlx::query_as::<_, Person>(&format!(
            r#"
            INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PERSON_COLUMNS}
            "#
        ))
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(person.age)
        .bind(&person.gender)
        .bind(&person.nationality)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Overwrite every column of an existing person
    pub async fn replace(&self, id: i32, req: &ReplacePersonRequest) -> Result<Person> {
        let person = sqlx::query_as::<_, Person>(&format!(
            r#"
            UPDATE persons
            SET name = $2,
                surname = $3,
                patronymic = $4,
                age = $5,
                gender = $6,
                nationality = $7
            WHERE id = $1
            RETURNING {PERSON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.surname)
        .bind(&req.patronymic)
        .bind(req.age)
        .bind(&req.gender)
        .bind(&req.nationality)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(person)
    }

    /// Apply the present fields of `patch`, then re-read the row.
    ///
    /// The update and the re-read are separate statements.
    pub async fn patch(&self, id: i32, patch: &PersonPatch) -> Result<Person> {
        let fields = patch.fields();
        let mut query = query::update_person(id, &fields)?;

        tracing::debug!(id, columns = ?fields.columns(), "Patching person");

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.find_by_id(id).await
    }

    /// Delete a person by ID
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM persons")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
