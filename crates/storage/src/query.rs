//! SQL composition for the person table.
//!
//! Only column names and keywords are written into the statement text, and
//! those come from [`PersonColumn`]. Every caller-supplied value goes through
//! `push_bind` and reaches the driver as a positional parameter.

use sqlx::{Postgres, QueryBuilder};

use crate::dto::common::Pagination;
use crate::error::{Result, StorageError};

pub const PERSON_COLUMNS: &str = "id, name, surname, patronymic, age, gender, nationality";

/// Columns that can be filtered on or patched. `id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonColumn {
    Name,
    Surname,
    Patronymic,
    Age,
    Gender,
    Nationality,
}

impl PersonColumn {
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Patronymic => "patronymic",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

/// Ordered `(column, value)` pairs. Insertion order decides parameter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    entries: Vec<(PersonColumn, FieldValue)>,
}

impl PersonFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: PersonColumn, value: impl Into<FieldValue>) {
        self.entries.push((column, value.into()));
    }

    /// Pushes the value only when there is one.
    pub fn push_opt<V: Into<FieldValue>>(&mut self, column: PersonColumn, value: Option<V>) {
        if let Some(value) = value {
            self.push(column, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(c, _)| c.as_column()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PersonColumn, FieldValue)> {
        self.entries.iter()
    }
}

fn push_pairs(
    builder: &mut QueryBuilder<'static, Postgres>,
    fields: &PersonFields,
    separator: &'static str,
) {
    let mut pairs = builder.separated(separator);
    for (column, value) in fields.iter() {
        pairs.push(column.as_column());
        pairs.push_unseparated(" = ");
        match value {
            FieldValue::Text(text) => pairs.push_bind_unseparated(text.clone()),
            FieldValue::Int(number) => pairs.push_bind_unseparated(*number),
        };
    }
}

/// `SELECT ... WHERE <col> = $n AND ... ORDER BY id LIMIT $n OFFSET $n`.
/// No WHERE clause is emitted when `filters` is empty.
pub fn select_persons(
    filters: &PersonFields,
    pagination: &Pagination,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {PERSON_COLUMNS} FROM persons"));

    if !filters.is_empty() {
        builder.push(" WHERE ");
        push_pairs(&mut builder, filters, " AND ");
    }

    builder.push(" ORDER BY id LIMIT ");
    builder.push_bind(pagination.limit);
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset);

    builder
}

/// `UPDATE persons SET <col> = $n, ... WHERE id = $n`.
///
/// Fails with [`StorageError::NoFieldsToUpdate`] when `fields` is empty, since
/// such a statement has nothing to set.
pub fn update_person(id: i32, fields: &PersonFields) -> Result<QueryBuilder<'static, Postgres>> {
    if fields.is_empty() {
        return Err(StorageError::NoFieldsToUpdate);
    }

    let mut builder = QueryBuilder::new("UPDATE persons SET ");
    push_pairs(&mut builder, fields, ", ");
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    Ok(builder)
}
