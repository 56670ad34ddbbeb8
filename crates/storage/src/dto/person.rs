use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::Pagination;
use crate::models::NewPerson;
use crate::query::{PersonColumn, PersonFields};

pub const GENDERS: &[&str] = &["male", "female", "other"];

/// Width of the `nationality` column.
pub const NATIONALITY_MAX_LEN: usize = 8;

/// Request payload for creating a person. Age, gender and nationality are
/// never accepted here; they come from enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePersonRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    #[schema(example = "Dmitriy")]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Surname must be between 1 and 255 characters"
    ))]
    #[schema(example = "Ushakov")]
    pub surname: String,

    #[validate(length(max = 255))]
    #[schema(example = "Vasilevich")]
    pub patronymic: Option<String>,
}

impl From<CreatePersonRequest> for NewPerson {
    fn from(req: CreatePersonRequest) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
            patronymic: req.patronymic,
            ..Default::default()
        }
    }
}

/// Request payload for replacing every field of a person. Fields left out
/// of the body are stored as NULL. An `id` in the body is ignored in favour
/// of the path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReplacePersonRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Surname must be between 1 and 255 characters"
    ))]
    pub surname: String,

    #[validate(length(max = 255))]
    pub patronymic: Option<String>,

    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i32>,

    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    #[validate(length(max = 8))]
    pub nationality: Option<String>,
}

/// Partial update. Absent (or `null`) fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PersonPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub surname: Option<String>,

    #[validate(length(max = 255))]
    pub patronymic: Option<String>,

    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i32>,

    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    #[validate(length(max = 8))]
    pub nationality: Option<String>,
}

impl PersonPatch {
    /// Present fields in column order.
    pub fn fields(&self) -> PersonFields {
        let mut fields = PersonFields::new();
        fields.push_opt(PersonColumn::Name, self.name.as_deref());
        fields.push_opt(PersonColumn::Surname, self.surname.as_deref());
        fields.push_opt(PersonColumn::Patronymic, self.patronymic.as_deref());
        fields.push_opt(PersonColumn::Age, self.age);
        fields.push_opt(PersonColumn::Gender, self.gender.as_deref());
        fields.push_opt(PersonColumn::Nationality, self.nationality.as_deref());
        fields
    }
}

/// Raw list query. Kept as strings so that parse failures surface as a
/// JSON error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PersonListParams {
    /// Number of items to return (default 10)
    pub limit: Option<String>,
    /// Number of items to skip (default 0)
    pub offset: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<String>,
    /// One of male, female, other
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

/// Parsed list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub pagination: Pagination,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl PersonListParams {
    /// Empty filter values impose no constraint. `limit`, `offset` and `age`
    /// must parse when given.
    pub fn into_filter(self) -> Result<PersonFilter, String> {
        let pagination = Pagination::parse(self.limit.as_deref(), self.offset.as_deref())?;

        let age = match non_empty(self.age) {
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| "Invalid age parameter".to_string())?,
            ),
            None => None,
        };

        Ok(PersonFilter {
            pagination,
            name: non_empty(self.name),
            surname: non_empty(self.surname),
            patronymic: non_empty(self.patronymic),
            age,
            gender: non_empty(self.gender),
            nationality: non_empty(self.nationality),
        })
    }
}

impl PersonFilter {
    pub fn fields(&self) -> PersonFields {
        let mut fields = PersonFields::new();
        fields.push_opt(PersonColumn::Name, self.name.as_deref());
        fields.push_opt(PersonColumn::Surname, self.surname.as_deref());
        fields.push_opt(PersonColumn::Patronymic, self.patronymic.as_deref());
        fields.push_opt(PersonColumn::Age, self.age);
        fields.push_opt(PersonColumn::Gender, self.gender.as_deref());
        fields.push_opt(PersonColumn::Nationality, self.nationality.as_deref());
        fields
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_gender(gender: &str) -> Result<(), validator::ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_gender");
        error.message = Some("Gender must be one of male, female, other".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_with_no_fields_is_empty() {
        let patch: PersonPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.fields().is_empty());
    }

    #[test]
    fn test_patch_null_is_absent() {
        let patch: PersonPatch = serde_json::from_str(r#"{"age": null, "surname": "Ivanov"}"#).unwrap();
        let fields = patch.fields();
        assert_eq!(fields.columns(), vec!["surname"]);
    }

    #[test]
    fn test_patch_fields_follow_column_order() {
        let patch = PersonPatch {
            nationality: Some("RU".into()),
            name: Some("Ivan".into()),
            age: Some(33),
            ..Default::default()
        };
        assert_eq!(patch.fields().columns(), vec!["name", "age", "nationality"]);
    }

    #[test]
    fn test_patch_rejects_unknown_gender() {
        let patch = PersonPatch {
            gender: Some("robot".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_rejects_negative_age() {
        let patch = PersonPatch {
            age: Some(-3),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_create_requires_non_empty_name() {
        let req = CreatePersonRequest {
            name: String::new(),
            surname: "Ushakov".into(),
            patronymic: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_rejects_missing_surname() {
        let result = serde_json::from_str::<CreatePersonRequest>(r#"{"name": "Dmitriy"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_ignores_predicted_fields() {
        let req: CreatePersonRequest =
            serde_json::from_str(r#"{"name": "Dmitriy", "surname": "Ushakov", "age": 99}"#).unwrap();
        let person = NewPerson::from(req);
        assert_eq!(person.age, None);
        assert_eq!(person.name, "Dmitriy");
    }

    #[test]
    fn test_replace_accepts_known_gender() {
        let req: ReplacePersonRequest = serde_json::from_str(
            r#"{"id": 4, "name": "Ann", "surname": "Lee", "age": 30, "gender": "female"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.nationality, None);
    }

    #[test]
    fn test_filter_ignores_empty_values() {
        let params = PersonListParams {
            name: Some("Ann".into()),
            surname: Some(String::new()),
            age: Some(String::new()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert_eq!(filter.fields().columns(), vec!["name"]);
        assert_eq!(filter.pagination, Pagination::default());
    }

    #[test]
    fn test_filter_parses_age() {
        let params = PersonListParams {
            name: Some("Ann".into()),
            age: Some("30".into()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert_eq!(filter.age, Some(30));
        assert_eq!(filter.fields().columns(), vec!["name", "age"]);
    }

    #[test]
    fn test_filter_rejects_bad_age() {
        let params = PersonListParams {
            age: Some("thirty".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap_err(), "Invalid age parameter");
    }

    #[test]
    fn test_filter_rejects_padded_age() {
        let params = PersonListParams {
            age: Some(" 30".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap_err(), "Invalid age parameter");
    }

    #[test]
    fn test_filter_rejects_bad_limit() {
        let params = PersonListParams {
            limit: Some("-5".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap_err(), "Invalid limit parameter");
    }
}
