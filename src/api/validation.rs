//! Request bodies and their shape validation. Every field is optional at the serde
//! level so a missing field is reported per field instead of as a JSON error.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::models::{AthleteFields, EntityKind, RowVersion};
use crate::error::ApiError;

/// Collects per-field validation messages keyed by wire name
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    fn required_text(&mut self, field: &str, label: &str, value: Option<String>, max: usize) -> String {
        match value {
            Some(text) if !text.trim().is_empty() => {
                if text.chars().count() > max {
                    self.add(field, format!("{} cannot be more than {} characters long.", label, max));
                }
                text
            }
            _ => {
                self.add(field, format!("{} is required.", label));
                String::new()
            }
        }
    }

    fn optional_text(&mut self, field: &str, label: &str, value: Option<String>, max: usize) -> Option<String> {
        let text = value.filter(|text| !text.trim().is_empty())?;
        if text.chars().count() > max {
            self.add(field, format!("{} cannot be more than {} characters long.", label, max));
        }
        Some(text)
    }

    fn required<T>(&mut self, field: &str, label: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, format!("{} is required.", label));
        }
        value
    }

    /// `Ok` when nothing was recorded, otherwise a validation error naming the entity
    pub fn finish(self, kind: EntityKind) -> Result<(), ApiError> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(ApiError::validation_error(
            format!("Invalid {} data", kind),
            Some(self.0),
        ))
    }
}

/// Body id must be present and equal to the path id
fn check_id(kind: EntityKind, body_id: Option<i32>, path_id: i32) -> Result<(), ApiError> {
    if body_id != Some(path_id) {
        return Err(ApiError::id_mismatch(kind));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let (date, rest) = match (value.get(..10), value.get(10..)) {
        (Some(date), Some(rest)) => (date, rest),
        _ => (value, ""),
    };
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Code and name, validated for one of the two code-keyed entities
#[derive(Debug, Clone, PartialEq)]
pub struct CodeNameFields {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportInput {
    pub id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub row_version: Option<RowVersion>,
}

impl SportInput {
    const CODE_MAX: usize = 3;
    const NAME_MAX: usize = 50;

    fn fields(self, errors: &mut FieldErrors) -> CodeNameFields {
        CodeNameFields {
            code: errors.required_text("code", "Sport Code", self.code, Self::CODE_MAX),
            name: errors.required_text("name", "Sport Name", self.name, Self::NAME_MAX),
        }
    }

    pub fn into_create(self) -> Result<CodeNameFields, ApiError> {
        let mut errors = FieldErrors::default();
        let fields = self.fields(&mut errors);
        errors.finish(EntityKind::Sport)?;
        Ok(fields)
    }

    /// Validated fields plus the caller's row version
    pub fn into_update(self, path_id: i32) -> Result<(CodeNameFields, RowVersion), ApiError> {
        check_id(EntityKind::Sport, self.id, path_id)?;
        let mut errors = FieldErrors::default();
        let token = errors.required("rowVersion", "Row Version", self.row_version);
        let fields = self.fields(&mut errors);
        errors.finish(EntityKind::Sport)?;
        Ok((fields, token.unwrap_or_default()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingentInput {
    pub id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl ContingentInput {
    const CODE_MAX: usize = 2;
    const NAME_MAX: usize = 50;

    fn fields(self, errors: &mut FieldErrors) -> CodeNameFields {
        CodeNameFields {
            code: errors.required_text("code", "Contingent Code", self.code, Self::CODE_MAX),
            name: errors.required_text("name", "Contingent Name", self.name, Self::NAME_MAX),
        }
    }

    pub fn into_create(self) -> Result<CodeNameFields, ApiError> {
        let mut errors = FieldErrors::default();
        let fields = self.fields(&mut errors);
        errors.finish(EntityKind::Contingent)?;
        Ok(fields)
    }

    pub fn into_update(self, path_id: i32) -> Result<CodeNameFields, ApiError> {
        check_id(EntityKind::Contingent, self.id, path_id)?;
        self.into_create()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteInput {
    pub id: Option<i32>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub athlete_code: Option<String>,
    pub dob: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<f64>,
    pub affiliation: Option<String>,
    pub media_info: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "sportID", alias = "sportId")]
    pub sport_id: Option<i32>,
    #[serde(rename = "contingentID", alias = "contingentId")]
    pub contingent_id: Option<i32>,
    pub row_version: Option<RowVersion>,
}

impl AthleteInput {
    fn fields(self, errors: &mut FieldErrors) -> Option<AthleteFields> {
        let first_name = errors.required_text("firstName", "First Name", self.first_name, 50);
        let middle_name = errors.optional_text("middleName", "Middle Name", self.middle_name, 50);
        let last_name = errors.required_text("lastName", "Last Name", self.last_name, 100);
        let athlete_code = errors.required_text("athleteCode", "Athlete Code", self.athlete_code, 7);
        let affiliation = errors.required_text("affiliation", "Affiliation", self.affiliation, 255);
        let media_info = errors.required_text("mediaInfo", "Media Info", self.media_info, 2000);

        let gender = errors.required_text("gender", "Gender", self.gender, 1);

        let dob = match errors.required("dob", "Date of Birth", self.dob) {
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    errors.add("dob", "Date of Birth must be a date in YYYY-MM-DD format.");
                }
                parsed
            }
            None => None,
        };

        let height = errors.required("height", "Height", self.height);
        if matches!(height, Some(h) if h <= 0) {
            errors.add("height", "Height must be greater than zero.");
        }
        let weight = errors.required("weight", "Weight", self.weight);
        if matches!(weight, Some(w) if !(w.is_finite() && w > 0.0)) {
            errors.add("weight", "Weight must be greater than zero.");
        }

        let sport_id = errors.required("sportID", "Sport", self.sport_id);
        let contingent_id = errors.required("contingentID", "Contingent", self.contingent_id);

        Some(AthleteFields {
            first_name,
            middle_name,
            last_name,
            athlete_code,
            dob: dob?,
            height: height?,
            weight: weight?,
            affiliation,
            media_info,
            gender,
            sport_id: sport_id?,
            contingent_id: contingent_id?,
        })
    }

    fn validated(self, mut errors: FieldErrors) -> Result<AthleteFields, ApiError> {
        let fields = self.fields(&mut errors);
        errors.finish(EntityKind::Athlete)?;
        // Every None path above records a field error, so `finish` has already failed.
        fields.ok_or_else(|| ApiError::validation_error("Invalid Athlete data", None))
    }

    pub fn into_create(self) -> Result<AthleteFields, ApiError> {
        self.validated(FieldErrors::default())
    }

    pub fn into_update(self, path_id: i32) -> Result<(AthleteFields, RowVersion), ApiError> {
        check_id(EntityKind::Athlete, self.id, path_id)?;
        let mut errors = FieldErrors::default();
        let token = errors.required("rowVersion", "Row Version", self.row_version);
        let fields = self.validated(errors)?;
        Ok((fields, token.unwrap_or_default()))
    }
}
