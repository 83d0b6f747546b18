//! Transfer shapes returned by the API. Children and parents are only populated on
//! the `inc` read paths.

use chrono::NaiveDate;
use serde::Serialize;

use crate::database::models::{AuditFields, Athlete, Contingent, RowVersion, Sport};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportDto {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub row_version: RowVersion,
    #[serde(flatten)]
    pub audit: AuditFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athletes: Option<Vec<AthleteDto>>,
}

impl SportDto {
    pub fn with_athletes(sport: Sport, athletes: Vec<Athlete>) -> Self {
        let mut dto = Self::from(sport);
        dto.athletes = Some(athletes.into_iter().map(AthleteDto::from).collect());
        dto
    }
}

impl From<Sport> for SportDto {
    fn from(sport: Sport) -> Self {
        Self {
            id: sport.id,
            code: sport.code,
            name: sport.name,
            row_version: sport.row_version,
            audit: sport.audit,
            athletes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingentDto {
    pub id: i32,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athletes: Option<Vec<AthleteDto>>,
}

impl ContingentDto {
    pub fn with_athletes(contingent: Contingent, athletes: Vec<Athlete>) -> Self {
        let mut dto = Self::from(contingent);
        dto.athletes = Some(athletes.into_iter().map(AthleteDto::from).collect());
        dto
    }
}

impl From<Contingent> for ContingentDto {
    fn from(contingent: Contingent) -> Self {
        Self {
            id: contingent.id,
            code: contingent.code,
            name: contingent.name,
            athletes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteDto {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub athlete_code: String,
    pub dob: NaiveDate,
    pub height: i32,
    pub weight: f64,
    pub affiliation: String,
    pub media_info: String,
    pub gender: String,
    #[serde(rename = "sportID")]
    pub sport_id: i32,
    #[serde(rename = "contingentID")]
    pub contingent_id: i32,
    pub row_version: RowVersion,
    #[serde(flatten)]
    pub audit: AuditFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<SportDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contingent: Option<ContingentDto>,
}

impl AthleteDto {
    pub fn with_parents(athlete: Athlete, sport: Option<Sport>, contingent: Option<Contingent>) -> Self {
        let mut dto = Self::from(athlete);
        dto.sport = sport.map(SportDto::from);
        dto.contingent = contingent.map(ContingentDto::from);
        dto
    }
}

impl From<Athlete> for AthleteDto {
    fn from(athlete: Athlete) -> Self {
        Self {
            id: athlete.id,
            first_name: athlete.first_name,
            middle_name: athlete.middle_name,
            last_name: athlete.last_name,
            athlete_code: athlete.athlete_code,
            dob: athlete.dob,
            height: athlete.height,
            weight: athlete.weight,
            affiliation: athlete.affiliation,
            media_info: athlete.media_info,
            gender: athlete.gender,
            sport_id: athlete.sport_id,
            contingent_id: athlete.contingent_id,
            row_version: athlete.row_version,
            audit: athlete.audit,
            sport: None,
            contingent: None,
        }
    }
}
