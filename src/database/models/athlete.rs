use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::audit::{AuditFields, Auditable};
use super::entity::{Entity, EntityKind, RowVersion};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Athlete {
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
    pub sport_id: i32,
    pub contingent_id: i32,
    pub row_version: RowVersion,
    #[sqlx(flatten)]
    pub audit: AuditFields,
}

/// Mutable athlete fields, shared by create and full-replace update
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteFields {
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
    pub sport_id: i32,
    pub contingent_id: i32,
}

impl Athlete {
    pub fn new(fields: AthleteFields) -> Self {
        let mut athlete = Self {
            id: 0,
            first_name: String::new(),
            middle_name: None,
            last_name: String::new(),
            athlete_code: String::new(),
            dob: fields.dob,
            height: 0,
            weight: 0.0,
            affiliation: String::new(),
            media_info: String::new(),
            gender: String::new(),
            sport_id: 0,
            contingent_id: 0,
            row_version: 0,
            audit: AuditFields::default(),
        };
        athlete.apply(fields);
        athlete
    }

    /// Overwrite every mutable field
    pub fn apply(&mut self, fields: AthleteFields) {
        self.first_name = fields.first_name;
        self.middle_name = fields.middle_name;
        self.last_name = fields.last_name;
        self.athlete_code = fields.athlete_code;
        self.dob = fields.dob;
        self.height = fields.height;
        self.weight = fields.weight;
        self.affiliation = fields.affiliation;
        self.media_info = fields.media_info;
        self.gender = fields.gender;
        self.sport_id = fields.sport_id;
        self.contingent_id = fields.contingent_id;
    }

    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Auditable for Athlete {
    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

impl Entity for Athlete {
    fn kind() -> EntityKind {
        EntityKind::Athlete
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Athlete
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn row_version(&self) -> Option<RowVersion> {
        Some(self.row_version)
    }

    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        Some(self)
    }
}
