//! Starter roster loaded into an empty store. Writes go through the guard with the
//! `Seed Data` actor, so seeded rows are stamped like any other.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::auth::Actor;
use crate::database::models::{Athlete, AthleteFields, Contingent, EntityKind, Sport};
use crate::database::store::{Repository, StoreError};
use crate::observer::Operation;
use crate::services::guard::{PersistenceError, WriteGuard};

const SPORTS: &[(&str, &str)] = &[
    ("ATH", "Athletics"),
    ("SWM", "Swimming"),
    ("CYC", "Cycling"),
    ("WRE", "Wrestling"),
];

const CONTINGENTS: &[(&str, &str)] = &[
    ("ON", "Ontario"),
    ("QC", "Quebec"),
    ("BC", "British Columbia"),
    ("AB", "Alberta"),
    ("NS", "Nova Scotia"),
];

struct SeedAthlete {
    first: &'static str,
    last: &'static str,
    code: &'static str,
    dob: (i32, u32, u32),
    height: i32,
    weight: f64,
    gender: &'static str,
    affiliation: &'static str,
    sport: &'static str,
    contingent: &'static str,
}

const ATHLETES: &[SeedAthlete] = &[
    SeedAthlete {
        first: "Aaliyah",
        last: "Brown",
        code: "1000101",
        dob: (2005, 3, 14),
        height: 168,
        weight: 57.5,
        gender: "F",
        affiliation: "Toronto Track Club",
        sport: "ATH",
        contingent: "ON",
    },
    SeedAthlete {
        first: "Felix",
        last: "Gagnon",
        code: "1000102",
        dob: (2004, 11, 2),
        height: 183,
        weight: 74.0,
        gender: "M",
        affiliation: "Club de natation de Laval",
        sport: "SWM",
        contingent: "QC",
    },
    SeedAthlete {
        first: "Maya",
        last: "Chen",
        code: "1000103",
        dob: (2006, 7, 21),
        height: 162,
        weight: 52.3,
        gender: "F",
        affiliation: "Victoria Cycling",
        sport: "CYC",
        contingent: "BC",
    },
    SeedAthlete {
        first: "Liam",
        last: "Anderson",
        code: "1000104",
        dob: (2003, 1, 9),
        height: 178,
        weight: 81.2,
        gender: "M",
        affiliation: "Calgary Wrestling Academy",
        sport: "WRE",
        contingent: "AB",
    },
    SeedAthlete {
        first: "Chloe",
        last: "MacDonald",
        code: "1000105",
        dob: (2005, 9, 30),
        height: 171,
        weight: 60.8,
        gender: "F",
        affiliation: "Halifax Harriers",
        sport: "ATH",
        contingent: "NS",
    },
];

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SeedSummary {
    pub sports: usize,
    pub contingents: usize,
    pub athletes: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        self.sports == 0 && self.contingents == 0 && self.athletes == 0
    }
}

/// Load the starter roster unless sports or contingents already exist
pub async fn seed_if_empty(guard: &WriteGuard) -> Result<SeedSummary, PersistenceError> {
    let store = guard.store().as_ref();
    let existing_sports = Repository::<Sport>::list(store).await.map_err(seed_read_error)?;
    let existing_contingents = Repository::<Contingent>::list(store)
        .await
        .map_err(seed_read_error)?;
    if !existing_sports.is_empty() || !existing_contingents.is_empty() {
        info!("Store already holds data, skipping seed");
        return Ok(SeedSummary::default());
    }

    let actor = Actor::seed();
    let mut summary = SeedSummary::default();

    let mut sports = Vec::with_capacity(SPORTS.len());
    for (code, name) in SPORTS {
        sports.push(guard.create(&actor, Sport::new(*code, *name)).await?);
        summary.sports += 1;
    }

    let mut contingents = Vec::with_capacity(CONTINGENTS.len());
    for (code, name) in CONTINGENTS {
        contingents.push(guard.create(&actor, Contingent::new(*code, *name)).await?);
        summary.contingents += 1;
    }

    for seed in ATHLETES {
        let (Some(sport), Some(contingent)) = (
            sports.iter().find(|s| s.code == seed.sport),
            contingents.iter().find(|c| c.code == seed.contingent),
        ) else {
            continue;
        };
        let Some(dob) = NaiveDate::from_ymd_opt(seed.dob.0, seed.dob.1, seed.dob.2) else {
            continue;
        };

        let athlete = Athlete::new(AthleteFields {
            first_name: seed.first.to_string(),
            middle_name: None,
            last_name: seed.last.to_string(),
            athlete_code: seed.code.to_string(),
            dob,
            height: seed.height,
            weight: seed.weight,
            affiliation: seed.affiliation.to_string(),
            media_info: format!("{} {} competes in {}.", seed.first, seed.last, sport.name),
            gender: seed.gender.to_string(),
            sport_id: sport.id,
            contingent_id: contingent.id,
        });
        guard.create(&actor, athlete).await?;
        summary.athletes += 1;
    }

    info!(
        "Seeded {} sports, {} contingents, {} athletes",
        summary.sports, summary.contingents, summary.athletes
    );
    Ok(summary)
}

fn seed_read_error(err: StoreError) -> PersistenceError {
    PersistenceError::Unknown {
        kind: EntityKind::Sport,
        operation: Operation::Create,
        detail: err.to_string(),
    }
}
