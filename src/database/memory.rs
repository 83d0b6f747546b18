use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{Athlete, Contingent, EntityKind, RowVersion, Sport};
use crate::database::store::{ParentRef, Repository, Store, StoreError};

const SPORT_FKEY: &str = "athletes_sport_id_fkey";
const CONTINGENT_FKEY: &str = "athletes_contingent_id_fkey";

#[derive(Default)]
struct Tables {
    sports: BTreeMap<i32, Sport>,
    contingents: BTreeMap<i32, Contingent>,
    athletes: BTreeMap<i32, Athlete>,
    last_sport_id: i32,
    last_contingent_id: i32,
    last_athlete_id: i32,
}

impl Tables {
    fn sport_code_taken(&self, code: &str, except: i32) -> bool {
        self.sports
            .values()
            .any(|s| s.id != except && s.code == code)
    }

    fn contingent_code_taken(&self, code: &str, except: i32) -> bool {
        self.contingents
            .values()
            .any(|c| c.id != except && c.code == code)
    }

    fn athlete_code_taken(&self, code: &str, except: i32) -> bool {
        self.athletes
            .values()
            .any(|a| a.id != except && a.athlete_code == code)
    }

    fn check_athlete_parents(&self, athlete: &Athlete) -> Result<(), StoreError> {
        if !self.sports.contains_key(&athlete.sport_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: SPORT_FKEY.to_string(),
            });
        }
        if !self.contingents.contains_key(&athlete.contingent_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: CONTINGENT_FKEY.to_string(),
            });
        }
        Ok(())
    }
}

fn unique_violation(kind: EntityKind) -> StoreError {
    StoreError::UniqueViolation {
        constraint: kind.unique_constraint().to_string(),
    }
}

fn token_matches(stored: RowVersion, expected: Option<RowVersion>) -> bool {
    expected.map_or(true, |expected| expected == stored)
}

fn sort_athletes(athletes: &mut [Athlete]) {
    athletes.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}

/// In-process store enforcing the same unique, foreign key and row version rules as
/// the Postgres schema. A single lock makes every call one atomic step.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Sport> for MemoryStore {
    async fn list(&self) -> Result<Vec<Sport>, StoreError> {
        let tables = self.tables.read().await;
        let mut sports: Vec<Sport> = tables.sports.values().cloned().collect();
        sports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sports)
    }

    async fn find(&self, id: i32) -> Result<Option<Sport>, StoreError> {
        Ok(self.tables.read().await.sports.get(&id).cloned())
    }

    async fn insert(&self, sport: &Sport) -> Result<Sport, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.sport_code_taken(&sport.code, 0) {
            return Err(unique_violation(EntityKind::Sport));
        }
        tables.last_sport_id += 1;
        let mut stored = sport.clone();
        stored.id = tables.last_sport_id;
        stored.row_version = 1;
        tables.sports.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        sport: &Sport,
        expected: Option<RowVersion>,
    ) -> Result<Option<Sport>, StoreError> {
        let mut tables = self.tables.write().await;
        let current = match tables.sports.get(&sport.id) {
            Some(current) if token_matches(current.row_version, expected) => current.clone(),
            _ => return Ok(None),
        };
        if tables.sport_code_taken(&sport.code, sport.id) {
            return Err(unique_violation(EntityKind::Sport));
        }
        let mut stored = sport.clone();
        stored.row_version = current.row_version + 1;
        stored.audit.created_by = current.audit.created_by;
        stored.audit.created_on = current.audit.created_on;
        tables.sports.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.athletes.values().any(|a| a.sport_id == id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: SPORT_FKEY.to_string(),
            });
        }
        Ok(tables.sports.remove(&id).is_some())
    }
}

#[async_trait]
impl Repository<Contingent> for MemoryStore {
    async fn list(&self) -> Result<Vec<Contingent>, StoreError> {
        let tables = self.tables.read().await;
        let mut contingents: Vec<Contingent> = tables.contingents.values().cloned().collect();
        contingents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contingents)
    }

    async fn find(&self, id: i32) -> Result<Option<Contingent>, StoreError> {
        Ok(self.tables.read().await.contingents.get(&id).cloned())
    }

    async fn insert(&self, contingent: &Contingent) -> Result<Contingent, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.contingent_code_taken(&contingent.code, 0) {
            return Err(unique_violation(EntityKind::Contingent));
        }
        tables.last_contingent_id += 1;
        let mut stored = contingent.clone();
        stored.id = tables.last_contingent_id;
        tables.contingents.insert(stored.id, stored.clone());
        Ok(stored)
    }

    // Contingents carry no token; `expected` is ignored.
    async fn update(
        &self,
        contingent: &Contingent,
        _expected: Option<RowVersion>,
    ) -> Result<Option<Contingent>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.contingents.contains_key(&contingent.id) {
            return Ok(None);
        }
        if tables.contingent_code_taken(&contingent.code, contingent.id) {
            return Err(unique_violation(EntityKind::Contingent));
        }
        tables.contingents.insert(contingent.id, contingent.clone());
        Ok(Some(contingent.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.athletes.values().any(|a| a.contingent_id == id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: CONTINGENT_FKEY.to_string(),
            });
        }
        Ok(tables.contingents.remove(&id).is_some())
    }
}

#[async_trait]
impl Repository<Athlete> for MemoryStore {
    async fn list(&self) -> Result<Vec<Athlete>, StoreError> {
        let tables = self.tables.read().await;
        let mut athletes: Vec<Athlete> = tables.athletes.values().cloned().collect();
        sort_athletes(&mut athletes);
        Ok(athletes)
    }

    async fn find(&self, id: i32) -> Result<Option<Athlete>, StoreError> {
        Ok(self.tables.read().await.athletes.get(&id).cloned())
    }

    async fn insert(&self, athlete: &Athlete) -> Result<Athlete, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.athlete_code_taken(&athlete.athlete_code, 0) {
            return Err(unique_violation(EntityKind::Athlete));
        }
        tables.check_athlete_parents(athlete)?;
        tables.last_athlete_id += 1;
        let mut stored = athlete.clone();
        stored.id = tables.last_athlete_id;
        stored.row_version = 1;
        tables.athletes.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        athlete: &Athlete,
        expected: Option<RowVersion>,
    ) -> Result<Option<Athlete>, StoreError> {
        let mut tables = self.tables.write().await;
        let current = match tables.athletes.get(&athlete.id) {
            Some(current) if token_matches(current.row_version, expected) => current.clone(),
            _ => return Ok(None),
        };
        if tables.athlete_code_taken(&athlete.athlete_code, athlete.id) {
            return Err(unique_violation(EntityKind::Athlete));
        }
        tables.check_athlete_parents(athlete)?;
        let mut stored = athlete.clone();
        stored.row_version = current.row_version + 1;
        stored.audit.created_by = current.audit.created_by;
        stored.audit.created_on = current.audit.created_on;
        tables.athletes.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.athletes.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn athletes_by_parent(&self, parent: ParentRef) -> Result<Vec<Athlete>, StoreError> {
        let tables = self.tables.read().await;
        let mut athletes: Vec<Athlete> = tables
            .athletes
            .values()
            .filter(|a| match parent {
                ParentRef::Sport(id) => a.sport_id == id,
                ParentRef::Contingent(id) => a.contingent_id == id,
            })
            .cloned()
            .collect();
        sort_athletes(&mut athletes);
        Ok(athletes)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
