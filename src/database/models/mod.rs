pub mod athlete;
pub mod audit;
pub mod contingent;
pub mod entity;
pub mod sport;

pub use athlete::{Athlete, AthleteFields};
pub use audit::{AuditFields, Auditable};
pub use contingent::Contingent;
pub use entity::{Entity, EntityKind, RowVersion};
pub use sport::Sport;
