// One module per resource under /api, plus the public service endpoints
pub mod athlete;
pub mod contingent;
pub mod health;
pub mod sport;
