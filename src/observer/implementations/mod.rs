// Observer implementations organized by rings

// Ring 1: Input Validation
#[path = "1/entry_identity.rs"]
pub mod entry_identity;

// Ring 4: Enrichment
#[path = "4/audit_stamp.rs"]
pub mod audit_stamp;

pub use audit_stamp::*;
pub use entry_identity::*;
