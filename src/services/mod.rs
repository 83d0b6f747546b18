pub mod guard;

pub use guard::{PersistenceError, WriteGuard};
