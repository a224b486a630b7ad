//! User-facing commands. Each prints its progress and returns what it got
//! back so callers can act on it.

pub mod config;
mod demo;
mod field_spec;
mod probe;
mod users;

pub use demo::demo;
pub use field_spec::{FieldSpec, to_query, to_record};
pub use probe::{SAMPLE_PATH, probe};
pub use users::{create, delete, list, update};
