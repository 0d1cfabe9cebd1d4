// crates/core/src/lib.rs
pub mod error;
pub mod filters;
pub mod predicate;
pub mod schema;
pub mod shape;
pub mod types;

pub use error::*;
pub use filters::*;
pub use predicate::*;
pub use schema::*;
pub use shape::Severity;
pub use types::*;
