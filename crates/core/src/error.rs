// crates/core/src/error.rs
use thiserror::Error;

/// Errors raised while resolving the store's schema layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown schema variant: {0} (expected \"outcome\" or \"severity\")")]
    UnknownVariant(String),
}
