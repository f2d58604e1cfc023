//! Error types for the store adapter
//!
//! Backing-store failures are kept in [`StorageError`](crate::storage::StorageError)
//! and surface through [`StoreError::Storage`] without being reinterpreted.

use crate::storage::StorageError;
use thiserror::Error;

/// Store adapter errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A term violates the literal invariant or sits in a position its kind cannot occupy
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// A store-native term has no equivalent in the application term model
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),

    /// Quoted (formula) triples were passed to a store that is not formula aware
    #[error("Store is not formula aware")]
    FormulaNotSupported,

    /// The operation needs a collaborator the adapter does not have
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// The store handle was released by `close`
    #[error("Store is closed")]
    Closed,

    /// Backing store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StoreResult<T> = Result<T, StoreError>;
