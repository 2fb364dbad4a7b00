//! World construction errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// An entity with this id is already registered. Fatal to the run.
    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),
}
