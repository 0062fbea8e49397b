//! Error types for the choreboard core.

use thiserror::Error;

/// Errors raised while validating one raw record into a [`crate::Row`].
///
/// Parse failures are fatal to the whole run: the driver validates every
/// record before issuing any write-back, and the first failure aborts.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A record lacks one of the expected named fields.
    #[error("page {page_id} does not contain the '{name}' property")]
    MissingProperty { page_id: String, name: String },

    /// A field reports a different kind than the reading code expected.
    #[error("property {property_id} is not a '{expected}' property, but it's '{actual}'")]
    TypeMismatch {
        property_id: String,
        expected: &'static str,
        actual: String,
    },

    /// The frequency field has no chosen option.
    #[error("page {page_id} has no frequency set")]
    NoFrequencySet { page_id: String },

    /// The frequency label is not in the known vocabulary.
    #[error("unknown frequency in page {page_id}: '{label}'")]
    UnknownFrequency { page_id: String, label: String },

    /// The record is not a page and cannot be processed.
    #[error("unsupported row type '{object}' for page {page_id}")]
    UnsupportedRowType { page_id: String, object: String },

    /// A date payload's start string is not a calendar date.
    #[error("property {property_id} has an unreadable date start '{value}'")]
    InvalidDate { property_id: String, value: String },
}

/// Failure surfaced by the record-store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Non-success response from the store; carries the raw response body.
    #[error("record store request failed ({status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure (connect, timeout, body read or decode).
    #[error("record store transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Credential could not be encoded into request headers.
    #[error("authentication error: {0}")]
    Auth(String),
}

/// Union error for one sync cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
