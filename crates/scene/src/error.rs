//! Error types for scene decoding and encoding.

use crate::ShapeKind;
use thiserror::Error;

/// Errors that can occur when decoding a scene document.
///
/// Any failing item aborts the whole decode; no partial scene is returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] Malformed),

    #[error("item {index}: unknown shape kind \"{kind}\"")]
    UnknownShapeKind { index: usize, kind: String },

    #[error("item {index} ({kind}): {source}")]
    FieldTypeMismatch {
        index: usize,
        kind: ShapeKind,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Position of the offending item, if the failure is tied to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedDocument(m) => m.index(),
            DecodeError::UnknownShapeKind { index, .. }
            | DecodeError::FieldTypeMismatch { index, .. } => Some(*index),
        }
    }
}

/// Structural failures: the envelope, or a required field of an item.
#[derive(Debug, Error)]
pub enum Malformed {
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("document is not an object")]
    NotAnObject,

    #[error("missing \"items\" list")]
    MissingItems,

    #[error("\"items\" is not a list")]
    ItemsNotAList,

    #[error("item {index} is not an object")]
    ItemNotAnObject { index: usize },

    #[error("item {index} has no \"item\" discriminator")]
    MissingDiscriminator { index: usize },

    #[error("item {index}: discriminator is not a string")]
    DiscriminatorNotAString { index: usize },

    #[error("item {index} ({kind}): missing required field \"{field}\"")]
    MissingField {
        index: usize,
        kind: ShapeKind,
        field: &'static str,
    },

    #[error("item {index} ({kind}): vertex {vertex} is missing required field \"{field}\"")]
    MissingVertexField {
        index: usize,
        kind: ShapeKind,
        vertex: usize,
        field: &'static str,
    },
}

impl Malformed {
    pub fn index(&self) -> Option<usize> {
        match self {
            Malformed::Syntax(_)
            | Malformed::NotAnObject
            | Malformed::MissingItems
            | Malformed::ItemsNotAList => None,
            Malformed::ItemNotAnObject { index }
            | Malformed::MissingDiscriminator { index }
            | Malformed::DiscriminatorNotAString { index }
            | Malformed::MissingField { index, .. }
            | Malformed::MissingVertexField { index, .. } => Some(*index),
        }
    }
}

/// Serializer failure. Not reachable for scenes built from the public types.
#[derive(Debug, Error)]
#[error("failed to encode scene: {0}")]
pub struct EncodeError(#[from] serde_json::Error);
