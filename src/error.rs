// ⚠️ Error types for the family tree and the asset ledger
//
// Every error is raised synchronously at the point of violation and never
// retried: they all describe bad input from the caller.

use crate::family::MemberId;

/// Errors raised while building a family or handling its assets.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeritageError {
    #[error("The name '{0}' is already in use in this family")]
    NotUniqueName(String),

    #[error("A parent ({parent}) has to be older than their child ({child})")]
    InvalidBirthDate { parent: String, child: String },

    #[error("'{0}' is not a valid asset kind")]
    InvalidAssetKind(String),

    #[error("Cannot add {right} to {left}: assets are of different kinds")]
    DifferentAssetKinds { left: String, right: String },

    #[error("Cannot add {added} to {held}: the total is too large to be valued")]
    AmountOverflow { held: String, added: String },

    #[error("Member not found in this family: {0}")]
    UnknownMember(MemberId),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, HeritageError>;
