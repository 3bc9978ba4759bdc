//! Registration outcomes other than success.

use crate::store::StoreError;
use thiserror::Error;

/// How the caller should react to a failed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or incomplete input; the client must fix and resubmit.
    BadRequest,
    /// Business-rule violation on validator codes; participant data must change.
    Conflict,
    /// Configuration or store failure; needs an operator.
    Internal,
}

/// Why a registration batch was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Billing data missing or no participants.
    #[error("Incomplete data: billing data and at least one participant are required.")]
    IncompleteBatch,

    /// A participant has an empty validator code.
    #[error("Incomplete data: participant #{position} has no validator code.")]
    BlankValidatorCode {
        /// 1-based position in the batch.
        position: usize,
    },

    /// The same code appears more than once and the policy forbids it.
    #[error(
        "Validation error: the following validator code(s) appear more than once in this submission: {}.",
        .codes.join(", ")
    )]
    DuplicateCodes {
        /// Each repeated code, once, sorted.
        codes: Vec<String>,
    },

    /// Codes not provisioned in the ledger.
    #[error(
        "Validation error: the following validator code(s) are not valid or do not exist: {}.",
        .codes.join(", ")
    )]
    UnknownCodes {
        /// Each missing code, once, sorted.
        codes: Vec<String>,
    },

    /// Codes already redeemed by an earlier registration.
    #[error(
        "Validation error: the following validator code(s) have already been used: {}.",
        .codes.join(", ")
    )]
    CodesAlreadyUsed {
        /// Each consumed code, once, sorted.
        codes: Vec<String>,
    },

    /// The record store failed; the batch was aborted at that point.
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl RegistrationError {
    /// Classification used to pick the HTTP status.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompleteBatch | Self::BlankValidatorCode { .. } => ErrorKind::BadRequest,
            Self::DuplicateCodes { .. } | Self::UnknownCodes { .. } | Self::CodesAlreadyUsed { .. } => {
                ErrorKind::Conflict
            },
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Codes named by a conflict, empty for other kinds.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        match self {
            Self::DuplicateCodes { codes }
            | Self::UnknownCodes { codes }
            | Self::CodesAlreadyUsed { codes } => codes,
            _ => &[],
        }
    }
}
