// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The blob could not be written. The in-memory ledger still holds the change.
    #[error("local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("persisted state is malformed: {0}")]
    MalformedPersistedState(String),

    #[error("invalid backup file format: {0}")]
    InvalidBackupFormat(String),

    #[error("invalid period: {to} is before {from}")]
    InvalidPeriod { from: String, to: String },

    #[error("invalid transaction type '{0}', expected IN or OUT")]
    InvalidTransactionType(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("please fix:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
