// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Domain errors.
//!
//! File and serialization plumbing reports through `anyhow`; the errors
//! below are the ones callers are expected to match on.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// Comment text was empty or whitespace-only.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// Reviewer display name was empty or whitespace-only.
    #[error("display name must not be empty")]
    BlankDisplayName,

    /// Blob keys are restricted to ASCII letters, digits, `-` and `_`.
    #[error("invalid blob key: {0:?}")]
    InvalidBlobKey(String),

    #[error("unsupported media file: {0}")]
    UnsupportedMedia(String),
}
