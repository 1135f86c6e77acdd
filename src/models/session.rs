// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reviewer session.

use crate::error::ReviewError;

/// The reviewer using the application for this run.
///
/// Asked for once at startup and handed to every operation that records
/// who wrote something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    display_name: String,
}

impl Session {
    /// Start a session for the given display name (surrounding whitespace is dropped).
    pub fn new(display_name: &str) -> Result<Self, ReviewError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ReviewError::BlankDisplayName);
        }
        Ok(Self {
            display_name: display_name.to_string(),
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(Session::new("   "), Err(ReviewError::BlankDisplayName));
        assert_eq!(Session::new(""), Err(ReviewError::BlankDisplayName));
    }

    #[test]
    fn test_name_is_trimmed() {
        let session = Session::new("  Yael ").unwrap();
        assert_eq!(session.display_name(), "Yael");
    }
}
