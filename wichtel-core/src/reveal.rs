//! Token lookup as performed by the reveal page.

use thiserror::Error;

use crate::{Assignment, AssignmentsData};

pub const INVALID_LINK_MESSAGE: &str = "This link is not valid. Please check with the organizer.";
pub const UNAVAILABLE_MESSAGE: &str = "An error occurred. Please try again later.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("{}", INVALID_LINK_MESSAGE)]
    InvalidLink,
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable,
}

impl AssignmentsData {
    /// Exact, case-sensitive match on the token.
    pub fn find_by_token(&self, token: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.token == token)
    }

    /// Name of the person the token holder gives a present to.
    pub fn reveal(&self, token: &str) -> Result<&str, RevealError> {
        self.find_by_token(token)
            .map(|a| a.receiver_name.as_str())
            .ok_or(RevealError::InvalidLink)
    }
}

/// Accepts a bare token or a full reveal link such as
/// `https://host/wichtel/<token>?utm=x` and returns the token part.
pub fn token_from_link(input: &str) -> &str {
    let input = input.trim();
    let without_fragment = input.split('#').next().unwrap_or(input);
    let path = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}
